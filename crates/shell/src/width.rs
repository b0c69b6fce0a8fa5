//! Terminal column arithmetic for layout.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[inline]
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

#[inline]
pub fn str_width(s: &str) -> usize {
    s.width()
}

/// Truncates `s` to at most `width` columns, never splitting a wide glyph.
pub fn truncate(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (index, ch) in s.char_indices() {
        let w = char_width(ch);
        if used + w > width {
            return &s[..index];
        }
        used += w;
    }
    s
}

/// Truncates then right-pads with spaces to exactly `width` columns.
pub fn fit(s: &str, width: usize) -> String {
    let clipped = truncate(s, width);
    let mut out = String::with_capacity(width);
    out.push_str(clipped);
    out.extend(std::iter::repeat(' ').take(width - str_width(clipped)));
    out
}

/// Hard-wraps one line into chunks of at most `width` columns.
pub fn wrap(line: &str, width: usize) -> Vec<&str> {
    if width == 0 {
        return vec![line];
    }
    let mut chunks = Vec::new();
    let mut rest = line;
    while str_width(rest) > width {
        let head = truncate(rest, width);
        if head.is_empty() {
            // A glyph wider than the whole row.
            let first = rest.chars().next().map(char::len_utf8).unwrap_or(rest.len());
            chunks.push(&rest[..first]);
            rest = &rest[first..];
            continue;
        }
        chunks.push(head);
        rest = &rest[head.len()..];
    }
    chunks.push(rest);
    chunks
}

use crtpad_core::{Document, DocumentId};
use crtpad_settings::{EditorPreferences, ResolvedPalette};

use crate::chrome::{tab_strip, title_bar};
use crate::frame::CrtFrame;
use crate::status::StatusBar;
use crate::width::{fit, str_width, wrap};

pub const DEFAULT_WIDTH: usize = 100;
const MINIMAP_WIDTH: usize = 6;
const MINIMAP_MIN_WIDTH: usize = 40;

/// Everything needed to draw one frame of the editor.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a> {
    pub documents: &'a [Document],
    pub active: &'a DocumentId,
    pub prefs: &'a EditorPreferences,
    pub autosaved_visible: bool,
    pub palette: Option<&'a ResolvedPalette>,
    pub width: usize,
    /// Caps the editor area; `None` shows every row.
    pub max_rows: Option<usize>,
}

impl<'a> Screen<'a> {
    pub fn new(
        documents: &'a [Document],
        active: &'a DocumentId,
        prefs: &'a EditorPreferences,
    ) -> Self {
        Self {
            documents,
            active,
            prefs,
            autosaved_visible: false,
            palette: None,
            width: DEFAULT_WIDTH,
            max_rows: None,
        }
    }

    pub fn render(&self) -> String {
        let mut frame = CrtFrame::new(self.width);
        if let Some(palette) = self.palette {
            frame = frame.with_palette(palette);
        }
        let inner = frame.inner_width();

        let mut rows = vec![tab_strip(self.documents, self.active), String::new()];
        if let Some(document) = self.active_document() {
            let mut editor = editor_rows(document.content(), self.prefs, inner);
            if let Some(limit) = self.max_rows {
                editor.truncate(limit);
            }
            rows.extend(editor);
        }

        let footer = match self.active_document() {
            Some(document) => {
                StatusBar::compose(document, self.prefs, self.autosaved_visible).render(inner)
            }
            None => String::new(),
        };
        frame.render(&title_bar(), &rows, &footer)
    }

    fn active_document(&self) -> Option<&'a Document> {
        self.documents
            .iter()
            .find(|document| document.id() == self.active)
    }
}

/// Lays out document text for the editor area: tab expansion, optional
/// whitespace glyphs, a line-number gutter, wrapping and the minimap column.
pub fn editor_rows(content: &str, prefs: &EditorPreferences, width: usize) -> Vec<String> {
    let source: Vec<String> = content
        .split('\n')
        .map(|line| render_line(line, prefs))
        .collect();
    let minimap = prefs.minimap && width >= MINIMAP_MIN_WIDTH;
    let text_width = if minimap {
        width - MINIMAP_WIDTH - 1
    } else {
        width
    };

    let gutter_digits = source.len().to_string().len().max(2);
    let gutter_width = if prefs.show_line_numbers {
        gutter_digits + 1
    } else {
        0
    };
    let body_width = text_width.saturating_sub(gutter_width).max(1);

    let mut rows = Vec::new();
    for (index, line) in source.iter().enumerate() {
        let chunks = if prefs.word_wrap {
            wrap(line, body_width)
        } else {
            vec![line.as_str()]
        };
        for (part, chunk) in chunks.into_iter().enumerate() {
            let mut row = String::new();
            if prefs.show_line_numbers {
                if part == 0 {
                    row.push_str(&format!("{:>gutter_digits$} ", index + 1));
                } else {
                    row.push_str(&" ".repeat(gutter_width));
                }
            }
            row.push_str(chunk);
            rows.push(row);
        }
    }

    if minimap {
        // Scaled overview: output row `r` samples the source line at the same
        // relative position, so wrapped lines keep their density bar.
        let total = rows.len().max(1);
        for (row_index, row) in rows.iter_mut().enumerate() {
            let line = source.get(row_index * source.len() / total);
            let mut padded = fit(row, text_width);
            padded.push('│');
            padded.push_str(&minimap_cell(line.map(String::as_str)));
            *row = padded;
        }
    }
    rows
}

fn render_line(line: &str, prefs: &EditorPreferences) -> String {
    let tab = usize::from(prefs.tab_size.max(1));
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\t' => {
                let column = str_width(&out);
                let pad = tab - column % tab;
                if prefs.show_whitespace {
                    out.push('→');
                    out.push_str(&" ".repeat(pad - 1));
                } else {
                    out.push_str(&" ".repeat(pad));
                }
            }
            ' ' if prefs.show_whitespace => out.push('·'),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Density bar for one source line.
fn minimap_cell(line: Option<&str>) -> String {
    let filled = line
        .map(|line| str_width(line.trim_end()).div_ceil(8).min(MINIMAP_WIDTH))
        .unwrap_or(0);
    let mut cell = "▄".repeat(filled);
    cell.push_str(&" ".repeat(MINIMAP_WIDTH - filled));
    cell
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_prefs() -> EditorPreferences {
        EditorPreferences {
            minimap: false,
            word_wrap: false,
            show_line_numbers: false,
            ..EditorPreferences::default()
        }
    }

    #[test]
    fn gutter_numbers_each_source_line() {
        let prefs = EditorPreferences {
            minimap: false,
            ..EditorPreferences::default()
        };
        let rows = editor_rows("a\nb", &prefs, 30);
        assert_eq!(rows, vec![" 1 a", " 2 b"]);
    }

    #[test]
    fn wrapping_leaves_gutter_blank_on_continuations() {
        let prefs = EditorPreferences {
            minimap: false,
            ..EditorPreferences::default()
        };
        let rows = editor_rows("abcdef", &prefs, 6);
        assert_eq!(rows, vec![" 1 abc", "   def"]);
    }

    #[test]
    fn tabs_expand_and_whitespace_is_visible() {
        let mut prefs = plain_prefs();
        assert_eq!(editor_rows("\tx", &prefs, 20), vec!["  x"]);
        prefs.show_whitespace = true;
        prefs.tab_size = 4;
        assert_eq!(editor_rows("a\tb c", &prefs, 20), vec!["a→  b·c"]);
    }

    #[test]
    fn minimap_column_appears_on_wide_screens() {
        let prefs = EditorPreferences {
            show_line_numbers: false,
            word_wrap: false,
            ..EditorPreferences::default()
        };
        let rows = editor_rows("0123456789", &prefs, 40);
        assert_eq!(str_width(&rows[0]), 40);
        assert!(rows[0].ends_with("│▄▄    "));
        assert_eq!(editor_rows("x", &prefs, 39), vec!["x"]);
    }

    #[test]
    fn zero_tab_size_expands_to_single_column() {
        let prefs = EditorPreferences {
            tab_size: 0,
            ..plain_prefs()
        };
        assert_eq!(editor_rows("\tx", &prefs, 20), vec![" x"]);
    }

    #[test]
    fn minimap_follows_source_lines_through_wrapping() {
        let prefs = EditorPreferences {
            show_line_numbers: false,
            word_wrap: true,
            ..EditorPreferences::default()
        };
        let content = format!("{}\n\n\n", "a".repeat(66));
        let rows = editor_rows(&content, &prefs, 40);
        assert_eq!(rows.len(), 5);
        assert!(rows[0].ends_with("│▄▄▄▄▄▄"));
        assert!(rows[1].ends_with("│▄▄▄▄▄▄"));
        assert!(rows[2].ends_with("│      "));
        assert!(rows[4].ends_with("│      "));
    }
}

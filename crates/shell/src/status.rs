use crtpad_core::Document;
use crtpad_settings::EditorPreferences;

use crate::stats::TextStats;
use crate::width::{fit, str_width};

/// Bottom status line, split into a left and a right segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBar {
    pub left: String,
    pub right: String,
}

impl StatusBar {
    pub fn compose(document: &Document, prefs: &EditorPreferences, autosaved_visible: bool) -> Self {
        let stats = TextStats::of(document.content());
        let left = format!(
            "LANG: {} | CHARS: {} | WORDS: {} | LINES: {} | SIZE: {}px | TAB: {} | SPACES: {} | AUTO-SAVE: ON",
            document.language().to_uppercase(),
            stats.chars,
            stats.words,
            stats.lines,
            prefs.font_size,
            prefs.tab_size,
            if prefs.insert_spaces { "ON" } else { "OFF" },
        );

        let mut right = Vec::with_capacity(3);
        if autosaved_visible {
            right.push("AUTO-SAVED".to_string());
        }
        right.push(format!("THEME: {}", prefs.theme.to_uppercase()));
        right.push("READY".to_string());

        Self {
            left,
            right: right.join(" | "),
        }
    }

    /// Lays the segments out on one row of `width` columns. When they do
    /// not fit, the left segment is clipped.
    pub fn render(&self, width: usize) -> String {
        let right_width = str_width(&self.right);
        if right_width + 1 >= width {
            return fit(&self.right, width);
        }
        let left_width = width - right_width - 1;
        format!("{} {}", fit(&self.left, left_width), self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crtpad_core::DocumentId;

    #[test]
    fn segments_reflect_document_and_preferences() {
        let document = Document::new(DocumentId::new("1"), "main.rs", "fn main() {}\n");
        let mut prefs = EditorPreferences::default();
        prefs.insert_spaces = false;
        let bar = StatusBar::compose(&document, &prefs, false);
        assert_eq!(
            bar.left,
            "LANG: RUST | CHARS: 13 | WORDS: 3 | LINES: 2 | SIZE: 14px | TAB: 2 | SPACES: OFF | AUTO-SAVE: ON"
        );
        assert_eq!(bar.right, "THEME: FALLOUT-DARK | READY");
    }

    #[test]
    fn autosaved_badge_only_while_visible() {
        let document = Document::new(DocumentId::new("1"), "a.txt", "");
        let bar = StatusBar::compose(&document, &EditorPreferences::default(), true);
        assert!(bar.right.starts_with("AUTO-SAVED | "));
    }

    #[test]
    fn render_pads_to_width_and_keeps_right_segment() {
        let bar = StatusBar {
            left: "LEFT SIDE".into(),
            right: "READY".into(),
        };
        assert_eq!(bar.render(20), "LEFT SIDE      READY");
        assert_eq!(bar.render(10), "LEFT READY");
        assert_eq!(bar.render(4), "READ");
    }
}

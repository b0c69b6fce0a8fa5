use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u8 = 10;
pub const MAX_FONT_SIZE: u8 = 24;
pub const ZOOM_STEP: u8 = 2;
pub const DEFAULT_FONT_SIZE: u8 = 14;
pub const DEFAULT_TAB_SIZE: u8 = 2;
pub const DEFAULT_THEME: &str = "fallout-dark";

/// Session-scoped editor options. Initial values may come from the config
/// file; changes made during a session are not written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorPreferences {
    #[serde(default = "default_font_size")]
    pub font_size: u8,
    #[serde(default = "default_true")]
    pub word_wrap: bool,
    #[serde(default = "default_true")]
    pub minimap: bool,
    #[serde(default = "default_true")]
    pub show_line_numbers: bool,
    #[serde(default)]
    pub show_whitespace: bool,
    #[serde(default = "default_tab_size")]
    pub tab_size: u8,
    #[serde(default = "default_true")]
    pub insert_spaces: bool,
    #[serde(default = "default_true")]
    pub bracket_matching: bool,
    #[serde(default = "default_true")]
    pub code_folding: bool,
    #[serde(default = "default_true")]
    pub indent_guides: bool,
    #[serde(default = "default_true")]
    pub autocomplete: bool,
    #[serde(default = "default_true")]
    pub linting: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_true() -> bool {
    true
}

fn default_font_size() -> u8 {
    DEFAULT_FONT_SIZE
}

fn default_tab_size() -> u8 {
    DEFAULT_TAB_SIZE
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            word_wrap: true,
            minimap: true,
            show_line_numbers: true,
            show_whitespace: false,
            tab_size: DEFAULT_TAB_SIZE,
            insert_spaces: true,
            bracket_matching: true,
            code_folding: true,
            indent_guides: true,
            autocomplete: true,
            linting: true,
            theme: default_theme(),
        }
    }
}

impl EditorPreferences {
    pub fn sanitize(&mut self) {
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.tab_size = self.tab_size.clamp(1, 8);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }

    pub fn zoom_in(&mut self) -> u8 {
        self.set_font_size(self.font_size.saturating_add(ZOOM_STEP))
    }

    pub fn zoom_out(&mut self) -> u8 {
        self.set_font_size(self.font_size.saturating_sub(ZOOM_STEP))
    }

    /// Sets the font size, clamped to the supported range.
    pub fn set_font_size(&mut self, size: u8) -> u8 {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.font_size
    }

    pub fn toggle_word_wrap(&mut self) -> bool {
        self.word_wrap = !self.word_wrap;
        self.word_wrap
    }

    pub fn toggle_minimap(&mut self) -> bool {
        self.minimap = !self.minimap;
        self.minimap
    }

    pub fn toggle_whitespace(&mut self) -> bool {
        self.show_whitespace = !self.show_whitespace;
        self.show_whitespace
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = theme.into();
        self.sanitize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_steps_are_clamped() {
        let mut prefs = EditorPreferences::default();
        for _ in 0..10 {
            prefs.zoom_in();
        }
        assert_eq!(prefs.font_size, MAX_FONT_SIZE);
        for _ in 0..10 {
            prefs.zoom_out();
        }
        assert_eq!(prefs.font_size, MIN_FONT_SIZE);
        assert_eq!(prefs.zoom_in(), 12);
    }

    #[test]
    fn sanitize_repairs_out_of_range_values() {
        let mut prefs = EditorPreferences {
            font_size: 200,
            tab_size: 0,
            theme: "  ".into(),
            ..EditorPreferences::default()
        };
        prefs.sanitize();
        assert_eq!(prefs.font_size, MAX_FONT_SIZE);
        assert_eq!(prefs.tab_size, 1);
        assert_eq!(prefs.theme, DEFAULT_THEME);
    }

    #[test]
    fn toggles_flip_independently() {
        let mut prefs = EditorPreferences::default();
        assert!(!prefs.toggle_word_wrap());
        assert!(!prefs.toggle_minimap());
        assert!(prefs.toggle_whitespace());
        assert!(prefs.show_line_numbers);
        assert!(prefs.toggle_word_wrap());
    }
}

pub mod config;
pub mod preferences;
pub mod theme;

pub use config::{AppConfig, AutosaveSettings, ConfigError, StorageSettings};
pub use preferences::{
    EditorPreferences, DEFAULT_FONT_SIZE, DEFAULT_THEME, MAX_FONT_SIZE, MIN_FONT_SIZE, ZOOM_STEP,
};
pub use theme::{
    Color, ColorParseError, FontStyle, ResolvedPalette, ThemeBase, ThemeCatalogue,
    ThemeDefinition, ThemeError, ThemePalette, TokenRule, FALLOUT_DARK,
};

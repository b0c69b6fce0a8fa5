use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FALLOUT_DARK: &str = "fallout-dark";

/// RGBA colour resolved from a `#RRGGBB[AA]` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn from_hex(input: &str) -> Result<Self, ThemeError> {
        parse_hex(input).map_err(|reason| ThemeError::InvalidColor {
            value: input.to_string(),
            reason,
        })
    }

    pub fn to_hex(&self) -> String {
        if self.a == 0xFF {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Base widget theme a definition inherits from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeBase {
    #[default]
    VsDark,
    Vs,
    HcBlack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Bold,
}

/// Token colour rule, e.g. `comment` rendered italic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRule {
    pub token: String,
    pub foreground: String,
    #[serde(default)]
    pub font_style: FontStyle,
}

/// Editor colours as hex strings, as written in theme files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub background: String,
    pub foreground: String,
    pub line_highlight: String,
    pub selection: String,
    pub cursor: String,
    pub line_number: String,
    pub line_number_active: String,
    pub find_match: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPalette {
    pub background: Color,
    pub foreground: Color,
    pub line_highlight: Color,
    pub selection: Color,
    pub cursor: Color,
    pub line_number: Color,
    pub line_number_active: Color,
    pub find_match: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub base: ThemeBase,
    pub palette: ThemePalette,
    #[serde(default)]
    pub rules: Vec<TokenRule>,
}

fn rule(token: &str, foreground: &str, font_style: FontStyle) -> TokenRule {
    TokenRule {
        token: token.into(),
        foreground: foreground.into(),
        font_style,
    }
}

impl ThemeDefinition {
    /// Green phosphor terminal theme.
    pub fn fallout_dark() -> Self {
        Self {
            id: FALLOUT_DARK.into(),
            label: Some("Fallout Green".into()),
            base: ThemeBase::VsDark,
            palette: ThemePalette {
                background: "#000800".into(),
                foreground: "#00ff41".into(),
                line_highlight: "#001100".into(),
                selection: "#00aa2a40".into(),
                cursor: "#00ff41".into(),
                line_number: "#00aa2a".into(),
                line_number_active: "#00ff41".into(),
                find_match: "#00ff4140".into(),
            },
            rules: vec![
                rule("comment", "#00aa2a", FontStyle::Italic),
                rule("keyword", "#00ff41", FontStyle::Bold),
                rule("string", "#00cc33", FontStyle::Normal),
                rule("number", "#00ff66", FontStyle::Normal),
                rule("operator", "#00ff41", FontStyle::Normal),
                rule("identifier", "#00dd44", FontStyle::Normal),
            ],
        }
    }

    /// Amber monochrome variant.
    pub fn fallout_amber() -> Self {
        Self {
            id: "fallout-amber".into(),
            label: Some("Fallout Amber".into()),
            base: ThemeBase::VsDark,
            palette: ThemePalette {
                background: "#0a0600".into(),
                foreground: "#ffb000".into(),
                line_highlight: "#1a1000".into(),
                selection: "#cc8c0040".into(),
                cursor: "#ffb000".into(),
                line_number: "#cc8c00".into(),
                line_number_active: "#ffb000".into(),
                find_match: "#ffb00040".into(),
            },
            rules: vec![
                rule("comment", "#cc8c00", FontStyle::Italic),
                rule("keyword", "#ffb000", FontStyle::Bold),
                rule("string", "#e69e00", FontStyle::Normal),
                rule("number", "#ffc233", FontStyle::Normal),
            ],
        }
    }

    /// Plain dark theme without the CRT tint.
    pub fn vs_dark() -> Self {
        Self {
            id: "vs-dark".into(),
            label: Some("Visual Studio Dark".into()),
            base: ThemeBase::VsDark,
            palette: ThemePalette {
                background: "#1e1e1e".into(),
                foreground: "#d4d4d4".into(),
                line_highlight: "#282828".into(),
                selection: "#264f78".into(),
                cursor: "#aeafad".into(),
                line_number: "#858585".into(),
                line_number_active: "#c6c6c6".into(),
                find_match: "#515c6a".into(),
            },
            rules: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    pub fn resolve_palette(&self) -> Result<ResolvedPalette, ThemeError> {
        let palette = &self.palette;
        Ok(ResolvedPalette {
            background: Color::from_hex(&palette.background)?,
            foreground: Color::from_hex(&palette.foreground)?,
            line_highlight: Color::from_hex(&palette.line_highlight)?,
            selection: Color::from_hex(&palette.selection)?,
            cursor: Color::from_hex(&palette.cursor)?,
            line_number: Color::from_hex(&palette.line_number)?,
            line_number_active: Color::from_hex(&palette.line_number_active)?,
            find_match: Color::from_hex(&palette.find_match)?,
        })
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.id.trim().is_empty() {
            return Err(ThemeError::MissingId);
        }
        self.resolve_palette()?;
        for rule in &self.rules {
            Color::from_hex(&rule.foreground)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct ThemeEntry {
    definition: ThemeDefinition,
    palette: ResolvedPalette,
}

impl ThemeEntry {
    fn new(definition: ThemeDefinition) -> Result<Self, ThemeError> {
        definition.validate()?;
        let palette = definition.resolve_palette()?;
        Ok(Self {
            definition,
            palette,
        })
    }
}

/// Themes known to the application: the built-ins plus any user themes.
#[derive(Debug, Clone)]
pub struct ThemeCatalogue {
    entries: Vec<ThemeEntry>,
}

impl ThemeCatalogue {
    pub fn builtin() -> Result<Self, ThemeError> {
        Self::new(vec![
            ThemeDefinition::fallout_dark(),
            ThemeDefinition::fallout_amber(),
            ThemeDefinition::vs_dark(),
        ])
    }

    /// Later definitions with an id already present replace the earlier one.
    pub fn new(definitions: Vec<ThemeDefinition>) -> Result<Self, ThemeError> {
        let mut catalogue = Self {
            entries: Vec::with_capacity(definitions.len()),
        };
        for definition in definitions {
            catalogue.insert(definition)?;
        }
        Ok(catalogue)
    }

    /// Built-ins extended with every `*.json` theme in `dir`. A missing
    /// directory contributes nothing. A file that cannot be read, parsed or
    /// validated is skipped and its error returned next to the catalogue;
    /// only a broken built-in fails the call.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<(Self, Vec<ThemeError>), ThemeError> {
        let dir = dir.as_ref();
        let mut catalogue = Self::builtin()?;
        let mut skipped = Vec::new();
        if !dir.is_dir() {
            return Ok((catalogue, skipped));
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(source) => {
                skipped.push(ThemeError::Io {
                    path: dir.to_path_buf(),
                    source,
                });
                return Ok((catalogue, skipped));
            }
        };
        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if is_json(&path) {
                        paths.push(path);
                    }
                }
                Err(source) => skipped.push(ThemeError::Io {
                    path: dir.to_path_buf(),
                    source,
                }),
            }
        }
        paths.sort();

        for path in paths {
            let loaded = read_definition(&path).and_then(|definition| catalogue.insert(definition));
            if let Err(err) = loaded {
                skipped.push(err);
            }
        }
        Ok((catalogue, skipped))
    }

    pub fn insert(&mut self, definition: ThemeDefinition) -> Result<(), ThemeError> {
        let entry = ThemeEntry::new(definition)?;
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.definition.id == entry.definition.id)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ThemeDefinition> {
        self.entry(id).map(|entry| &entry.definition)
    }

    pub fn palette(&self, id: &str) -> Option<&ResolvedPalette> {
        self.entry(id).map(|entry| &entry.palette)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entry(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.definition.id.as_str())
    }

    pub fn themes(&self) -> impl Iterator<Item = &ThemeDefinition> {
        self.entries.iter().map(|entry| &entry.definition)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: &str) -> Option<&ThemeEntry> {
        self.entries.iter().find(|entry| entry.definition.id == id)
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("failed to read theme {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse theme {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid colour '{value}': {reason}")]
    InvalidColor {
        value: String,
        reason: ColorParseError,
    },
    #[error("theme id must not be empty")]
    MissingId,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("missing leading '#'")]
    MissingHashPrefix,
    #[error("expected 6 or 8 hexadecimal digits")]
    InvalidLength,
    #[error("contains non-hexadecimal digits")]
    InvalidHex,
}

fn parse_hex(input: &str) -> Result<Color, ColorParseError> {
    let hex = input
        .trim()
        .strip_prefix('#')
        .ok_or(ColorParseError::MissingHashPrefix)?;
    if !hex.is_ascii() {
        return Err(ColorParseError::InvalidHex);
    }
    if hex.len() != 6 && hex.len() != 8 {
        return Err(ColorParseError::InvalidLength);
    }
    let mut rgba = [0u8, 0, 0, 0xFF];
    for (index, slot) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
        let start = index * 2;
        *slot = u8::from_str_radix(&hex[start..start + 2], 16)
            .map_err(|_| ColorParseError::InvalidHex)?;
    }
    Ok(Color {
        r: rgba[0],
        g: rgba[1],
        b: rgba[2],
        a: rgba[3],
    })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn read_definition(path: &Path) -> Result<ThemeDefinition, ThemeError> {
    let data = fs::read_to_string(path).map_err(|source| ThemeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ThemeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::preferences::EditorPreferences;

const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access CRTPad config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("CRTPad config {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode CRTPad config: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Application configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub autosave: AutosaveSettings,
    /// Initial values for the session preferences.
    #[serde(default)]
    pub editor: EditorPreferences,
    /// Where exported documents are written; relative paths resolve against
    /// the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: StorageSettings::default(),
            autosave: AutosaveSettings::default(),
            editor: EditorPreferences::default(),
            export_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Key-value store file; relative paths resolve against the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default = "default_files_key")]
    pub files_key: String,
    #[serde(default = "default_active_key")]
    pub active_key: String,
}

fn default_files_key() -> String {
    "crtpad-files".to_string()
}

fn default_active_key() -> String {
    "crtpad-active-file".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            file: None,
            files_key: default_files_key(),
            active_key: default_active_key(),
        }
    }
}

impl StorageSettings {
    fn sanitize(&mut self) {
        if self.files_key.trim().is_empty() {
            self.files_key = default_files_key();
        }
        if self.active_key.trim().is_empty() {
            self.active_key = default_active_key();
        }
        if self.files_key == self.active_key {
            self.active_key = format!("{}-active", self.files_key);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutosaveSettings {
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,
    #[serde(default = "default_autosave_indicator_ms")]
    pub autosave_indicator_ms: u64,
    #[serde(default = "default_save_indicator_ms")]
    pub save_indicator_ms: u64,
}

fn default_quiet_period_ms() -> u64 {
    2_000
}

fn default_autosave_indicator_ms() -> u64 {
    1_000
}

fn default_save_indicator_ms() -> u64 {
    2_000
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            quiet_period_ms: default_quiet_period_ms(),
            autosave_indicator_ms: default_autosave_indicator_ms(),
            save_indicator_ms: default_save_indicator_ms(),
        }
    }
}

impl AutosaveSettings {
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    pub fn autosave_indicator(&self) -> Duration {
        Duration::from_millis(self.autosave_indicator_ms)
    }

    pub fn save_indicator(&self) -> Duration {
        Duration::from_millis(self.save_indicator_ms)
    }

    fn sanitize(&mut self) {
        if self.quiet_period_ms == 0 {
            self.quiet_period_ms = default_quiet_period_ms();
        }
        self.quiet_period_ms = self.quiet_period_ms.min(600_000);
        self.autosave_indicator_ms = self.autosave_indicator_ms.min(60_000);
        self.save_indicator_ms = self.save_indicator_ms.min(60_000);
    }
}

impl AppConfig {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = CONFIG_VERSION;
        }
        self.storage.sanitize();
        self.autosave.sanitize();
        self.editor.sanitize();
    }

    /// Loads the config file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut config = Self::default();
            config.sanitize();
            return Ok(config);
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let mut config: AppConfig =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        config.sanitize();
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(self)?;

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| ConfigError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &path).map_err(|source| ConfigError::Io { path, source })
    }
}

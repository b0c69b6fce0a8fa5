use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::{KeyValueStore, StorageError};

/// 以單一 JSON 物件檔案保存整個鍵空間。 / Keeps the whole key space in one JSON object file.
///
/// Every `set`/`remove` rewrites the file atomically (temporary sibling plus
/// rename), so a crash never leaves a half-written store behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// 開啟儲存檔；檔案不存在時視為空白。 / Opens the store file, treating a missing file as empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                StorageError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(StorageError::Io(err)),
        };
        Ok(Self { path, entries })
    }

    /// 開啟儲存檔；若內容損毀則備份為 `.bak` 並以空白儲存啟動。 / Opens the store, moving a corrupt file aside to `.bak` and starting empty.
    pub fn open_or_reset(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        match Self::open(path) {
            Err(StorageError::Corrupt { source, .. }) => {
                let backup = path.with_extension("bak");
                tracing::warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %source,
                    "storage file is corrupt; starting with an empty store"
                );
                fs::copy(path, &backup)?;
                Ok(Self {
                    path: path.to_path_buf(),
                    entries: BTreeMap::new(),
                })
            }
            other => other,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 列出目前所有鍵。 / Iterates over the stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|key| key.as_str())
    }

    fn persist(&self) -> Result<(), StorageError> {
        let payload = serde_json::to_vec_pretty(&self.entries)?;
        write_atomic(&self.path, &payload)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist() {
            match previous {
                Some(previous) => self.entries.insert(key.to_string(), previous),
                None => self.entries.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if let Some(previous) = self.entries.remove(key) {
            if let Err(err) = self.persist() {
                self.entries.insert(key.to_string(), previous);
                return Err(err);
            }
        }
        Ok(())
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

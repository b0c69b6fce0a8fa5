//! Key-value persistence primitives for CRTPad.
//! CRTPad 的鍵值持久化基礎元件。

mod adapter;
mod file;
mod memory;

pub use adapter::StorageAdapter;
pub use file::FileStore;
pub use memory::MemoryStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 同步、以字串為鍵值的儲存後端。 / A synchronous, string-keyed, string-valued storage backend.
pub trait KeyValueStore {
    /// 讀取鍵值；不存在時回傳 `Ok(None)`。 / Reads a value, returning `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 寫入或覆寫鍵值。 / Inserts or overwrites a value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// 移除鍵值；不存在時視為成功。 / Removes a value; removing a missing key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// 儲存後端可能回報的錯誤。 / Faults a storage backend may report.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded while writing '{key}' ({needed} bytes needed, quota {quota})")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    #[error("storage is disabled")]
    Disabled,
    #[error("storage file {path} is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::KeyValueStore;

/// 儲存後端的防護邊界：所有錯誤都會記錄並吞下。 / Guarded boundary around a store: every fault is logged and swallowed.
///
/// Reads that fail look like absent keys, writes that fail return `false`.
/// Callers treat persistence as best effort.
#[derive(Debug)]
pub struct StorageAdapter<S> {
    store: S,
}

impl<S: KeyValueStore> StorageAdapter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 讀取字串值；失敗時回傳 `None`。 / Reads a string value, returning `None` on any fault.
    pub fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "storage read failed");
                None
            }
        }
    }

    /// 寫入字串值並回報是否成功。 / Writes a string value and reports success.
    pub fn write(&mut self, key: &str, value: &str) -> bool {
        match self.store.set(key, value) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, error = %err, "storage write failed");
                false
            }
        }
    }

    /// 移除鍵值並回報是否成功。 / Removes a key and reports success.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key, error = %err, "storage remove failed");
                false
            }
        }
    }

    /// 讀取並反序列化 JSON；缺少或損毀時回傳 `None`。 / Reads and decodes JSON; absent or malformed values yield `None`.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value is not valid JSON");
                None
            }
        }
    }

    /// 序列化為 JSON 後寫入。 / Encodes `value` as JSON and writes it.
    pub fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.write(key, &raw),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to serialize value for storage");
                false
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn quota_failure_is_reported_as_false() {
        let mut adapter = StorageAdapter::new(MemoryStore::with_quota(8));
        assert!(adapter.write("k", "short"));
        assert!(!adapter.write("k", "far too long for the quota"));
        assert_eq!(adapter.read("k").as_deref(), Some("short"));
    }

    #[test]
    fn disabled_store_reads_as_absent() {
        let mut adapter = StorageAdapter::new(MemoryStore::disabled());
        assert!(adapter.read("k").is_none());
        assert!(!adapter.write("k", "v"));
        assert!(!adapter.remove("k"));
    }

    #[test]
    fn malformed_json_reads_as_absent() {
        let adapter = StorageAdapter::new(MemoryStore::new().seeded("list", "[1, 2"));
        let decoded: Option<Vec<u32>> = adapter.read_json("list");
        assert!(decoded.is_none());
    }

    #[test]
    fn json_round_trip() {
        let mut adapter = StorageAdapter::new(MemoryStore::new());
        assert!(adapter.write_json("list", &[1u32, 2, 3]));
        let decoded: Option<Vec<u32>> = adapter.read_json("list");
        assert_eq!(decoded, Some(vec![1, 2, 3]));
        assert_eq!(adapter.store().write_count("list"), 1);
    }
}

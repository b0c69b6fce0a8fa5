use std::collections::BTreeMap;

use crate::{KeyValueStore, StorageError};

/// 記憶體內的鍵值儲存，可模擬容量上限與停用狀態。 / In-memory store that can emulate a byte quota or disabled storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    disabled: bool,
    writes: BTreeMap<String, usize>,
}

impl MemoryStore {
    /// 建立無容量限制的空白儲存。 / Creates an empty store without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// 建立具有位元組上限的儲存。 / Creates a store limited to `quota` bytes of keys plus values.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// 建立所有操作皆失敗的儲存。 / Creates a store on which every operation fails.
    pub fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    /// 以既有項目預先填入。 / Seeds the store with an entry, bypassing quota and write counters.
    pub fn seeded(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// 指定鍵成功寫入的次數。 / Number of successful writes recorded for `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.writes.get(key).copied().unwrap_or_default()
    }

    /// 目前使用的位元組數。 / Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 直接讀取項目（測試與除錯用）。 / Peeks at a raw entry without going through the trait.
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|value| value.as_str())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.disabled {
            return Err(StorageError::Disabled);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Disabled);
        }
        if let Some(quota) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map(|existing| key.len() + existing.len())
                .unwrap_or_default();
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        *self.writes.entry(key.to_string()).or_default() += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Disabled);
        }
        self.entries.remove(key);
        Ok(())
    }
}

use std::path::Path;
use std::time::{Duration, Instant};

use crtpad_storage::{KeyValueStore, StorageAdapter};

use crate::autosave::{AutosaveScheduler, AutosaveTimings, SaveKind};
use crate::document::DocumentId;
use crate::registry::{FileRegistry, StorageKeys};
use crate::transfer::{self, ExportArtifact, ImportError};

/// 一次自動儲存的結果。 / Result of an autosave flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveEvent {
    /// 兩個快照鍵是否都已寫入。 / Whether both snapshot keys were written.
    pub persisted: bool,
    pub at: Instant,
}

/// 前端持有的工作台：文件清單與自動儲存排程。 / Context object owned by the front end.
///
/// Bundles the file registry with the autosave scheduler that flushes it.
///
/// Every call takes the current time from the caller; nothing here sleeps.
#[derive(Debug)]
pub struct Workbench<S> {
    registry: FileRegistry<S>,
    autosave: AutosaveScheduler,
}

impl<S: KeyValueStore> Workbench<S> {
    /// 從儲存後端載入文件清單。 / Bootstraps the registry from `store`.
    pub fn open(store: S, keys: StorageKeys, timings: AutosaveTimings) -> Self {
        Self {
            registry: FileRegistry::bootstrap(StorageAdapter::new(store), keys),
            autosave: AutosaveScheduler::new(timings),
        }
    }

    pub fn registry(&self) -> &FileRegistry<S> {
        &self.registry
    }

    pub fn store(&self) -> &S {
        self.registry.storage().store()
    }

    /// 編輯器的變更通知。 / Change notification from the editor widget.
    ///
    /// Content is applied immediately; persistence waits for the quiet period.
    pub fn edit(&mut self, id: &DocumentId, content: impl Into<String>, now: Instant) -> bool {
        if !self.registry.update_content(id, content) {
            return false;
        }
        self.autosave.note_edit(now);
        true
    }

    pub fn edit_active(&mut self, content: impl Into<String>, now: Instant) -> bool {
        let id = self.registry.active_id().clone();
        self.edit(&id, content, now)
    }

    /// 推進計時器。 / Drives timers.
    ///
    /// Flushes the snapshot once the quiet period has elapsed and hides an
    /// expired indicator.
    pub fn tick(&mut self, now: Instant) -> Option<AutosaveEvent> {
        self.autosave.expire_indicator(now);
        if !self.autosave.take_due(now) {
            return None;
        }
        let persisted = self.registry.persist();
        self.autosave.show_saved(now, SaveKind::Autosave);
        tracing::info!(persisted, documents = self.registry.len(), "autosave flushed");
        Some(AutosaveEvent { persisted, at: now })
    }

    /// 取得目前文件的下載內容，不改變狀態。 / Snapshot of the active document as a download, without side effects.
    pub fn active_artifact(&self) -> ExportArtifact {
        ExportArtifact::from_document(self.registry.active())
    }

    /// 明確儲存：寫入成功後才清除修改標記。 / Explicit save, committed only after `write` succeeds.
    ///
    /// On success the modified flag is cleared, the registry is persisted
    /// right away and the indicator is shown. A failed write leaves the
    /// registry untouched.
    pub fn save_active<T, E>(
        &mut self,
        now: Instant,
        write: impl FnOnce(&ExportArtifact) -> Result<T, E>,
    ) -> Result<T, E> {
        let artifact = self.active_artifact();
        let written = write(&artifact)?;
        let id = self.registry.active_id().clone();
        self.registry.mark_saved(&id);
        self.autosave.show_saved(now, SaveKind::Explicit);
        Ok(written)
    }

    pub fn create(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        language_hint: Option<&str>,
    ) -> DocumentId {
        self.registry.create_document(name, content, language_hint)
    }

    pub fn new_file(&mut self) -> DocumentId {
        self.registry.new_file()
    }

    /// 開啟本機檔案為新文件。 / Opens a local file as a new document.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<DocumentId, ImportError> {
        let imported = transfer::read_text_file(path)?;
        Ok(self
            .registry
            .create_document(imported.name, imported.content, None))
    }

    /// 以已讀入的位元組建立新文件。 / Opens already-read bytes (e.g. from a file picker) as a new document.
    pub fn import_bytes(&mut self, name: impl Into<String>, bytes: &[u8]) -> DocumentId {
        let content = transfer::decode_text(bytes);
        self.registry.create_document(name, content, None)
    }

    pub fn close(&mut self, id: &DocumentId) -> bool {
        self.registry.close_document(id)
    }

    pub fn switch(&mut self, id: &DocumentId) -> bool {
        self.registry.switch_active(id)
    }

    pub fn saved_indicator_visible(&self, now: Instant) -> bool {
        self.autosave.indicator_visible(now)
    }

    pub fn has_pending_autosave(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.autosave.next_wakeup(now)
    }

    /// 關閉工作台；待處理的儲存會被捨棄。 / Teardown: a pending flush is dropped, not forced.
    pub fn shutdown(&mut self) {
        if self.autosave.cancel() {
            tracing::debug!("pending autosave dropped at shutdown");
        }
    }

    pub fn into_registry(self) -> FileRegistry<S> {
        self.registry
    }
}

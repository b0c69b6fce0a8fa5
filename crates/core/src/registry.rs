use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crtpad_storage::{KeyValueStore, StorageAdapter};

use crate::document::{Document, DocumentId};

/// 沒有任何保存資料時建立的預設內容。 / Content of the document materialized when nothing was persisted.
pub const WELCOME_TEXT: &str = "// Welcome to CRTPad\n// Start coding your post-apocalyptic software...\n\nconsole.log(\"Hello, Wasteland!\");";

/// 快照在儲存後端中使用的鍵。 / Keys under which the registry snapshot is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// 文件清單（JSON 陣列）。 / Document list, stored as a JSON array.
    pub documents: String,
    /// 作用中文件識別子（純文字）。 / Active document id, stored as plain text.
    pub active: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            documents: "crtpad-files".into(),
            active: "crtpad-active-file".into(),
        }
    }
}

/// 建立預設的歡迎文件。 / Builds the default welcome document.
pub fn default_document() -> Document {
    Document::with_language(DocumentId::new("1"), "main.js", WELCOME_TEXT, "javascript")
}

/// 開啟中文件的清單與作用中分頁。 / The list of open documents and the active tab.
///
/// Invariants: the list is never empty, ids are unique, and the active id
/// always resolves to a member of the list.
#[derive(Debug)]
pub struct FileRegistry<S> {
    storage: StorageAdapter<S>,
    keys: StorageKeys,
    documents: Vec<Document>,
    active: DocumentId,
    ids: IdGenerator,
}

impl<S: KeyValueStore> FileRegistry<S> {
    /// 從儲存的快照還原；缺少或損毀時退回單一預設文件。 / Restores from the persisted snapshot, falling back to a single default document.
    pub fn bootstrap(storage: StorageAdapter<S>, keys: StorageKeys) -> Self {
        let documents = match storage.read_json::<Vec<Document>>(&keys.documents) {
            Some(documents) if !documents.is_empty() => dedupe_ids(documents),
            Some(_) => {
                tracing::warn!(key = %keys.documents, "persisted document list is empty");
                vec![default_document()]
            }
            None => vec![default_document()],
        };

        let active = storage
            .read(&keys.active)
            .map(DocumentId::from)
            .filter(|id| documents.iter().any(|doc| doc.id() == id))
            .unwrap_or_else(|| documents[0].id().clone());

        tracing::debug!(documents = documents.len(), active = %active, "registry bootstrapped");
        Self {
            storage,
            keys,
            documents,
            active,
            ids: IdGenerator::default(),
        }
    }

    /// 新增文件並設為作用中，立即寫入快照。 / Appends a document, activates it and persists the snapshot.
    pub fn create_document(
        &mut self,
        name: impl Into<String>,
        content: impl Into<String>,
        language_hint: Option<&str>,
    ) -> DocumentId {
        let documents = &self.documents;
        let id = self
            .ids
            .next(|candidate| documents.iter().any(|doc| doc.id() == candidate));
        let document = match language_hint {
            Some(language) => Document::with_language(id.clone(), name, content, language),
            None => Document::new(id.clone(), name, content),
        };
        tracing::debug!(id = %id, name = document.name(), language = document.language(), "document created");
        self.documents.push(document);
        self.active = id.clone();
        self.persist();
        id
    }

    /// 以 `untitled-N.txt` 命名建立空白文件。 / Creates an empty `untitled-N.txt` document.
    pub fn new_file(&mut self) -> DocumentId {
        let name = format!("untitled-{}.txt", self.documents.len() + 1);
        self.create_document(name, String::new(), None)
    }

    /// 取代內容並標記為已修改；不立即寫入。 / Replaces content and marks the document modified without persisting.
    pub fn update_content(&mut self, id: &DocumentId, content: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(document) => {
                document.replace_content(content.into());
                true
            }
            None => {
                tracing::debug!(id = %id, "ignoring edit for unknown document");
                false
            }
        }
    }

    /// 關閉文件；僅剩一個時忽略。 / Closes a document; ignored when it is the last one.
    pub fn close_document(&mut self, id: &DocumentId) -> bool {
        if self.documents.len() <= 1 {
            tracing::debug!(id = %id, "refusing to close the last document");
            return false;
        }
        let Some(index) = self.position(id) else {
            return false;
        };

        self.documents.remove(index);
        self.persist_documents();
        if &self.active == id {
            self.active = self.documents[0].id().clone();
            self.persist_active();
        }
        tracing::debug!(id = %id, active = %self.active, "document closed");
        true
    }

    /// 切換作用中分頁並立即寫入。 / Switches the active tab and persists it immediately.
    pub fn switch_active(&mut self, id: &DocumentId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.active = id.clone();
        self.persist_active();
        true
    }

    /// 清除已修改旗標並同步寫入清單。 / Clears the modified flag and persists the list synchronously.
    pub fn mark_saved(&mut self, id: &DocumentId) -> bool {
        match self.get_mut(id) {
            Some(document) => {
                document.mark_saved();
                self.persist_documents();
                true
            }
            None => false,
        }
    }

    /// 寫入完整快照。 / Writes the full snapshot, documents first.
    pub fn persist(&mut self) -> bool {
        let documents = self.persist_documents();
        let active = self.persist_active();
        documents && active
    }

    pub fn persist_documents(&mut self) -> bool {
        self.storage
            .write_json(&self.keys.documents, &self.documents)
    }

    pub fn persist_active(&mut self) -> bool {
        self.storage.write(&self.keys.active, self.active.as_str())
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn active_id(&self) -> &DocumentId {
        &self.active
    }

    pub fn active(&self) -> &Document {
        self.get(&self.active)
            .unwrap_or_else(|| &self.documents[0])
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id() == id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn storage(&self) -> &StorageAdapter<S> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut StorageAdapter<S> {
        &mut self.storage
    }

    pub fn into_storage(self) -> StorageAdapter<S> {
        self.storage
    }

    fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|doc| doc.id() == id)
    }

    fn get_mut(&mut self, id: &DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|doc| doc.id() == id)
    }
}

fn dedupe_ids(documents: Vec<Document>) -> Vec<Document> {
    let mut seen = HashSet::new();
    let total = documents.len();
    let unique: Vec<Document> = documents
        .into_iter()
        .filter(|doc| seen.insert(doc.id().clone()))
        .collect();
    if unique.len() != total {
        tracing::warn!(
            dropped = total - unique.len(),
            "persisted document list contained duplicate ids"
        );
    }
    unique
}

/// 以毫秒時間戳產生單調遞增的識別子。 / Produces strictly increasing millisecond-timestamp ids.
#[derive(Debug, Default)]
struct IdGenerator {
    last: u128,
}

impl IdGenerator {
    fn next(&mut self, taken: impl Fn(&DocumentId) -> bool) -> DocumentId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        self.next_at(now, taken)
    }

    fn next_at(&mut self, now_ms: u128, taken: impl Fn(&DocumentId) -> bool) -> DocumentId {
        let mut candidate = now_ms.max(self.last + 1);
        while taken(&DocumentId::new(candidate.to_string())) {
            candidate += 1;
        }
        self.last = candidate;
        DocumentId::new(candidate.to_string())
    }
}

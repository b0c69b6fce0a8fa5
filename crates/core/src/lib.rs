//! Document registry, autosave scheduling and file transfer for CRTPad.
//! CRTPad 的文件清單、自動儲存排程與檔案匯入匯出。

pub mod autosave;
pub mod document;
pub mod language;
pub mod registry;
pub mod transfer;
pub mod workbench;

pub use autosave::{AutosaveScheduler, AutosaveTimings, Debouncer, SaveKind, SavedIndicator};
pub use document::{Document, DocumentId};
pub use language::{derive_language, known_extensions, PLAINTEXT};
pub use registry::{default_document, FileRegistry, StorageKeys, WELCOME_TEXT};
pub use transfer::{ExportArtifact, ExportError, ImportError, ImportedText};
pub use workbench::{AutosaveEvent, Workbench};

use crtpad_core::{default_document, DocumentId, FileRegistry, StorageKeys, WELCOME_TEXT};
use crtpad_storage::{FileStore, KeyValueStore, MemoryStore, StorageAdapter};
use tempfile::tempdir;

fn bootstrap(store: MemoryStore) -> FileRegistry<MemoryStore> {
    FileRegistry::bootstrap(StorageAdapter::new(store), StorageKeys::default())
}

fn reopen(registry: FileRegistry<MemoryStore>) -> FileRegistry<MemoryStore> {
    bootstrap(registry.into_storage().into_inner())
}

fn assert_invariants<S: KeyValueStore>(registry: &FileRegistry<S>) {
    assert!(!registry.is_empty(), "registry must never be empty");
    assert!(
        registry.contains(registry.active_id()),
        "active id {} must resolve",
        registry.active_id()
    );
}

#[test]
fn absent_state_yields_single_default_document() {
    let registry = bootstrap(MemoryStore::new());
    assert_eq!(registry.len(), 1);
    let doc = registry.active();
    assert_eq!(doc, &default_document());
    assert_eq!(doc.name(), "main.js");
    assert_eq!(doc.language(), "javascript");
    assert_eq!(doc.content(), WELCOME_TEXT);
    assert!(!doc.is_modified());
}

#[test]
fn corrupt_state_yields_single_default_document() {
    let store = MemoryStore::new()
        .seeded("crtpad-files", "{ definitely not a list")
        .seeded("crtpad-active-file", "12345");
    let registry = bootstrap(store);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.active_id().as_str(), "1");
    assert!(!registry.active().is_modified());
}

#[test]
fn empty_persisted_list_falls_back_to_default() {
    let registry = bootstrap(MemoryStore::new().seeded("crtpad-files", "[]"));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.active().name(), "main.js");
}

#[test]
fn disabled_storage_still_bootstraps_and_operates() {
    let mut registry = bootstrap(MemoryStore::disabled());
    let id = registry.create_document("notes.md", "# notes", None);
    assert_eq!(registry.active_id(), &id);
    assert!(registry.close_document(&id));
    assert_invariants(&registry);
}

#[test]
fn stale_active_id_falls_back_to_first_document() {
    let mut registry = bootstrap(MemoryStore::new());
    let second = registry.create_document("b.txt", "b", None);
    assert!(registry.persist());

    let mut store = registry.into_storage().into_inner();
    store.set("crtpad-active-file", "does-not-exist").unwrap();
    let registry = bootstrap(store);
    assert_eq!(registry.active_id().as_str(), "1");
    assert!(registry.contains(&second));
}

#[test]
fn created_document_is_active_and_unmodified() {
    let mut registry = bootstrap(MemoryStore::new());
    let id = registry.create_document("a.ts", "let x=1;", None);

    let active = registry.active();
    assert_eq!(active.id(), &id);
    assert_eq!(active.language(), "typescript");
    assert!(!active.is_modified());
    assert_eq!(active.content(), "let x=1;");
}

#[test]
fn create_persists_both_keys_immediately() {
    let mut registry = bootstrap(MemoryStore::new());
    let id = registry.create_document("x.go", "package main", None);
    let store = registry.storage().store();
    assert_eq!(store.write_count("crtpad-files"), 1);
    assert_eq!(store.peek("crtpad-active-file"), Some(id.as_str()));
}

#[test]
fn closing_the_only_document_is_a_no_op() {
    let mut registry = bootstrap(MemoryStore::new());
    let before = registry.documents().to_vec();
    let active = registry.active_id().clone();

    assert!(!registry.close_document(&active));
    assert!(!registry.close_document(&active));
    assert_eq!(registry.documents(), before.as_slice());
    assert_eq!(registry.active_id(), &active);
    assert_eq!(registry.storage().store().write_count("crtpad-files"), 0);
}

#[test]
fn closing_active_document_activates_first_remaining() {
    let mut registry = bootstrap(MemoryStore::new());
    let second = registry.create_document("two.txt", "", None);
    let third = registry.create_document("three.txt", "", None);
    assert_eq!(registry.active_id(), &third);

    assert!(registry.close_document(&third));
    assert_eq!(registry.active_id().as_str(), "1");
    assert_eq!(
        registry.storage().store().peek("crtpad-active-file"),
        Some("1")
    );

    assert!(registry.switch_active(&second));
    assert!(registry.close_document(&second));
    assert_eq!(registry.active_id().as_str(), "1");
}

#[test]
fn closing_inactive_document_keeps_active() {
    let mut registry = bootstrap(MemoryStore::new());
    let second = registry.create_document("two.txt", "", None);
    assert!(registry.close_document(&DocumentId::new("1")));
    assert_eq!(registry.active_id(), &second);
    assert_eq!(registry.len(), 1);
}

#[test]
fn closing_unknown_document_is_ignored() {
    let mut registry = bootstrap(MemoryStore::new());
    registry.create_document("two.txt", "", None);
    assert!(!registry.close_document(&DocumentId::new("ghost")));
    assert_eq!(registry.len(), 2);
}

#[test]
fn invariants_hold_across_create_close_sequences() {
    let mut registry = bootstrap(MemoryStore::new());
    let mut created = Vec::new();
    for round in 0..12 {
        if round % 3 == 2 {
            let target = created
                .pop()
                .unwrap_or_else(|| registry.active_id().clone());
            registry.close_document(&target);
        } else {
            created.push(registry.create_document(format!("f{round}.rs"), "", None));
        }
        assert_invariants(&registry);
    }

    let ids: Vec<_> = registry.documents().iter().map(|d| d.id().clone()).collect();
    for id in ids {
        registry.close_document(&id);
        assert_invariants(&registry);
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn update_content_marks_modified_without_persisting() {
    let mut registry = bootstrap(MemoryStore::new());
    let id = registry.active_id().clone();
    assert!(registry.update_content(&id, "changed"));

    let doc = registry.active();
    assert_eq!(doc.content(), "changed");
    assert!(doc.is_modified());
    assert_eq!(doc.name(), "main.js");
    assert_eq!(doc.language(), "javascript");
    assert_eq!(registry.storage().store().write_count("crtpad-files"), 0);
}

#[test]
fn persist_then_bootstrap_round_trips() {
    let mut registry = bootstrap(MemoryStore::new());
    let py = registry.create_document("main.py", "print(1)", None);
    let md = registry.create_document("README.md", "# readme", None);
    registry.update_content(&py, "print(2)");
    registry.switch_active(&py);
    assert!(registry.persist());

    let documents = registry.documents().to_vec();
    let active = registry.active_id().clone();
    let restored = reopen(registry);

    assert_eq!(restored.documents(), documents.as_slice());
    assert_eq!(restored.active_id(), &active);
    assert!(restored.get(&py).unwrap().is_modified());
    assert!(!restored.get(&md).unwrap().is_modified());
}

#[test]
fn mark_saved_clears_modified_in_persisted_state() {
    let mut registry = bootstrap(MemoryStore::new());
    let id = registry.active_id().clone();
    registry.update_content(&id, "edited");
    assert!(registry.mark_saved(&id));

    let restored = reopen(registry);
    assert_eq!(restored.active().content(), "edited");
    assert!(!restored.active().is_modified());
}

#[test]
fn file_store_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let created = {
        let store = FileStore::open(&path).unwrap();
        let mut registry = FileRegistry::bootstrap(StorageAdapter::new(store), StorageKeys::default());
        registry.create_document("lib.rs", "pub fn f() {}", None)
    };

    let store = FileStore::open(&path).unwrap();
    let registry = FileRegistry::bootstrap(StorageAdapter::new(store), StorageKeys::default());
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.active_id(), &created);
    assert_eq!(registry.active().language(), "rust");
}

#[test]
fn custom_keys_are_honoured() {
    let keys = StorageKeys {
        documents: "docs".into(),
        active: "current".into(),
    };
    let mut registry = FileRegistry::bootstrap(StorageAdapter::new(MemoryStore::new()), keys);
    let id = registry.create_document("a.c", "", None);
    let store = registry.storage().store();
    assert!(store.peek("docs").is_some());
    assert_eq!(store.peek("current"), Some(id.as_str()));
    assert!(store.peek("crtpad-files").is_none());
}

use std::fs;
use std::time::{Duration, Instant};

use crtpad_core::{AutosaveTimings, FileRegistry, StorageKeys, Workbench};
use crtpad_storage::{MemoryStore, StorageAdapter};
use tempfile::tempdir;

const FILES_KEY: &str = "crtpad-files";

fn workbench() -> Workbench<MemoryStore> {
    Workbench::open(
        MemoryStore::new(),
        StorageKeys::default(),
        AutosaveTimings::default(),
    )
}

fn restart(workbench: Workbench<MemoryStore>) -> FileRegistry<MemoryStore> {
    let store = workbench.into_registry().into_storage().into_inner();
    FileRegistry::bootstrap(StorageAdapter::new(store), StorageKeys::default())
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn rapid_edits_coalesce_into_one_flush_with_last_content() {
    let start = Instant::now();
    let mut bench = workbench();

    for i in 0..10u64 {
        let at = start + ms(i * 150);
        assert!(bench.edit_active(format!("revision {i}"), at));
        assert!(bench.tick(at).is_none());
    }
    assert_eq!(bench.store().write_count(FILES_KEY), 0);

    let last_edit = start + ms(9 * 150);
    assert!(bench.tick(last_edit + ms(1999)).is_none());
    let event = bench.tick(last_edit + ms(2000)).expect("flush due");
    assert!(event.persisted);
    assert!(bench.tick(last_edit + ms(5000)).is_none());

    assert_eq!(bench.store().write_count(FILES_KEY), 1);
    let persisted = bench.store().peek(FILES_KEY).unwrap().to_string();
    assert!(persisted.contains("revision 9"));
    assert!(!persisted.contains("revision 8"));
}

#[test]
fn autosave_does_not_clear_modified() {
    let start = Instant::now();
    let mut bench = workbench();
    bench.edit_active("draft", start);
    bench.tick(start + ms(2000)).expect("flush");

    assert!(bench.registry().active().is_modified());
    let restored = restart(bench);
    assert_eq!(restored.active().content(), "draft");
    assert!(restored.active().is_modified());
}

#[test]
fn explicit_save_clears_modified_and_persists_immediately() {
    let start = Instant::now();
    let mut bench = workbench();
    bench.edit_active("final text", start);

    let artifact = bench
        .save_active(start + ms(10), |artifact| Ok::<_, ()>(artifact.clone()))
        .expect("in-memory save");
    assert_eq!(artifact.file_name, "main.js");
    assert_eq!(artifact.contents, "final text");
    assert!(!bench.registry().active().is_modified());
    assert_eq!(bench.store().write_count(FILES_KEY), 1);

    let restored = restart(bench);
    assert_eq!(restored.active().content(), "final text");
    assert!(!restored.active().is_modified());
}

#[test]
fn failed_save_write_keeps_document_modified() {
    let start = Instant::now();
    let mut bench = workbench();
    bench.edit_active("unsaved", start);
    bench.tick(start + ms(2000)).expect("flush");
    let writes = bench.store().write_count(FILES_KEY);

    let result = bench.save_active(start + ms(2500), |_| Err::<(), _>("disk full"));
    assert_eq!(result, Err("disk full"));
    assert!(bench.registry().active().is_modified());
    assert!(!bench.saved_indicator_visible(start + ms(3500)));
    assert_eq!(bench.store().write_count(FILES_KEY), writes);

    let restored = restart(bench);
    assert!(restored.active().is_modified());
}

#[test]
fn pending_autosave_after_save_writes_current_state() {
    let start = Instant::now();
    let mut bench = workbench();
    bench.edit_active("text", start);
    bench
        .save_active(start + ms(100), |_| Ok::<_, ()>(()))
        .expect("in-memory save");
    bench.tick(start + ms(2000)).expect("flush still fires");

    let restored = restart(bench);
    assert!(!restored.active().is_modified());
}

#[test]
fn saved_indicator_is_transient() {
    let start = Instant::now();
    let mut bench = workbench();
    bench.edit_active("x", start);
    let flushed_at = start + ms(2000);
    bench.tick(flushed_at).expect("flush");

    assert!(bench.saved_indicator_visible(flushed_at + ms(500)));
    bench.tick(flushed_at + ms(1000));
    assert!(!bench.saved_indicator_visible(flushed_at + ms(1000)));

    bench
        .save_active(flushed_at + ms(3000), |_| Ok::<_, ()>(()))
        .expect("in-memory save");
    assert!(bench.saved_indicator_visible(flushed_at + ms(4500)));
    assert!(!bench.saved_indicator_visible(flushed_at + ms(5000)));
}

#[test]
fn shutdown_drops_pending_flush() {
    let start = Instant::now();
    let mut bench = workbench();
    bench.edit_active("lost on teardown", start);
    assert!(bench.has_pending_autosave());
    bench.shutdown();
    assert!(!bench.has_pending_autosave());
    assert!(bench.tick(start + ms(10_000)).is_none());

    let restored = restart(bench);
    assert_ne!(restored.active().content(), "lost on teardown");
}

#[test]
fn edits_to_unknown_documents_do_not_schedule() {
    let start = Instant::now();
    let mut bench = workbench();
    assert!(!bench.edit(&"missing".into(), "x", start));
    assert!(!bench.has_pending_autosave());
}

#[test]
fn edits_to_background_documents_are_kept() {
    let start = Instant::now();
    let mut bench = workbench();
    let first = bench.registry().active_id().clone();
    bench.new_file();
    assert!(bench.edit(&first, "background edit", start));
    bench.tick(start + ms(2000)).expect("flush");

    let restored = restart(bench);
    assert_eq!(restored.get(&first).unwrap().content(), "background edit");
}

#[test]
fn import_file_derives_language_and_activates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("query.SQL");
    fs::write(&path, "select 1;").unwrap();

    let mut bench = workbench();
    let id = bench.import_file(&path).unwrap();
    let doc = bench.registry().active();
    assert_eq!(doc.id(), &id);
    assert_eq!(doc.name(), "query.SQL");
    assert_eq!(doc.language(), "sql");
    assert_eq!(doc.content(), "select 1;");
    assert!(!doc.is_modified());
}

#[test]
fn import_bytes_decodes_text() {
    let mut bench = workbench();
    bench.import_bytes("page.html", b"\xEF\xBB\xBF<p>hi</p>");
    assert_eq!(bench.registry().active().content(), "<p>hi</p>");
    assert_eq!(bench.registry().active().language(), "html");
}

#[test]
fn custom_quiet_period_is_respected() {
    let start = Instant::now();
    let timings = AutosaveTimings {
        quiet_period: ms(50),
        ..AutosaveTimings::default()
    };
    let mut bench = Workbench::open(MemoryStore::new(), StorageKeys::default(), timings);
    bench.edit_active("quick", start);
    assert_eq!(bench.next_wakeup(start), Some(ms(50)));
    assert!(bench.tick(start + ms(50)).is_some());
}

//! Entry store and preferences against the on-disk store

use freewrite::entry::Entry;
use freewrite::entry_store::{EntryStore, ENTRIES_KEY};
use freewrite::preferences::{Preferences, Toggle, DARK_MODE_KEY};
use freewrite::storage::{FileStore, KeyValueStore};
use freewrite::FreewriteError;
use std::fs;
use tempfile::TempDir;

fn open(temp: &TempDir) -> EntryStore<FileStore> {
    EntryStore::open(FileStore::open(temp.path()).unwrap()).unwrap()
}

#[test]
fn test_fresh_directory_yields_one_selected_empty_entry() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp);

    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.selected_id(), Some(store.entries()[0].id.as_str()));
    assert_eq!(store.buffer(), "");

    // Creating an entry does not write anything yet
    assert!(!temp.path().join(ENTRIES_KEY).exists());
}

#[test]
fn test_save_survives_reload() {
    let temp = TempDir::new().unwrap();
    let selected = {
        let mut store = open(&temp);
        store.save("first draft").unwrap();
        store.create();
        store.save("second draft\nwith two lines").unwrap();
        store.selected_id().unwrap().to_string()
    };

    let reloaded = open(&temp);
    assert_eq!(reloaded.entries().len(), 2);
    assert_eq!(reloaded.selected_id(), Some(selected.as_str()));
    assert_eq!(reloaded.buffer(), "second draft\nwith two lines");
    assert_eq!(reloaded.entries()[1].content, "first draft");
}

#[test]
fn test_persisted_layout_is_json_array_of_camel_case_entries() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp);
    store.save("hello\nworld, this is a long line that exceeds thirty chars").unwrap();

    let raw = fs::read_to_string(temp.path().join(ENTRIES_KEY)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &json.as_array().unwrap()[0];
    assert_eq!(first["previewText"], "hello world, this is a long li...");
    assert!(first["filename"].as_str().unwrap().ends_with("].md"));
    assert!(first["date"].is_string());
}

#[test]
fn test_delete_persists_and_reload_picks_first() {
    let temp = TempDir::new().unwrap();
    let doomed = {
        let mut store = open(&temp);
        store.save("keep me").unwrap();
        store.create();
        store.save("delete me").unwrap();
        let doomed = store.selected_id().unwrap().to_string();
        store.delete(&doomed).unwrap();
        assert_eq!(store.buffer(), "keep me");
        doomed
    };

    let reloaded = open(&temp);
    assert_eq!(reloaded.entries().len(), 1);
    assert!(reloaded.entries().iter().all(|e| e.id != doomed));
    assert_eq!(reloaded.buffer(), "keep me");
}

#[test]
fn test_malformed_file_recovers_with_fresh_entry() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(ENTRIES_KEY), "[{\"id\": 1, \"broken\": true}").unwrap();

    let mut store = open(&temp);
    assert_eq!(store.entries().len(), 1);
    assert!(store.entries()[0].content.is_empty());

    // The next save replaces the malformed data
    store.save("recovered").unwrap();
    let raw = fs::read_to_string(temp.path().join(ENTRIES_KEY)).unwrap();
    let entries: Vec<Entry> = serde_json::from_str(&raw).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, "recovered");
}

#[test]
fn test_write_failure_surfaces_as_storage_error() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp);

    fs::create_dir(temp.path().join(ENTRIES_KEY)).unwrap();
    fs::write(temp.path().join(ENTRIES_KEY).join("blocker"), "").unwrap();

    let err = store.save("unsaved work").unwrap_err();
    assert!(matches!(err, FreewriteError::Storage { ref key, .. } if key == ENTRIES_KEY));
    assert_eq!(store.buffer(), "unsaved work");
}

#[test]
fn test_failed_write_keeps_store_dirty_until_retry() {
    let temp = TempDir::new().unwrap();
    let mut store = open(&temp);
    let blocker = temp.path().join(ENTRIES_KEY);
    fs::create_dir(&blocker).unwrap();
    fs::write(blocker.join("blocker"), "").unwrap();

    store.set_buffer("precious");
    assert!(store.save_buffer().is_err());
    assert!(store.is_dirty());
    assert!(store.has_pending_write());

    fs::remove_dir_all(&blocker).unwrap();
    store.save_buffer().unwrap();
    assert!(!store.is_dirty());

    let reloaded = open(&temp);
    assert_eq!(reloaded.buffer(), "precious");
}

#[test]
fn test_preferences_persist_independently_of_entries() {
    let temp = TempDir::new().unwrap();
    let mut kv = FileStore::open(temp.path()).unwrap();

    let before = Preferences::default();
    let after = before.toggled(Toggle::DarkMode);
    after.persist_changes(&before, &mut kv).unwrap();

    assert_eq!(
        fs::read_to_string(temp.path().join(DARK_MODE_KEY)).unwrap(),
        "true"
    );
    assert_eq!(kv.get(ENTRIES_KEY).unwrap(), None);

    let reopened = FileStore::open(temp.path()).unwrap();
    assert!(Preferences::load(&reopened).unwrap().dark_mode);
}

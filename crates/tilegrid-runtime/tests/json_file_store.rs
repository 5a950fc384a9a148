//! `JsonFileStore` on a real filesystem.
//!
//! Run:
//!   cargo test -p tilegrid-runtime --features state-persistence --test json_file_store

use tilegrid_core::item::{Item, ItemId};
use tilegrid_runtime::{
    CollaboratorError, EditorConfig, GridEditor, JsonFileStore, NoopObserver, SelectionStore,
};

fn items(ids: &[u64]) -> Vec<Item> {
    ids.iter().map(|&i| Item::new(i, format!("item-{i}"))).collect()
}

#[test]
fn missing_file_reads_as_nothing_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("selection.json"));
    assert_eq!(store.load_selection().unwrap(), None);
    assert_eq!(store.load_active_id().unwrap(), None);
}

#[test]
fn fields_are_saved_independently() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selection.json");
    let mut store = JsonFileStore::new(&path);

    store.save_selection(&items(&[0, 3, 1])).unwrap();
    assert_eq!(store.load_active_id().unwrap(), None);

    store.save_active_id(ItemId(3)).unwrap();
    assert_eq!(store.load_selection().unwrap(), Some(items(&[0, 3, 1])));
    assert_eq!(store.load_active_id().unwrap(), Some(ItemId(3)));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["version"], serde_json::json!(1));
    assert_eq!(raw["active_id"], serde_json::json!(3));
    assert_eq!(raw["selection"][1]["name"], serde_json::json!("item-3"));
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn corrupt_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selection.json");
    std::fs::write(&path, "{ not json").unwrap();
    let mut store = JsonFileStore::new(&path);
    assert!(matches!(store.load_selection(), Err(CollaboratorError::Parse(_))));
}

#[test]
fn saving_over_a_corrupt_file_replaces_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selection.json");
    std::fs::write(&path, "{ not json").unwrap();
    let mut store = JsonFileStore::new(&path);

    store.save_selection(&items(&[0, 2])).unwrap();
    store.save_active_id(ItemId(2)).unwrap();
    assert_eq!(store.load_selection().unwrap(), Some(items(&[0, 2])));
    assert_eq!(store.load_active_id().unwrap(), Some(ItemId(2)));
}

#[test]
fn saving_over_an_unknown_version_rewrites_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selection.json");
    std::fs::write(&path, r#"{ "version": 9, "active_id": 2 }"#).unwrap();
    let mut store = JsonFileStore::new(&path);

    store.save_active_id(ItemId(4)).unwrap();
    assert_eq!(store.load_active_id().unwrap(), Some(ItemId(4)));
    assert_eq!(store.load_selection().unwrap(), None);
}

#[test]
fn unknown_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selection.json");
    std::fs::write(&path, r#"{ "version": 9, "active_id": 2 }"#).unwrap();
    let mut store = JsonFileStore::new(&path);
    let err = store.load_active_id().unwrap_err();
    assert!(err.to_string().contains("version"));
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("absent").join("selection.json"));
    assert!(matches!(
        store.save_active_id(ItemId(1)),
        Err(CollaboratorError::Io(_))
    ));
}

#[test]
fn editor_state_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("selection.json");

    let mut first = GridEditor::new(EditorConfig::default(), JsonFileStore::new(&path), NoopObserver);
    first.apply_catalog(Ok(items(&[0, 1, 2, 3]))).unwrap();
    first.toggle_editing().unwrap();
    let now = web_time::Instant::now();
    first.add_item(ItemId(2), now).unwrap();
    first.tick(now + std::time::Duration::from_secs(2));
    assert_eq!(first.selected().len(), 2);
    first.toggle_editing().unwrap();
    first.select(ItemId(0)).unwrap();
    drop(first);

    let second = GridEditor::new(EditorConfig::default(), JsonFileStore::new(&path), NoopObserver);
    let ids: Vec<u64> = second.selected().iter().map(|item| item.id.0).collect();
    assert_eq!(ids, vec![0, 2]);
    assert_eq!(second.active_id(), ItemId(0));
}

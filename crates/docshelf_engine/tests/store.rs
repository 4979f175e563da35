use std::fs;

use docshelf_core::{Catalog, DocumentDescriptor, RosterItem};
use docshelf_engine::{ensure_state_dir, AtomicFileWriter, CatalogStore, StoreError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .reconcile_from_remote(vec![
            RosterItem::new("Week 1", "https://docs.google.com/document/d/W1/edit"),
            RosterItem::new("Loose", "https://example.com/file"),
        ])
        .unwrap();
    catalog
}

#[test]
fn missing_store_loads_placeholder() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path().join("state"));

    assert!(store.try_load().unwrap().is_none());
    assert_eq!(store.load(), Catalog::with_placeholder());
}

#[test]
fn corrupt_store_falls_back_silently() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    fs::write(store.path(), "{ not json").unwrap();

    assert!(matches!(store.try_load(), Err(StoreError::Parse { .. })));
    assert_eq!(store.load(), Catalog::with_placeholder());
}

#[test]
fn persisted_catalog_round_trips() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    let catalog = sample_catalog();

    store.persist(catalog.documents()).unwrap();
    let loaded = store.load();

    assert_eq!(loaded.documents(), catalog.documents());
    assert_eq!(loaded.active_id(), Some("0"));
}

#[test]
fn stored_format_uses_url_and_google_doc_id_fields() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    store.persist(sample_catalog().documents()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(
        raw,
        serde_json::json!([
            {
                "id": "0",
                "name": "Week 1",
                "url": "https://docs.google.com/document/d/W1/preview?embedded=true",
                "googleDocId": "W1"
            },
            {
                "id": "1",
                "name": "Loose",
                "url": "https://example.com/file?embedded=true",
                "googleDocId": null
            }
        ])
    );
}

#[test]
fn persist_of_load_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    store.persist(sample_catalog().documents()).unwrap();

    store.persist(store.load().documents()).unwrap();
    let first = fs::read(store.path()).unwrap();
    store.persist(store.load().documents()).unwrap();
    let second = fs::read(store.path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn stored_entries_without_google_doc_id_are_accepted() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    fs::write(
        store.path(),
        r#"[{"id":"9","name":"Old","url":"https://example.com/p?embedded=true"}]"#,
    )
    .unwrap();

    let loaded = store.load();
    assert_eq!(
        loaded.documents(),
        &[DocumentDescriptor {
            id: "9".to_string(),
            name: "Old".to_string(),
            preview_url: "https://example.com/p?embedded=true".to_string(),
            external_doc_id: None,
        }]
    );
}

#[test]
fn empty_stored_array_is_an_empty_catalog() {
    let temp = TempDir::new().unwrap();
    let store = CatalogStore::new(temp.path());
    store.persist(&[]).unwrap();

    let loaded = store.load();
    assert!(loaded.is_empty());
    assert_eq!(loaded.active_id(), None);
}

#[test]
fn creates_missing_state_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_state_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("catalog.json", "[]").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "[]");

    let second = writer.write("catalog.json", "[1]").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "[1]");
}

#[test]
fn no_partial_file_when_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let store = CatalogStore::new(file_path.clone());
    assert!(store.persist(&[]).is_err());
    assert!(!temp.path().join("catalog.json").exists());
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "x");
}

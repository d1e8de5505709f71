use dock_links_core::{LinkDatabase, LinkRecord, LinkStore, LinkStoreConfig, StoreError, StoreState};
use serde_json::json;
use std::path::Path;

fn open_store(root: &Path) -> LinkStore {
    let mut store = LinkStore::new(LinkStoreConfig::new(root)).unwrap();
    store.ensure_storage_ready().unwrap();
    store
}

#[test]
fn ensure_storage_ready_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    let mut store = LinkStore::new(LinkStoreConfig::new(root.path())).unwrap();
    assert_eq!(store.state(), StoreState::Uninitialized);

    store.ensure_storage_ready().unwrap();
    store.ensure_storage_ready().unwrap();

    assert!(root.path().join("data").is_dir());
    assert_eq!(store.state(), StoreState::DirectoryReady);
    assert_eq!(std::fs::read_dir(root.path().join("data")).unwrap().count(), 0);
}

#[test]
fn missing_file_is_seeded_with_default_database() {
    let root = tempfile::tempdir().unwrap();
    let mut store = open_store(root.path());

    let db = store.open_or_create().unwrap();

    assert_eq!(store.state(), StoreState::Created);
    assert_eq!(
        db,
        LinkDatabase {
            id: 1,
            links: vec![LinkRecord::new(1, "/home/")],
        }
    );
    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&store.paths().db_file).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({ "id": 1, "links": [{ "order": 1, "link": "/home/" }] })
    );
}

#[test]
fn existing_file_is_loaded() {
    let root = tempfile::tempdir().unwrap();
    let data = root.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(
        data.join("links_tray_db.json"),
        r#"{"id":4,"links":[{"order":2,"link":"/srv/"},{"order":1,"link":"file:///etc/"}]}"#,
    )
    .unwrap();
    let mut store = open_store(root.path());

    let db = store.open_or_create().unwrap();

    assert_eq!(store.state(), StoreState::Loaded);
    assert_eq!(db.id, 4);
    assert_eq!(
        db.links,
        vec![LinkRecord::new(2, "/srv/"), LinkRecord::new(1, "file:///etc/")]
    );
}

#[test]
fn corrupt_file_is_quarantined_and_reported() {
    let root = tempfile::tempdir().unwrap();
    let mut store = open_store(root.path());
    let db_file = store.paths().db_file.clone();
    std::fs::write(&db_file, b"not-json").unwrap();

    let err = store.open_or_create().unwrap_err();

    let quarantined_to = match err {
        StoreError::CorruptDatabase { quarantined_to, .. } => quarantined_to,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(quarantined_to.parent(), Some(store.paths().data_dir.as_path()));
    let name = quarantined_to.file_name().unwrap().to_str().unwrap();
    let tag = name.strip_prefix("links_tray_db.json.").unwrap();
    assert!(tag.parse::<u32>().unwrap() < 10_000);
    assert_eq!(std::fs::read(&quarantined_to).unwrap(), b"not-json");
    assert!(!db_file.exists());
    assert_eq!(store.state(), StoreState::DirectoryReady);
}

#[test]
fn wrong_shape_counts_as_corruption() {
    let root = tempfile::tempdir().unwrap();
    let mut store = open_store(root.path());
    std::fs::write(&store.paths().db_file, br#"{"id":1,"links":"/home/"}"#).unwrap();

    let err = store.open_or_create().unwrap_err();
    assert!(matches!(err, StoreError::CorruptDatabase { .. }));
    assert_eq!(err.code(), "corrupt_database");
}

#[test]
fn reopening_after_quarantine_seeds_fresh_database() {
    let root = tempfile::tempdir().unwrap();
    let mut store = open_store(root.path());
    std::fs::write(&store.paths().db_file, b"{").unwrap();

    store.open_or_create().unwrap_err();
    let db = store.open_or_create().unwrap();

    assert_eq!(db, LinkDatabase::default());
    assert_eq!(store.state(), StoreState::Created);
    let files = std::fs::read_dir(&store.paths().data_dir).unwrap().count();
    assert_eq!(files, 2);
}

#[test]
fn save_then_open_returns_equal_database() {
    let root = tempfile::tempdir().unwrap();
    let mut store = open_store(root.path());
    let mut db = store.open_or_create().unwrap();
    db.push(LinkRecord::new(5, "sftp://host/path"));
    db.push_target("/opt/");

    store.save(&db).unwrap();

    assert_eq!(store.open_or_create().unwrap(), db);
}

#[test]
fn add_save_reopen_keeps_insertion_order() {
    let root = tempfile::tempdir().unwrap();
    let mut store = open_store(root.path());
    let mut db = store.open_or_create().unwrap();
    db.push(LinkRecord::new(2, "/tmp/"));
    store.save(&db).unwrap();
    drop(store);

    let mut reopened = open_store(root.path());
    let loaded = reopened.open_or_create().unwrap();

    assert_eq!(
        loaded.links,
        vec![LinkRecord::new(1, "/home/"), LinkRecord::new(2, "/tmp/")]
    );
}

#[test]
fn custom_config_controls_layout_and_seed() {
    let root = tempfile::tempdir().unwrap();
    let mut config = LinkStoreConfig::new(root.path());
    config.data_dir_name = "store".to_string();
    config.db_file_name = "links.json".to_string();
    config.default_schema_id = 2;
    config.default_link = "/media/".to_string();
    let mut store = LinkStore::new(config).unwrap();
    store.ensure_storage_ready().unwrap();

    let db = store.open_or_create().unwrap();

    assert_eq!(db, LinkDatabase::seed(2, "/media/"));
    assert!(root.path().join("store").join("links.json").is_file());
}

#[test]
fn data_path_occupied_by_file_is_directory_error() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("data"), b"").unwrap();
    let mut store = LinkStore::new(LinkStoreConfig::new(root.path())).unwrap();

    let err = store.ensure_storage_ready().unwrap_err();
    assert!(matches!(err, StoreError::Directory { .. }));
    assert_eq!(store.state(), StoreState::Uninitialized);
}

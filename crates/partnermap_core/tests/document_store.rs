use partnermap_core::db::migrations::latest_version;
use partnermap_core::db::{open_db, open_db_in_memory, DbError};
use partnermap_core::{
    sample_document, DocumentStore, Partner, PartnerDocument, RegionCatalog, SqliteDocumentStore,
    StoreError,
};
use rusqlite::Connection;

#[test]
fn fresh_database_has_document_table_at_latest_version() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(
        column_names(&conn),
        vec!["id", "data", "revision", "created_at", "updated_at"]
    );
}

#[test]
fn reopening_a_file_database_keeps_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("partnermap.db");
    let document = sample_document(&RegionCatalog::france());

    let conn = open_db(&path).unwrap();
    SqliteDocumentStore::new(&conn)
        .write("france", &document)
        .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let stored = SqliteDocumentStore::new(&conn)
        .read("france")
        .unwrap()
        .unwrap();
    assert_eq!(stored, serde_json::to_value(&document).unwrap());
}

#[test]
fn rows_written_outside_the_store_start_at_revision_zero() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO partner_documents (id, data) VALUES ('france', '{\"regions\":[]}');",
        [],
    )
    .unwrap();
    let store = SqliteDocumentStore::new(&conn);
    assert_eq!(store.revision("france").unwrap(), Some(0));

    store.write("france", &PartnerDocument::default()).unwrap();

    assert_eq!(store.revision("france").unwrap(), Some(1));
}

#[test]
fn database_from_newer_build_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_document_reads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);

    assert!(store.read("france").unwrap().is_none());
    assert_eq!(store.revision("france").unwrap(), None);
}

#[test]
fn writes_replace_the_document_and_bump_revision() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);
    let mut document = sample_document(&RegionCatalog::france());

    store.write("france", &document).unwrap();
    document.regions[0].partners.clear();
    document.regions[0].partners.push(Partner::new("Acme"));
    store.write("france", &document).unwrap();

    assert_eq!(store.revision("france").unwrap(), Some(2));
    let stored = store.read("france").unwrap().unwrap();
    let partners = stored["regions"][0]["partners"].as_array().unwrap();
    assert_eq!(partners.len(), 1);
    assert_eq!(partners[0]["name"], "Acme");
    assert_eq!(row_count(&conn), 1);
}

#[test]
fn documents_are_isolated_by_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);

    store.write("france", &PartnerDocument::default()).unwrap();
    store
        .write("belgique", &sample_document(&RegionCatalog::france()))
        .unwrap();

    assert_eq!(
        store.read("france").unwrap().unwrap()["regions"],
        serde_json::json!([])
    );
    assert_eq!(store.revision("belgique").unwrap(), Some(1));
    assert_eq!(row_count(&conn), 2);
}

#[test]
fn corrupt_row_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO partner_documents (id, data) VALUES ('france', 'not json');",
        [],
    )
    .unwrap();

    let err = SqliteDocumentStore::new(&conn).read("france").unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)), "got {err}");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('partner_documents') ORDER BY cid;")
        .unwrap();
    stmt.query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM partner_documents;", [], |row| {
        row.get(0)
    })
    .unwrap()
}

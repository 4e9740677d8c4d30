use msgstore_core::db::migrations::latest_version;
use msgstore_core::db::{open_db, open_db_in_memory, open_db_with_config, DbError};
use msgstore_core::{Message, MessageRepository, SqliteMessageRepository, StoreConfig};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "message");
}

#[test]
fn reopening_file_database_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.sqlite3");

    let first = open_db(&path).unwrap();
    let created = SqliteMessageRepository::new(&first)
        .create(Message::new("kept"))
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let loaded = SqliteMessageRepository::new(&second)
        .find_by_id(created.id.unwrap())
        .unwrap();
    assert_eq!(loaded, Some(created));
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_with_config_uses_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.sqlite3");
    let config = StoreConfig {
        db_path: Some(path.clone()),
        busy_timeout_ms: 100,
        ..StoreConfig::default()
    };

    let conn = open_db_with_config(&config).unwrap();
    assert_table_exists(&conn, "message");
    assert!(path.exists());
}

#[test]
fn open_with_default_config_is_in_memory() {
    let conn = open_db_with_config(&StoreConfig::default()).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

#[test]
fn oversized_busy_timeout_opens_without_panicking() {
    let config = StoreConfig {
        busy_timeout_ms: 3_000_000_000,
        ..StoreConfig::default()
    };

    let conn = open_db_with_config(&config).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

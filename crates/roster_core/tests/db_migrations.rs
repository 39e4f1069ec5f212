use roster_core::db::migrations::latest_version;
use roster_core::db::{open_db, open_db_in_memory, DbError};
use roster_core::{
    BaseRecord, Record, RecordListQuery, RecordRepository, RecordStore, SqliteRecordRepository,
    Student,
};
use rusqlite::Connection;
use std::panic::{self, AssertUnwindSafe};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "items");
}

#[test]
fn reopening_file_database_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.sqlite3");
    let record: Record = Student::new(BaseRecord::new("Ann", "F", 20), 10).into();

    let store = RecordStore::open(&path).unwrap();
    let stored = store
        .with_connection(|conn| SqliteRecordRepository::new(conn).create_record(&record))
        .unwrap();
    store.close().unwrap();

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let listed = SqliteRecordRepository::new(&conn)
        .list_records(&RecordListQuery::default())
        .unwrap();
    assert_eq!(listed, vec![stored]);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
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
fn store_stays_usable_after_a_caller_panics() {
    let store = RecordStore::open_in_memory().unwrap();
    let record: Record = Student::new(BaseRecord::new("Ann", "F", 20), 10).into();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        store.with_connection(|conn| {
            conn.execute_batch("BEGIN;").unwrap();
            SqliteRecordRepository::new(conn)
                .create_record(&record)
                .unwrap();
            panic!("handler failed mid-transaction");
        })
    }));
    assert!(outcome.is_err());

    let listed = store
        .with_connection(|conn| {
            let repo = SqliteRecordRepository::new(conn);
            repo.create_record(&record)?;
            repo.list_records(&RecordListQuery::default())
        })
        .unwrap();
    assert_eq!(listed.len(), 1, "the interrupted insert must be rolled back");
    assert_eq!(listed[0].record, record);
    store.close().unwrap();
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

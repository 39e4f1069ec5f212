//! Record repository contract and SQLite document implementation.
//!
//! # Responsibility
//! - Insert records as JSON documents into the `items` collection.
//! - List records filtered by discriminator in insertion order.
//!
//! # Invariants
//! - The `itemtype` column and the document's embedded tag always agree.
//! - Each insert is one statement; a failed insert leaves no row behind.

use crate::db::DbError;
use crate::model::record::{Record, RecordType, RecordValidationError, StoredRecord};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    itemtype,
    document,
    created_at
FROM items";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    Codec(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "record document encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Codec(value)
    }
}

/// Filter for listing records. `kind = None` lists the whole collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordListQuery {
    pub kind: Option<RecordType>,
}

impl RecordListQuery {
    pub fn of_kind(kind: RecordType) -> Self {
        Self { kind: Some(kind) }
    }
}

/// Repository interface over the record collection.
pub trait RecordRepository {
    /// Persists a record and returns it with its assigned identity.
    fn create_record(&self, record: &Record) -> RepoResult<StoredRecord>;
    /// Lists matching records in insertion order.
    fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<StoredRecord>>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_record(&self, record: &Record) -> RepoResult<StoredRecord> {
        record.validate()?;

        let stored = StoredRecord {
            id: Uuid::new_v4(),
            record: record.clone(),
            created_at: now_epoch_ms(),
        };
        let document = serde_json::to_string(&stored.record)?;

        self.conn.execute(
            "INSERT INTO items (id, itemtype, document, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                stored.id.to_string(),
                stored.kind().as_tag(),
                document,
                stored.created_at,
            ],
        )?;

        Ok(stored)
    }

    fn list_records(&self, query: &RecordListQuery) -> RepoResult<Vec<StoredRecord>> {
        let mut sql = format!("{RECORD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = query.kind {
            sql.push_str(" AND itemtype = ?");
            bind_values.push(Value::Text(kind.as_tag().to_string()));
        }
        sql.push_str(" ORDER BY seq ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<StoredRecord> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in items.id"))
    })?;

    let tag: String = row.get("itemtype")?;
    let kind = RecordType::from_tag(&tag).ok_or_else(|| {
        RepoError::InvalidData(format!("unknown itemtype `{tag}` for record {id}"))
    })?;

    let document: String = row.get("document")?;
    let record: Record = serde_json::from_str(&document).map_err(|err| {
        RepoError::InvalidData(format!("undecodable document for record {id}: {err}"))
    })?;
    if record.kind() != kind {
        return Err(RepoError::InvalidData(format!(
            "record {id} is stored as {kind} but its document is tagged {}",
            record.kind()
        )));
    }
    record
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("record {id}: {err}")))?;

    Ok(StoredRecord {
        id,
        record,
        created_at: row.get("created_at")?,
    })
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

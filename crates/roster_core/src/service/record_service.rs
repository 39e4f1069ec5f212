//! Record use-case service.
//!
//! # Responsibility
//! - Provide the single add/list entry point for every record variant.
//! - Turn loose attribute maps into typed records via the schema registry.
//!
//! # Invariants
//! - A failed add never leaves a persisted record behind.
//! - Lists only ever contain records of the requested variant.
//! - Log events carry metadata only, never record attribute values.

use crate::model::record::{Record, RecordType, RecordValidationError, StoredRecord};
use crate::model::schema::SchemaRegistry;
use crate::repo::record_repo::{RecordListQuery, RecordRepository, RepoError};
use log::{info, warn};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Service error for record use-cases.
#[derive(Debug)]
pub enum RecordServiceError {
    /// Input did not satisfy the variant schema.
    Validation(RecordValidationError),
    /// The store failed to write or read.
    Persistence(RepoError),
}

impl RecordServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    fn kind_label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Persistence(_) => "persistence",
        }
    }
}

impl Display for RecordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for RecordServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RecordServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Persistence(other),
        }
    }
}

/// Record service facade over repository implementations.
pub struct RecordService<R: RecordRepository> {
    repo: R,
    schemas: Arc<SchemaRegistry>,
}

impl<R: RecordRepository> RecordService<R> {
    /// Creates a service using the provided repository and variant registry.
    pub fn new(repo: R, schemas: Arc<SchemaRegistry>) -> Self {
        Self { repo, schemas }
    }

    /// Builds a `variant` record from `attributes` and persists it.
    ///
    /// # Contract
    /// - Every base and variant field must be present with the right type.
    /// - Unknown attributes are ignored.
    /// - Returns the stored record including its assigned `_id`.
    pub fn add_record(
        &self,
        variant: RecordType,
        attributes: &Map<String, Value>,
    ) -> Result<StoredRecord, RecordServiceError> {
        let started_at = Instant::now();
        let result = self
            .schemas
            .get(variant)
            .ok_or(RecordValidationError::UnregisteredVariant(variant))
            .and_then(|schema| schema.build(attributes))
            .map_err(RecordServiceError::from)
            .and_then(|record| self.persist(&record));
        log_add(variant, started_at, &result);
        result
    }

    /// Persists an already typed record.
    pub fn create_record(&self, record: &Record) -> Result<StoredRecord, RecordServiceError> {
        let started_at = Instant::now();
        let result = self.persist(record);
        log_add(record.kind(), started_at, &result);
        result
    }

    /// Lists every stored record of `variant` in insertion order.
    pub fn list_records(&self, variant: RecordType) -> Result<Vec<StoredRecord>, RecordServiceError> {
        let started_at = Instant::now();
        match self.repo.list_records(&RecordListQuery::of_kind(variant)) {
            Ok(records) => {
                info!(
                    "event=record_list module=service status=ok kind={variant} count={} duration_ms={}",
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(err) => {
                let err = RecordServiceError::from(err);
                warn!(
                    "event=record_list module=service status=error kind={variant} error_kind={} duration_ms={} error={err}",
                    err.kind_label(),
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn persist(&self, record: &Record) -> Result<StoredRecord, RecordServiceError> {
        Ok(self.repo.create_record(record)?)
    }
}

fn log_add(
    variant: RecordType,
    started_at: Instant,
    result: &Result<StoredRecord, RecordServiceError>,
) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(stored) => info!(
            "event=record_add module=service status=ok kind={variant} id={} duration_ms={duration_ms}",
            stored.id
        ),
        Err(err) => warn!(
            "event=record_add module=service status=error kind={variant} error_kind={} duration_ms={duration_ms} error={err}",
            err.kind_label()
        ),
    }
}

//! Core domain logic for the roster service.
//! This crate owns the record model, the document store and the use-case
//! services; transports live in other crates.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{DbError, DbResult, RecordStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    BaseRecord, Employee, Record, RecordId, RecordType, RecordValidationError, StoredRecord,
    Student, DISCRIMINATOR_KEY,
};
pub use model::schema::{
    FieldKind, FieldSpec, RegistryError, SchemaRegistry, VariantSchema, BASE_FIELDS,
};
pub use repo::record_repo::{
    RecordListQuery, RecordRepository, RepoError, RepoResult, SqliteRecordRepository,
};
pub use service::record_service::{RecordService, RecordServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

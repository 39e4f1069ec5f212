//! Shared application state.
//!
//! # Invariants
//! - The store connection is only touched from blocking workers.
//! - Repository and service values live for one call only.

use log::warn;
use roster_core::{
    RecordService, RecordServiceError, RecordStore, SchemaRegistry, SqliteRecordRepository,
};
use std::sync::Arc;

use crate::error::ServerError;

#[derive(Clone)]
pub struct AppState {
    store: Arc<RecordStore>,
    schemas: Arc<SchemaRegistry>,
}

impl AppState {
    pub fn new(store: RecordStore, schemas: SchemaRegistry) -> Self {
        Self {
            store: Arc::new(store),
            schemas: Arc::new(schemas),
        }
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Runs one service call on the blocking pool with the store connection
    /// borrowed for its duration.
    pub async fn run<T, F>(&self, op: F) -> Result<T, ServerError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&RecordService<SqliteRecordRepository<'c>>) -> Result<T, RecordServiceError>
            + Send
            + 'static,
    {
        let store = Arc::clone(&self.store);
        let schemas = Arc::clone(&self.schemas);

        let outcome = tokio::task::spawn_blocking(move || {
            store.with_connection(|conn| {
                let service = RecordService::new(SqliteRecordRepository::new(conn), schemas);
                op(&service)
            })
        })
        .await?;

        Ok(outcome?)
    }

    /// Closes the store once no other handle to it remains.
    pub fn close(self) -> Result<(), ServerError> {
        match Arc::try_unwrap(self.store) {
            Ok(store) => Ok(store.close()?),
            Err(_) => {
                warn!("event=db_close module=server status=skipped reason=store_in_use");
                Ok(())
            }
        }
    }
}

//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record persistence contract used by services.
//! - Keep SQL and document encoding inside the store boundary.
//!
//! # Invariants
//! - Writes run `Record::validate()` before touching the store.
//! - Reads reject persisted state that does not decode into a valid record.

pub mod record_repo;

//! HTTP service for the roster record store.
//!
//! # Responsibility
//! - Parse process configuration.
//! - Own the shared store handle and variant registry.
//! - Map HTTP routes onto `RecordService` calls.

pub mod config;
pub mod error;
pub mod http;
pub mod state;

pub use config::ServerConfig;
pub use error::ServerError;
pub use http::router;
pub use state::AppState;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate schema construction and repository calls.
//! - Keep the HTTP layer decoupled from storage details.

pub mod record_service;

//! Server-level error type.

use roster_core::{DbError, RecordServiceError, RegistryError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ServerError {
    Config(String),
    Logging(String),
    /// The request body could not be read as a JSON object.
    Request(String),
    /// Variant registration failed; the process must not start.
    Registry(RegistryError),
    Store(DbError),
    Service(RecordServiceError),
    /// A blocking store call panicked or was cancelled.
    Worker(tokio::task::JoinError),
    Io(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "invalid configuration: {message}"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Request(message) => write!(f, "invalid request body: {message}"),
            Self::Registry(err) => write!(f, "record variant registration failed: {err}"),
            Self::Store(err) => write!(f, "record store error: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Worker(err) => write!(f, "store worker failed: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(_) | Self::Logging(_) | Self::Request(_) => None,
            Self::Registry(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Worker(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RegistryError> for ServerError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<DbError> for ServerError {
    fn from(value: DbError) -> Self {
        Self::Store(value)
    }
}

impl From<RecordServiceError> for ServerError {
    fn from(value: RecordServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Worker(value)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

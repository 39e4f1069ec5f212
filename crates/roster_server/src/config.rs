//! Command line and environment configuration.

use clap::Parser;
use roster_core::default_log_level;
use std::path::PathBuf;

use crate::error::ServerError;

#[derive(Parser, Debug, Clone)]
#[command(name = "roster-server", version, about = "Student and employee record service")]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "ROSTER_BIND", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// SQLite database file backing the record store.
    #[arg(long, env = "ROSTER_DB_PATH", default_value = "roster.sqlite3")]
    pub db_path: PathBuf,

    /// Keep records in memory only; `--db-path` is ignored.
    #[arg(long, env = "ROSTER_IN_MEMORY")]
    pub in_memory: bool,

    /// One of trace|debug|info|warn|error.
    #[arg(long, env = "ROSTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files. Defaults to `<cwd>/logs`.
    #[arg(long, env = "ROSTER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Log directory resolved against the working directory.
    pub fn log_dir(&self) -> Result<PathBuf, ServerError> {
        let cwd = std::env::current_dir().map_err(|err| {
            ServerError::Config(format!("cannot resolve working directory: {err}"))
        })?;
        Ok(match &self.log_dir {
            Some(dir) => cwd.join(dir),
            None => cwd.join("logs"),
        })
    }
}

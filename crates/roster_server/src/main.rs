//! Roster HTTP server entry point.

use clap::Parser;
use log::{error, info};
use roster_core::{init_logging, RecordStore, SchemaRegistry};
use roster_server::{router, AppState, ServerConfig, ServerError};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=server status=error error={err}");
            eprintln!("roster-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), ServerError> {
    init_logging(config.log_level(), &config.log_dir()?).map_err(ServerError::Logging)?;

    let schemas = SchemaRegistry::standard()?;
    let store = if config.in_memory {
        RecordStore::open_in_memory()?
    } else {
        RecordStore::open(&config.db_path)?
    };
    let state = AppState::new(store, schemas);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!(
        "event=server_listen module=server status=ok addr={}",
        listener.local_addr()?
    );

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    state.close()
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}

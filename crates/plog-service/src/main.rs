//! plogd - persistent logging service
//!
//! Serves the logging HTTP API over a memory or JSONL file store.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use plog_service::{LoggingController, LoggingHttpService, PlogdConfig};
use plog_store::open_persistence;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "plogd")]
#[command(about = "Persistent logging service")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "PLOGD_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Override the JSONL store path
    #[arg(long)]
    store: Option<PathBuf>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PlogdConfig::from_file(path)?,
        None => PlogdConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.service.bind_addr = bind;
    }
    if let Some(store) = cli.store {
        config.persistence.path = Some(store);
    }
    config.json_logs |= cli.json_logs;

    init_tracing(&config);

    let persistence =
        open_persistence(config.persistence.clone()).context("failed to open persistence")?;
    info!(
        bind = %config.service.bind_addr,
        store = ?config.persistence.path,
        stored = persistence.len(),
        "starting plogd"
    );

    let controller = Arc::new(LoggingController::new(persistence));
    let service = LoggingHttpService::new(config.service.clone(), controller);

    service.serve_with_shutdown(shutdown_signal()).await?;
    Ok(())
}

fn init_tracing(config: &PlogdConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if config.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

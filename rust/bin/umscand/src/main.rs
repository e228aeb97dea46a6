//! `umscand`: the inventory server.
//!
//! Usage:
//!   umscand -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/umscan/<name>.toml`.
//! If a path with `/` or a `.toml` name is given, it's used directly.

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use config::ServerConfig;

/// Inventory server.
#[derive(Parser, Debug)]
#[command(name = "umscand", about = "UM inventory server", version)]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", env = "UMSCAN_CONFIG", required = true)]
    config: String,

    /// Listen address (overrides `[server] listen`).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = umscan_core::ServiceConfig {
        data_dir: Some(data_dir),
        listen: cli.listen.unwrap_or_else(|| server_config.server.listen.clone()),
        ..Default::default()
    };

    let db_path = core_config.resolve_db_path();
    let kv: Arc<dyn umscan_kv::KVStore> = Arc::new(
        umscan_kv::RedbStore::open(&db_path)
            .map_err(|e| anyhow::anyhow!("failed to open KV store {}: {}", db_path.display(), e))?,
    );
    info!("KV store at {}", db_path.display());

    let app = routes::assemble(kv, &server_config)?;

    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("umscand listening on {}", core_config.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("umscand stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

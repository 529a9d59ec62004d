//! Folio content backend server.
//!
//! Opens the configured document store, seeds a default user into an empty
//! users collection, then serves the REST API.
//!
//! Usage:
//!   folio-server --config folio.toml --port 3000

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use folio_auth::HashParams;
use folio_hooks::{DefaultUserSeeder, standard_lifecycle};
use folio_server::{AppState, ServerConfig, build_router, config::Backend};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "folio-server")]
#[command(about = "Folio content backend")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP port (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// DuckDB database file (overrides config and environment)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let mut config = ServerConfig::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(path) = args.database {
        config.database.backend = Backend::Duckdb;
        config.database.path = Some(path);
    }
    if config.secret.is_empty() {
        warn!("No secret configured; set FOLIO_SECRET before deploying");
    }

    info!("Folio starting...");
    let store = config.database.open().context("Failed to open document store")?;

    let seeder = DefaultUserSeeder::new(config.seed.credentials(), HashParams::default());
    let lifecycle = standard_lifecycle(seeder);
    lifecycle
        .init(store.as_ref())
        .await
        .context("Startup hooks failed")?;

    let state = AppState::new(store, lifecycle)
        .with_auto_login(config.admin.auto_login().cloned());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", config.http_port))?;
    info!("HTTP API listening on port {}", config.http_port);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

//! artistdb-server - Main entry point
//!
//! Parses the artist file into the SQLite store, serves it over HTTP and
//! reparses whenever the file changes. Two one-shot modes skip the server:
//! `--format` rewrites the input file in canonical form, `--export <dir>`
//! writes the dataset as a flat directory.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use artistdb_common::config::{Config, ConfigOverrides};
use artistdb_common::db::{init_database, ArtistStore};
use artistdb_common::outdir::DirectorySink;
use artistdb_common::{format, DatasetBuilder, SocialRegistry};
use artistdb_server::{build_router, spawn_reload_task, AppState, FileWatcher, Reloader};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for artistdb-server
#[derive(Parser, Debug)]
#[command(name = "artistdb-server")]
#[command(about = "Artist database parser and server")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "ARTISTDB_CONFIG")]
    config: Option<PathBuf>,

    /// Artist source file
    #[arg(short, long, env = "ARTISTDB_IN_FILE")]
    input: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, env = "ARTISTDB_DATABASE")]
    database: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "ARTISTDB_PORT")]
    port: Option<u16>,

    /// Directory served under /avatar
    #[arg(long, env = "ARTISTDB_AVATAR_DIR")]
    avatar_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ARTISTDB_LOG_LEVEL")]
    log_level: Option<String>,

    /// Rewrite the input file in canonical form and exit
    #[arg(long, conflicts_with = "export")]
    format: bool,

    /// Write the dataset to a flat output directory and exit
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_file: self.input.clone(),
            database_path: self.database.clone(),
            port: self.port,
            avatar_dir: self.avatar_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref(), args.overrides())
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting artistdb-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Input file: {}", config.input_file.display());

    config.validate().context("Invalid configuration")?;

    let registry = SocialRegistry::builtin();

    if args.format {
        let count = format::format_file(registry, &config.input_file)
            .with_context(|| format!("Failed to format {}", config.input_file.display()))?;
        info!("Formatted {} artists", count);
        return Ok(());
    }

    if let Some(dir) = &args.export {
        let raw = tokio::fs::read_to_string(&config.input_file)
            .await
            .with_context(|| format!("Failed to read {}", config.input_file.display()))?;
        let sink = DirectorySink::new(dir);
        DatasetBuilder::new(registry)
            .run(&raw, &sink)
            .await
            .context("Export failed")?;
        return Ok(());
    }

    info!("Database: {}", config.database_path.display());
    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    let store = ArtistStore::new(pool);

    let reloader = Arc::new(Reloader::new(&config.input_file, Arc::new(store.clone())));
    reloader.reload().await.context("Initial parse failed")?;

    let watcher = FileWatcher::new(&config.input_file).context("Failed to watch input file")?;
    let _reload_task = spawn_reload_task(watcher, Arc::clone(&reloader));

    info!("Avatar directory: {}", config.avatar_dir.display());
    let app = build_router(AppState::new(store, reloader, &config.avatar_dir));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

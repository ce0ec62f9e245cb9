//! fyyur-web - Venue, artist and show listings
//!
//! Serves the listing pages and forms over HTTP, backed by a SQLite file
//! that is created on first start.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use fyyur_common::config::{resolve_database, TomlConfig};
use fyyur_common::db::init_database;
use fyyur_web::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Command-line arguments for fyyur-web
#[derive(Parser, Debug)]
#[command(name = "fyyur-web")]
#[command(about = "Venue, artist and show listings")]
#[command(version)]
struct Args {
    /// Address to bind [default: 127.0.0.1]
    #[arg(long, env = "FYYUR_HOST")]
    host: Option<String>,

    /// Port to listen on [default: 5000]
    #[arg(short, long, env = "FYYUR_PORT")]
    port: Option<u16>,

    /// Database file path or sqlite: URL
    #[arg(short, long)]
    database: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "FYYUR_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing so its log level can seed the filter;
    // a load failure is reported once logging is up
    let config_path = TomlConfig::locate(args.config.as_deref());
    let (toml_config, config_error) = match config_path.as_deref().map(TomlConfig::load) {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (TomlConfig::default(), Some(e)),
        None => (TomlConfig::default(), None),
    };

    let default_filter = format!(
        "fyyur_web={level},fyyur_common={level},tower_http={level}",
        level = toml_config.logging.level
    );
    let (log_file, log_file_error) = match toml_config.logging.file.as_deref().map(open_log_file) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let file_layer = log_file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    // Build identification immediately after tracing init
    info!(
        "Starting Fyyur (fyyur-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match (&config_path, config_error) {
        (Some(path), Some(e)) => warn!("Ignoring config file {}: {}", path.display(), e),
        (Some(path), None) => info!("Loaded config from {}", path.display()),
        (None, _) => info!("No config file, using defaults"),
    }

    if let (Some(path), Some(e)) = (&toml_config.logging.file, log_file_error) {
        warn!("Not logging to {}: {}", path.display(), e);
    }

    let location = resolve_database(args.database.as_deref(), &toml_config);
    info!("Database: {}", location);

    let pool = init_database(&location)
        .await
        .with_context(|| format!("Failed to open database {}", location))?;

    let state = AppState::new(pool);
    let app = build_router(state);

    let host = args
        .host
        .or(toml_config.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("fyyur-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Open the configured log file for appending, creating its directory
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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

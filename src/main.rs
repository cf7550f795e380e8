//! mediashelf: local-first personal media server

use anyhow::Result;
use clap::Parser;
use mediashelf::{
    config::{Config, LogFormat, LoggingConfig},
    http::{AppState, BindError, HttpServer},
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "mediashelf.toml";

#[derive(Parser)]
#[command(name = "mediashelf")]
#[command(about = "Local-first personal media server")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port (overrides PORT and the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding library.json and journal.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for uploaded images
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Root of the static web assets
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Config::load(&default_path)?
            } else {
                Config::default()
            }
        }
    };

    config.apply_env_overrides(|key| std::env::var(key).ok())?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.images_dir {
        config.storage.images_dir = dir.clone();
    }
    if let Some(dir) = &cli.static_dir {
        config.storage.static_dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(logging: &LoggingConfig, verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive(verbose)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.logging, cli.verbose)?;

    info!("Data directory: {}", config.storage.data_dir.display());
    info!("Images directory: {}", config.storage.images_dir.display());
    if config.search.api_key().is_none() {
        info!("YT_API_KEY not set; /api/search-youtube will reject requests");
    }

    let state = AppState::from_config(&config)?;
    let server = HttpServer::new(config, state);

    let listener = match server.bind().await {
        Ok(listener) => listener,
        Err(BindError::AddrInUse { port }) => {
            error!(
                "Port {} is already in use. Stop the process using that port and restart the server.",
                port
            );
            return Ok(());
        }
        Err(e) => {
            error!("Server error: {}", e);
            return Err(e.into());
        }
    };

    server.serve(listener, shutdown_signal()).await
}

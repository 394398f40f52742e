//! goaltask - Goal-to-Task Converter
//!
//! Entry point: load config, resolve the API key, serve the web UI.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use goaltask::cli::Cli;
use goaltask::config::Config;
use goaltask::service::{Backend, BreakdownService};
use goaltask::session::SessionStore;
use goaltask::web::{self, AppState};

fn parse_level(s: &str) -> Option<tracing::Level> {
    match s.to_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" | "WARNING" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<PathBuf> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("goaltask")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => parse_level(s).unwrap_or_else(|| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }),
        None => tracing::Level::INFO,
    };

    let log_path = log_dir.join("goaltask.log");
    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(log_path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    let log_path =
        setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(bind) = cli.bind {
        debug!(%bind, "main: bind address overridden from CLI");
        config.server.bind = bind;
    }
    config.validate().context("Invalid configuration")?;

    info!(
        model = %config.llm.model,
        temperature = config.llm.temperature,
        max_tokens = config.llm.max_tokens,
        timeout_ms = config.llm.timeout_ms,
        session_ttl_secs = config.server.session_ttl_secs,
        "goaltask loaded config"
    );

    let prompt_root = std::env::current_dir().context("Failed to read current directory")?;
    let backend = Backend::from_config(&config, &prompt_root)?;
    if let Backend::Unconfigured(message) = &backend {
        warn!("Starting without a working generator: {}", message);
        eprintln!("Warning: {}", message);
    }

    let sessions = SessionStore::with_ttl(config.server.session_ttl());
    let state = AppState::new(BreakdownService::new(backend, sessions))?;
    println!("Logging to {}", log_path.display());

    web::serve(state, config.server.socket_addr()?).await
}

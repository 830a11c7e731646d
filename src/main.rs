#![forbid(unsafe_code)]

//! `alert-genius` recurring alert scheduler binary.
//!
//! Bootstraps configuration, builds the alert controller, starts the
//! dispatch loop and the HTTP API, and shuts both down on SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use alert_genius::clock::SystemClock;
use alert_genius::config::GlobalConfig;
use alert_genius::orchestrator::{spawn_dispatch_loop, AlertController};
use alert_genius::{generation, http, AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "alert-genius", about = "Recurring alert scheduler", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the HTTP port from the configuration.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("alert-genius bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = match &args.config {
        Some(path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    if let Some(port) = args.port {
        config.http_port = port;
    }
    config.load_credentials().await?;
    info!(timezone = %config.timezone, "configuration loaded");

    // ── Build controller ────────────────────────────────
    let controller = Arc::new(AlertController::new(
        config.settings.clone(),
        generation::from_config(&config.generation),
        Arc::new(SystemClock),
        config.time_zone(),
        config.generation_timeout(),
    ));
    if config.seed_defaults {
        controller.seed_defaults()?;
    }

    // ── Start dispatch loop and HTTP API ────────────────
    let ct = CancellationToken::new();
    let dispatch_handle =
        spawn_dispatch_loop(Arc::clone(&controller), config.tick_period(), ct.clone());

    let addr = SocketAddr::new(config.bind_address, config.http_port);
    let http_ct = ct.clone();
    let http_controller = Arc::clone(&controller);
    let http_handle = tokio::spawn(async move {
        if let Err(err) = http::serve_http(addr, http_controller, http_ct.clone()).await {
            error!(%err, "http api failed");
            http_ct.cancel();
        }
    });

    info!("alert-genius ready");

    // ── Wait for shutdown ───────────────────────────────
    tokio::select! {
        () = shutdown_signal() => info!("shutdown signal received"),
        () = ct.cancelled() => {}
    }
    ct.cancel();

    let _ = tokio::join!(dispatch_handle, http_handle);
    let stats = controller.stats();
    info!(
        sent = stats.sent,
        failed = stats.failed,
        "alert-genius shut down"
    );

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}

#![forbid(unsafe_code)]

//! `zammad-slack-gateway` webhook receiver binary.
//!
//! Loads configuration and credentials, builds the Slack and Zammad
//! clients, and serves the webhook endpoint until ctrl-c or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use zammad_slack_gateway::config::GlobalConfig;
use zammad_slack_gateway::relay::Correlator;
use zammad_slack_gateway::server::{self, AppState};
use zammad_slack_gateway::slack::blocks::MessageRenderer;
use zammad_slack_gateway::slack::client::SlackGateway;
use zammad_slack_gateway::zammad::client::ZammadClient;
use zammad_slack_gateway::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "zammad-slack-gateway", about = "Relay Zammad tickets into Slack threads", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the HTTP port from the configuration file.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("zammad-slack-gateway bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    config.load_credentials().await?;
    let config = Arc::new(config);
    info!(zammad = %config.zammad.base_url, "configuration loaded");

    // ── Build backends ──────────────────────────────────
    let gateway = SlackGateway::new(&config.slack).map_err(|err| {
        error!(%err, "slack client init failed");
        err
    })?;
    let tickets = ZammadClient::new(&config.zammad)?;
    let correlator = Correlator::new(
        Arc::new(gateway),
        Arc::new(tickets),
        MessageRenderer::new(config.zammad.base_url.clone()),
        config.slack.thread_color.clone(),
    );

    let state = Arc::new(AppState {
        config: Arc::clone(&config),
        correlator: Arc::new(correlator),
    });

    // ── Serve until shutdown ────────────────────────────
    let ct = CancellationToken::new();
    let shutdown_ct = ct.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        shutdown_ct.cancel();
    });

    server::serve(state, ct).await?;
    info!("zammad-slack-gateway shut down");
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

//! HTTP transport for inbound Zammad webhooks.
//!
//! Zammad delivers ticket triggers as `POST {webhook_path}?channel=<name>`;
//! the `channel` query parameter selects the Slack channel the ticket's
//! thread lives in. `GET /health` answers health checks.

pub mod signature;
pub mod webhook;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::relay::Correlator;
use crate::{AppError, GlobalConfig, Result};

/// Shared state handed to every request.
pub struct AppState {
    /// Loaded configuration, including the webhook secret.
    pub config: Arc<GlobalConfig>,
    /// Relay core.
    pub correlator: Arc<Correlator>,
}

/// Handler for `GET /health`; returns 200 OK with a plain-text body.
async fn health() -> &'static str {
    "ok"
}

/// Extract a query parameter from a URI.
///
/// Returns `None` when the parameter is absent or empty. Values are not
/// URL-decoded; Slack channel names never need encoding.
pub(crate) fn extract_query_param(uri: &axum::http::Uri, name: &str) -> Option<String> {
    uri.query().and_then(|q| {
        q.split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_owned())
            .filter(|v| !v.is_empty())
    })
}

/// Build the application router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let webhook_path = state.config.webhook_path.clone();
    Router::new()
        .route("/health", get(health))
        .route(&webhook_path, post(webhook::handle_webhook))
        .with_state(state)
}

/// Serve the webhook endpoint on the configured address until `ct` fires.
///
/// # Errors
///
/// Returns `AppError::Io` if the listener fails to bind or the server fails.
pub async fn serve(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let bind = state.config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|err| AppError::Io(format!("failed to bind {bind}: {err}")))?;

    info!(%bind, path = %state.config.webhook_path, "webhook listener started");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            ct.cancelled().await;
        })
        .await
        .map_err(|err| AppError::Io(format!("http server error: {err}")))?;

    info!("webhook listener shut down");
    Ok(())
}

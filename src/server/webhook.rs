//! `POST` handler for Zammad ticket triggers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{extract_query_param, signature, AppState};
use crate::models::webhook::WebhookEvent;
use crate::AppError;

/// HTTP status reported for a failed request.
#[must_use]
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::ChannelNotFound(_) => StatusCode::NOT_FOUND,
        AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        AppError::Config(_)
        | AppError::Slack(_)
        | AppError::Zammad(_)
        | AppError::TicketNotFound(_)
        | AppError::Post(_)
        | AppError::Update(_)
        | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Authenticate, parse, and relay one webhook delivery.
///
/// Checks run in order: signature header present (401), body present (400),
/// signature valid (401), `channel` parameter present (404), payload valid
/// (400). Relay failures map through [`status_for`].
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let span = info_span!("webhook", request_id = %Uuid::new_v4());
    process(&state, &uri, &headers, &body).instrument(span).await
}

async fn process(state: &AppState, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> StatusCode {
    let Some(signature) = headers
        .get(signature::SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        warn!("webhook without signature header rejected");
        return StatusCode::UNAUTHORIZED;
    };

    if body.is_empty() {
        warn!("webhook without body rejected");
        return StatusCode::BAD_REQUEST;
    }

    if let Err(err) = signature::verify(&state.config.webhook_secret, body, signature) {
        warn!(%err, "webhook signature rejected");
        return status_for(&err);
    }

    let Some(channel) = extract_query_param(uri, "channel") else {
        error!("no channel given in the query string");
        return StatusCode::NOT_FOUND;
    };

    let event = match WebhookEvent::from_slice(body) {
        Ok(event) => event,
        Err(err) => {
            warn!(%err, "webhook payload rejected");
            return status_for(&err);
        }
    };

    let span = info_span!(
        "relay",
        ticket_id = event.ticket.id,
        article_id = event.article.id,
        channel = %channel
    );
    match state.correlator.relay(&channel, &event).instrument(span).await {
        Ok(outcome) => {
            info!(
                ticket_id = event.ticket.id,
                article_id = event.article.id,
                ts = %outcome.thread_ts,
                thread_created = outcome.thread_created,
                article_posted = outcome.article_posted,
                "relay complete"
            );
            StatusCode::OK
        }
        Err(err) => {
            error!(ticket_id = event.ticket.id, %err, "relay failed");
            status_for(&err)
        }
    }
}

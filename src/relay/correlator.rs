//! Thread correlation: one Slack thread per ticket, each article at most once.
//!
//! `relay` runs strictly in order: re-read correlation state from the
//! ticket, resolve the channel, look up the stored thread anchor, start a new
//! thread if the anchor is gone, post the article unless it was the last one
//! relayed, then write the correlation state back. State is only written
//! after every post succeeded, so it never points at an undelivered message.
//! A failed write leaves a delivered but unrecorded message; the next event
//! sees the stale state and recovers on its own.

use std::sync::Arc;

use slack_morphism::prelude::{SlackChannelId, SlackTs};
use tracing::{info, warn};

use crate::models::correlation::CorrelationState;
use crate::models::webhook::WebhookEvent;
use crate::persistence::correlation_repo::CorrelationRepo;
use crate::slack::blocks::MessageRenderer;
use crate::slack::gateway::{ChatGateway, OutgoingMessage};
use crate::zammad::store::TicketStore;
use crate::{AppError, Result};

/// What a relay did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Channel the thread lives in.
    pub channel: SlackChannelId,
    /// Timestamp of the thread anchor now stored on the ticket.
    pub thread_ts: SlackTs,
    /// Whether a new anchor message was posted.
    pub thread_created: bool,
    /// Whether the article was posted as a reply.
    pub article_posted: bool,
}

/// Relays ticket events into per-ticket Slack threads.
pub struct Correlator {
    gateway: Arc<dyn ChatGateway>,
    repo: CorrelationRepo,
    renderer: MessageRenderer,
    thread_color: String,
}

impl Correlator {
    /// Create a correlator over the given backends.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        tickets: Arc<dyn TicketStore>,
        renderer: MessageRenderer,
        thread_color: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            repo: CorrelationRepo::new(tickets),
            renderer,
            thread_color: thread_color.into(),
        }
    }

    /// Relay `event` into the thread of its ticket in `channel_name`.
    ///
    /// # Errors
    ///
    /// - `AppError::TicketNotFound` if the ticket no longer exists.
    /// - `AppError::ChannelNotFound` if no channel is named `channel_name`.
    /// - `AppError::Post` if Slack rejects the anchor or the reply.
    /// - `AppError::Update` if the correlation state cannot be written.
    pub async fn relay(&self, channel_name: &str, event: &WebhookEvent) -> Result<RelayOutcome> {
        let ticket_id = event.ticket.id;
        let article_id = event.article.id;

        // Webhook payloads carry no preferences; always re-read the ticket.
        let stored = self.repo.load(ticket_id).await?.unwrap_or_default();

        let channel = self
            .gateway
            .resolve_channel(channel_name)
            .await?
            .ok_or_else(|| AppError::ChannelNotFound(channel_name.to_owned()))?;

        let (thread_ts, thread_created) = match self.find_thread(&channel, &stored).await {
            Some(ts) => (ts, false),
            None => (self.start_thread(&channel, event).await?, true),
        };

        let article_posted = if stored.has_seen(article_id) {
            info!(ticket_id, article_id, "article already relayed; not posting again");
            false
        } else {
            let reply = OutgoingMessage::reply(
                thread_ts.clone(),
                self.renderer.article_reply(event),
                MessageRenderer::author_label(event),
            );
            let reply_ts = self.gateway.post_message(&channel, reply).await?;
            info!(ticket_id, article_id, ts = %reply_ts, "posted article reply");
            true
        };

        self.repo
            .save(ticket_id, &CorrelationState::new(thread_ts.0.clone(), article_id))
            .await?;

        Ok(RelayOutcome {
            channel,
            thread_ts,
            thread_created,
            article_posted,
        })
    }

    /// The stored thread anchor, if it still resolves to a live message.
    ///
    /// Lookup errors count as a miss.
    async fn find_thread(
        &self,
        channel: &SlackChannelId,
        stored: &CorrelationState,
    ) -> Option<SlackTs> {
        let ts = SlackTs(stored.anchor_ts()?.to_owned());
        match self.gateway.fetch_message(channel, &ts).await {
            Ok(Some(found)) => Some(found),
            Ok(None) => {
                warn!(ts = %ts, channel = %channel, "stored thread anchor not found; starting a new thread");
                None
            }
            Err(err) => {
                warn!(ts = %ts, channel = %channel, %err, "thread anchor lookup failed; starting a new thread");
                None
            }
        }
    }

    async fn start_thread(&self, channel: &SlackChannelId, event: &WebhookEvent) -> Result<SlackTs> {
        let anchor = OutgoingMessage::thread_root(
            self.renderer.ticket_summary(event),
            self.thread_color.clone(),
            MessageRenderer::summary_text(event),
        );
        let ts = self.gateway.post_message(channel, anchor).await?;
        info!(ticket_id = event.ticket.id, ts = %ts, channel = %channel, "started ticket thread");
        Ok(ts)
    }
}

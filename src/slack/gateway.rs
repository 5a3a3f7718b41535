//! Chat backend abstraction consumed by the thread correlator.
//!
//! The [`ChatGateway`] trait decouples relay logic from the Slack Web API so
//! the correlator can be exercised against in-memory fakes. The production
//! implementation is [`SlackGateway`](crate::slack::client::SlackGateway).

use std::future::Future;
use std::pin::Pin;

use slack_morphism::prelude::{
    SlackApiChatPostMessageRequest, SlackBlock, SlackChannelId, SlackMessageAttachment,
    SlackMessageContent, SlackTs,
};

use crate::Result;

/// Boxed future returned by gateway operations.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Message to be delivered via `chat.postMessage`.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    /// Notification fallback text.
    pub text: Option<String>,
    /// Block Kit content.
    pub blocks: Vec<SlackBlock>,
    /// When set, blocks are wrapped in an attachment with this side-bar color.
    pub color: Option<String>,
    /// Thread anchor to reply under.
    pub thread_ts: Option<SlackTs>,
}

impl OutgoingMessage {
    /// A new top-level message whose blocks sit in a colored attachment.
    #[must_use]
    pub fn thread_root(
        blocks: Vec<SlackBlock>,
        color: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: Some(text.into()),
            blocks,
            color: Some(color.into()),
            thread_ts: None,
        }
    }

    /// A reply nested under `thread_ts`.
    #[must_use]
    pub fn reply(thread_ts: SlackTs, blocks: Vec<SlackBlock>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            blocks,
            color: None,
            thread_ts: Some(thread_ts),
        }
    }

    /// Convert into a Web API request with link previews disabled.
    #[must_use]
    pub fn into_request(self, channel: SlackChannelId) -> SlackApiChatPostMessageRequest {
        let (blocks, attachments) = match self.color {
            Some(color) => (
                None,
                Some(vec![SlackMessageAttachment::new()
                    .with_color(color)
                    .with_blocks(self.blocks)]),
            ),
            None => (Some(self.blocks), None),
        };

        let content = SlackMessageContent {
            text: self.text,
            blocks,
            attachments,
            upload: None,
            files: None,
            reactions: None,
            metadata: None,
            markdown_text: None,
        };

        SlackApiChatPostMessageRequest {
            channel,
            content,
            as_user: None,
            icon_emoji: None,
            icon_url: None,
            link_names: None,
            parse: None,
            thread_ts: self.thread_ts,
            username: None,
            reply_broadcast: None,
            unfurl_links: Some(false),
            unfurl_media: Some(false),
        }
    }
}

/// One channel from a `conversations.list` page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    /// Channel identifier.
    pub id: SlackChannelId,
    /// Channel name without the leading `#`.
    pub name: Option<String>,
}

/// A page of `conversations.list` results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPage {
    /// Channels on this page.
    pub channels: Vec<ChannelSummary>,
    /// Cursor of the next page; `None` or empty on the last page.
    pub next_cursor: Option<String>,
}

/// Walk channel pages until one is named `name` or the pages run out.
///
/// A leading `#` on `name` is ignored.
///
/// # Errors
///
/// Propagates the first error returned by `fetch_page`.
pub async fn find_channel_in_pages<F, Fut>(
    name: &str,
    mut fetch_page: F,
) -> Result<Option<SlackChannelId>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ChannelPage>>,
{
    let name = name.trim_start_matches('#');
    let mut cursor = None;
    loop {
        let page = fetch_page(cursor.take()).await?;
        if let Some(found) = page
            .channels
            .into_iter()
            .find(|channel| channel.name.as_deref() == Some(name))
        {
            return Ok(Some(found.id));
        }
        match page.next_cursor.filter(|next| !next.is_empty()) {
            Some(next) => cursor = Some(next),
            None => return Ok(None),
        }
    }
}

/// Pick the message posted at exactly `ts` from a history page.
///
/// `conversations.history` bounded by `ts` on both ends can still return a
/// neighbouring message when the requested one was deleted; only an exact
/// timestamp match counts.
#[must_use]
pub fn exact_message<I>(timestamps: I, ts: &SlackTs) -> Option<SlackTs>
where
    I: IntoIterator<Item = SlackTs>,
{
    timestamps.into_iter().find(|found| found == ts)
}

/// Chat backend operations needed to relay ticket events.
pub trait ChatGateway: Send + Sync {
    /// Resolve a channel name to its identifier across public and private
    /// channels. Returns `None` when no channel matches.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if listing fails.
    fn resolve_channel<'a>(&'a self, name: &'a str) -> GatewayFuture<'a, Option<SlackChannelId>>;

    /// Post a message and return its timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Post`](crate::AppError::Post) if Slack rejects it.
    fn post_message<'a>(
        &'a self,
        channel: &'a SlackChannelId,
        message: OutgoingMessage,
    ) -> GatewayFuture<'a, SlackTs>;

    /// Look up the message posted at exactly `ts`. Returns its timestamp
    /// when it still exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the history
    /// call fails.
    fn fetch_message<'a>(
        &'a self,
        channel: &'a SlackChannelId,
        ts: &'a SlackTs,
    ) -> GatewayFuture<'a, Option<SlackTs>>;
}

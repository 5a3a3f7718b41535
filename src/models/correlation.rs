//! Correlation state linking a ticket to its Slack thread.

use serde::{Deserialize, Serialize};

/// The `{ ts, last_article_seen }` record stored on the ticket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorrelationState {
    /// Slack timestamp of the thread anchor message.
    #[serde(default)]
    pub ts: Option<String>,
    /// Identifier of the most recently relayed article.
    #[serde(default)]
    pub last_article_seen: Option<u64>,
}

impl CorrelationState {
    /// State pointing at `ts` after relaying `article_id`.
    #[must_use]
    pub fn new(ts: impl Into<String>, article_id: u64) -> Self {
        Self {
            ts: Some(ts.into()),
            last_article_seen: Some(article_id),
        }
    }

    /// Stored anchor timestamp, ignoring empty strings.
    #[must_use]
    pub fn anchor_ts(&self) -> Option<&str> {
        self.ts.as_deref().filter(|ts| !ts.is_empty())
    }

    /// Whether `article_id` was the last article relayed.
    #[must_use]
    pub fn has_seen(&self, article_id: u64) -> bool {
        self.last_article_seen == Some(article_id)
    }
}

//! Inbound Zammad webhook payload.

use serde::{Deserialize, Serialize};

use super::article::Article;
use super::ticket::Ticket;
use super::user::User;
use crate::{AppError, Result};

/// The `{ ticket, article }` body Zammad posts for ticket triggers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookEvent {
    /// Ticket the article belongs to.
    pub ticket: Ticket,
    /// Article that triggered the webhook.
    pub article: Article,
}

impl WebhookEvent {
    /// Parse and validate a raw webhook body.
    ///
    /// # Errors
    ///
    /// Returns `AppError::MalformedPayload` if the body is not valid JSON,
    /// misses a required field, or the article belongs to another ticket.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        let event: Self = serde_json::from_slice(raw)?;
        event.validate()?;
        Ok(event)
    }

    /// The user an article is attributed to: its creator, else the customer.
    #[must_use]
    pub fn actor(&self) -> &User {
        self.article
            .created_by
            .as_ref()
            .unwrap_or(&self.ticket.customer)
    }

    fn validate(&self) -> Result<()> {
        match self.article.ticket_id {
            Some(ticket_id) if ticket_id != self.ticket.id => {
                Err(AppError::MalformedPayload(format!(
                    "article {} belongs to ticket {ticket_id}, not {}",
                    self.article.id, self.ticket.id
                )))
            }
            _ => Ok(()),
        }
    }
}

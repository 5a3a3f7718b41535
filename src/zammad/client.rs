//! Zammad REST API implementation of [`TicketStore`].

use reqwest::{header, StatusCode};
use tracing::debug;

use super::store::{StoreFuture, TicketStore};
use crate::config::ZammadConfig;
use crate::models::ticket::{StoredTicket, TicketUpdate};
use crate::{AppError, Result};

/// Token-authenticated Zammad API client.
#[derive(Debug, Clone)]
pub struct ZammadClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ZammadClient {
    /// Create a client for the configured instance.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Zammad` if the HTTP client cannot be built.
    pub fn new(config: &ZammadConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("zammad-slack-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        })
    }

    fn ticket_url(&self, id: u64) -> String {
        format!("{}/api/v1/tickets/{id}", self.base_url)
    }

    fn authorization(&self) -> String {
        format!("Token token={}", self.token)
    }

    async fn fetch(&self, id: u64) -> Result<StoredTicket> {
        let response = self
            .http
            .get(self.ticket_url(id))
            .header(header::AUTHORIZATION, self.authorization())
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::TicketNotFound(format!("ticket {id}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Zammad(format!(
                "failed to fetch ticket {id} ({status}): {body}"
            )));
        }

        debug!(ticket_id = id, "fetched ticket");
        Ok(response.json::<StoredTicket>().await?)
    }

    async fn put(&self, id: u64, update: &TicketUpdate) -> Result<()> {
        let response = self
            .http
            .put(self.ticket_url(id))
            .header(header::AUTHORIZATION, self.authorization())
            .json(update)
            .send()
            .await
            .map_err(|err| AppError::Update(format!("ticket {id}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Update(format!("ticket {id} ({status}): {body}")));
        }

        debug!(ticket_id = id, "updated ticket");
        Ok(())
    }
}

impl TicketStore for ZammadClient {
    fn get_ticket(&self, id: u64) -> StoreFuture<'_, StoredTicket> {
        Box::pin(self.fetch(id))
    }

    fn update_ticket<'a>(&'a self, id: u64, update: &'a TicketUpdate) -> StoreFuture<'a, ()> {
        Box::pin(self.put(id, update))
    }
}

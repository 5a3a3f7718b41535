//! Slack Web API implementation of [`ChatGateway`].

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackApiConversationsHistoryRequest, SlackApiConversationsListRequest, SlackApiToken,
    SlackApiTokenType, SlackApiTokenValue, SlackChannelId, SlackClient,
    SlackClientHyperHttpsConnector, SlackClientSession, SlackConversationType, SlackCursorId,
    SlackTs,
};
use tracing::{debug, info};

use super::gateway::{
    exact_message, find_channel_in_pages, ChannelPage, ChannelSummary, ChatGateway,
    GatewayFuture, OutgoingMessage,
};
use crate::{config::SlackConfig, AppError, Result};

const CHANNEL_PAGE_SIZE: u16 = 200;

/// Bot-token Slack client.
pub struct SlackGateway {
    client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    bot_token: SlackApiToken,
}

impl SlackGateway {
    /// Build the HTTPS client for the configured bot token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the HTTPS connector cannot be created.
    pub fn new(config: &SlackConfig) -> Result<Self> {
        let connector = SlackClientHyperHttpsConnector::new()
            .map_err(|err| AppError::Slack(format!("failed to init slack connector: {err}")))?;
        let client = Arc::new(SlackClient::new(connector));
        let bot_token = SlackApiToken {
            token_value: SlackApiTokenValue(config.bot_token.clone()),
            cookie: None,
            team_id: None,
            scope: None,
            token_type: Some(SlackApiTokenType::Bot),
        };

        info!("slack client initialized");
        Ok(Self { client, bot_token })
    }

    /// Create an HTTP session for direct API calls using the bot token.
    #[must_use]
    pub fn http_session(&self) -> SlackClientSession<'_, SlackClientHyperHttpsConnector> {
        self.client.open_session(&self.bot_token)
    }

    async fn list_channels_page(&self, cursor: Option<String>) -> Result<ChannelPage> {
        let mut request = SlackApiConversationsListRequest::new()
            .with_types(vec![
                SlackConversationType::Public,
                SlackConversationType::Private,
            ])
            .with_limit(CHANNEL_PAGE_SIZE);
        if let Some(cursor) = cursor {
            request = request.with_cursor(SlackCursorId(cursor));
        }

        let response = self
            .http_session()
            .conversations_list(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to list channels: {err}")))?;

        debug!(count = response.channels.len(), "fetched channel page");
        Ok(ChannelPage {
            channels: response
                .channels
                .into_iter()
                .map(|channel| ChannelSummary {
                    id: channel.id,
                    name: channel.name,
                })
                .collect(),
            next_cursor: response
                .response_metadata
                .and_then(|metadata| metadata.next_cursor)
                .map(|cursor| cursor.0),
        })
    }
}

impl ChatGateway for SlackGateway {
    fn resolve_channel<'a>(&'a self, name: &'a str) -> GatewayFuture<'a, Option<SlackChannelId>> {
        Box::pin(async move {
            find_channel_in_pages(name, |cursor| self.list_channels_page(cursor)).await
        })
    }

    fn post_message<'a>(
        &'a self,
        channel: &'a SlackChannelId,
        message: OutgoingMessage,
    ) -> GatewayFuture<'a, SlackTs> {
        Box::pin(async move {
            let request = message.into_request(channel.clone());
            let response = self
                .http_session()
                .chat_post_message(&request)
                .await
                .map_err(|err| AppError::Post(format!("failed to post message: {err}")))?;
            Ok(response.ts)
        })
    }

    fn fetch_message<'a>(
        &'a self,
        channel: &'a SlackChannelId,
        ts: &'a SlackTs,
    ) -> GatewayFuture<'a, Option<SlackTs>> {
        Box::pin(async move {
            let request = SlackApiConversationsHistoryRequest {
                channel: Some(channel.clone()),
                cursor: None,
                latest: Some(ts.clone()),
                limit: Some(1),
                oldest: Some(ts.clone()),
                inclusive: Some(true),
                include_all_metadata: None,
            };

            let response = self
                .http_session()
                .conversations_history(&request)
                .await
                .map_err(|err| AppError::Slack(format!("failed to fetch message: {err}")))?;

            Ok(exact_message(
                response.messages.into_iter().map(|message| message.origin.ts),
                ts,
            ))
        })
    }
}

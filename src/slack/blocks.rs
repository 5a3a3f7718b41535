//! Slack Block Kit message builders.
//!
//! Renders the ticket summary that anchors a thread and the per-article
//! replies posted under it.

use slack_morphism::prelude::{
    SlackBlock, SlackBlockMarkDownText, SlackBlockPlainText, SlackBlockText, SlackContextBlock,
    SlackContextBlockElement, SlackDividerBlock, SlackSectionBlock,
};
use tracing::debug;

use crate::markup::{self, slack_escape, AttachmentIcon, RenderedBody};
use crate::models::article::Attachment;
use crate::models::user::User;
use crate::models::webhook::WebhookEvent;

/// Build a verbatim `mrkdwn` section block.
#[must_use]
pub fn markdown_section(text: &str) -> SlackBlock {
    SlackBlock::Section(SlackSectionBlock::new().with_text(SlackBlockText::MarkDown(
        SlackBlockMarkDownText::new(text.into()).with_verbatim(true),
    )))
}

/// Build a plain-text section block.
#[must_use]
pub fn plain_section(text: &str) -> SlackBlock {
    SlackBlock::Section(
        SlackSectionBlock::new()
            .with_text(SlackBlockText::Plain(SlackBlockPlainText::new(text.into()))),
    )
}

/// Build a section linking to an attachment, prefixed by its type icon.
#[must_use]
pub fn attachment_section(attachment: &Attachment) -> SlackBlock {
    let icon = AttachmentIcon::for_mime(attachment.mime_type());
    markdown_section(&format!(
        ":{}: <{}|{}>",
        icon.emoji(),
        attachment.url,
        slack_escape(&attachment.filename)
    ))
}

/// Renders ticket events into Block Kit payloads with links back into Zammad.
#[derive(Debug, Clone)]
pub struct MessageRenderer {
    base_url: String,
}

impl MessageRenderer {
    /// Create a renderer for the Zammad instance at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Agent UI link to a ticket.
    #[must_use]
    pub fn ticket_url(&self, ticket_id: u64) -> String {
        format!("{}/#ticket/zoom/{ticket_id}", self.base_url)
    }

    /// Avatar image URL for a user image hash.
    #[must_use]
    pub fn avatar_url(&self, image: &str) -> String {
        format!("{}/api/v1/users/image/{image}", self.base_url)
    }

    /// Blocks of the top-level message that anchors a ticket's thread:
    /// customer line, linked title, and a plain-text preview of the article.
    #[must_use]
    pub fn ticket_summary(&self, event: &WebhookEvent) -> Vec<SlackBlock> {
        let ticket = &event.ticket;
        let mut elements = self.avatar_element(&ticket.customer);
        elements.push(SlackContextBlockElement::Plain(SlackBlockPlainText::new(
            ticket.customer.label(None),
        )));

        let mut blocks = vec![
            SlackBlock::Context(SlackContextBlock::new(elements)),
            markdown_section(&format!(
                "<{}|*{}*>",
                self.ticket_url(ticket.id),
                slack_escape(&ticket.title)
            )),
        ];

        let preview = markup::preview(event.article.content_type, &event.article.body);
        if !preview.trim().is_empty() {
            blocks.push(plain_section(&preview));
        }
        blocks
    }

    /// Blocks of a threaded reply relaying one article: author line, body,
    /// and attachment links.
    #[must_use]
    pub fn article_reply(&self, event: &WebhookEvent) -> Vec<SlackBlock> {
        let actor = event.actor();
        let mut elements = self.avatar_element(actor);
        elements.push(SlackContextBlockElement::MarkDown(
            SlackBlockMarkDownText::new(format!(
                "<{}|{}>",
                self.ticket_url(event.ticket.id),
                slack_escape(&Self::author_label(event))
            ))
            .with_verbatim(true),
        ));

        let mut blocks = vec![SlackBlock::Context(SlackContextBlock::new(elements))];

        let body = markup::render_body(event.article.content_type, &event.article.body);
        if !body.text().trim().is_empty() {
            blocks.push(match &body {
                RenderedBody::Markdown(text) => markdown_section(text),
                RenderedBody::Plain(text) => plain_section(text),
            });
        }

        if !event.article.attachments.is_empty() {
            blocks.push(SlackBlock::Divider(SlackDividerBlock::new()));
            blocks.push(SlackBlock::Context(SlackContextBlock::new(vec![
                SlackContextBlockElement::Plain(SlackBlockPlainText::new("Attachments".into())),
            ])));
            blocks.extend(event.article.attachments.iter().map(attachment_section));
        }
        blocks
    }

    /// Notification text for the thread anchor.
    #[must_use]
    pub fn summary_text(event: &WebhookEvent) -> String {
        event.ticket.title.clone()
    }

    /// `"First Last (Agent)"` for agent articles, `"First Last (email)"`
    /// otherwise.
    #[must_use]
    pub fn author_label(event: &WebhookEvent) -> String {
        let role = event.article.is_from_agent().then_some("Agent");
        event.actor().label(role)
    }

    fn avatar_element(&self, user: &User) -> Vec<SlackContextBlockElement> {
        let Some(image) = user.avatar() else {
            return Vec::new();
        };
        let element = serde_json::json!({
            "type": "image",
            "image_url": self.avatar_url(image),
            "alt_text": format!("Avatar for {}", user.email),
        });
        match serde_json::from_value::<SlackContextBlockElement>(element) {
            Ok(element) => vec![element],
            Err(err) => {
                debug!(%err, "skipping avatar element");
                Vec::new()
            }
        }
    }
}

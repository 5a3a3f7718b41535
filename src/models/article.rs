//! Ticket article (comment) as delivered in the webhook payload.

use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::user::User;

/// MIME content type of an article body.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    /// `text/html` rich-text body.
    Html,
    /// Any other content type; the body is used verbatim.
    #[default]
    Plain,
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("text/html") {
            Self::Html
        } else {
            Self::Plain
        }
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        match value {
            ContentType::Html => "text/html".into(),
            ContentType::Plain => "text/plain".into(),
        }
    }
}

/// Attachment-level preferences; only the MIME hint is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentPreferences {
    /// MIME type reported by Zammad.
    #[serde(rename = "Mime-Type", default)]
    pub mime_type: Option<String>,
}

/// File attached to an article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name.
    pub filename: String,
    /// Download URL inside Zammad.
    pub url: String,
    /// Attachment preferences.
    #[serde(default, deserialize_with = "null_as_default")]
    pub preferences: AttachmentPreferences,
}

impl Attachment {
    /// MIME type hint, if Zammad recorded one.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.preferences.mime_type.as_deref()
    }
}

/// A ticket article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    /// Article identifier.
    pub id: u64,
    /// Parent ticket identifier.
    #[serde(default)]
    pub ticket_id: Option<u64>,
    /// Body content type.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type: ContentType,
    /// Raw body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    /// Sender role, e.g. `Agent` or `Customer`.
    #[serde(default)]
    pub sender: Option<String>,
    /// User who created the article.
    #[serde(default)]
    pub created_by: Option<User>,
    /// Attached files.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,
}

impl Article {
    /// Whether the article was written by an agent.
    #[must_use]
    pub fn is_from_agent(&self) -> bool {
        self.sender.as_deref() == Some("Agent")
    }
}

//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing, validation, or credential loading failure.
    Config(String),
    /// Slack API failure outside of message posting.
    Slack(String),
    /// Zammad API failure outside of ticket updates.
    Zammad(String),
    /// Missing or mismatched webhook signature.
    Unauthorized(String),
    /// No Slack channel matches the requested name.
    ChannelNotFound(String),
    /// The ticket referenced by the event no longer exists.
    TicketNotFound(String),
    /// The inbound webhook body is missing or does not match the schema.
    MalformedPayload(String),
    /// Slack rejected a message post.
    Post(String),
    /// Zammad rejected a ticket update.
    Update(String),
    /// File-system or socket operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Slack(msg) => write!(f, "slack: {msg}"),
            Self::Zammad(msg) => write!(f, "zammad: {msg}"),
            Self::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            Self::ChannelNotFound(msg) => write!(f, "channel not found: {msg}"),
            Self::TicketNotFound(msg) => write!(f, "ticket not found: {msg}"),
            Self::MalformedPayload(msg) => write!(f, "malformed payload: {msg}"),
            Self::Post(msg) => write!(f, "post failed: {msg}"),
            Self::Update(msg) => write!(f, "update failed: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Zammad(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

//! Article body conversion for Slack.
//!
//! Zammad stores article bodies either as HTML or as plain text. Slack needs
//! two renderings of them:
//!
//! - a compact plain-text preview for the ticket summary that anchors a
//!   thread ([`convert_plain`], at most [`PREVIEW_MAX_CHARS`]),
//! - a full `mrkdwn` rendering for the threaded reply ([`convert_full`], at
//!   most [`BODY_MAX_CHARS`]).
//!
//! Both are pure functions of their input.

mod builder;
mod walker;

use crate::models::article::ContentType;

use walker::Flavor;

/// Maximum length of the summary preview, in characters.
pub const PREVIEW_MAX_CHARS: usize = 300;

/// Maximum length of a rendered article body, in characters.
///
/// Matches Slack's limit for a section block's text object.
pub const BODY_MAX_CHARS: usize = 3000;

/// Escape the three characters Slack treats as control characters.
#[must_use]
pub fn slack_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Truncate to at most `max_chars` Unicode scalar values.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// HTML → plain-text preview: no markup, no images, link text only,
/// newlines flattened to spaces, truncated to [`PREVIEW_MAX_CHARS`].
#[must_use]
pub fn convert_plain(html: &str) -> String {
    flatten_preview(&walker::render(html, Flavor::Plain))
}

/// HTML → Slack `mrkdwn`, truncated to [`BODY_MAX_CHARS`].
#[must_use]
pub fn convert_full(html: &str) -> String {
    truncate(&walker::render(html, Flavor::Slack), BODY_MAX_CHARS).to_owned()
}

/// Preview of an article body of either content type.
#[must_use]
pub fn preview(content_type: ContentType, body: &str) -> String {
    match content_type {
        ContentType::Html => convert_plain(body),
        ContentType::Plain => flatten_preview(body),
    }
}

/// Full rendering of an article body, tagged with the Slack text type it
/// must be posted as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBody {
    /// Slack `mrkdwn`, already escaped.
    Markdown(String),
    /// Verbatim plain text.
    Plain(String),
}

impl RenderedBody {
    /// The rendered text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Markdown(text) | Self::Plain(text) => text,
        }
    }
}

/// Full rendering of an article body of either content type.
#[must_use]
pub fn render_body(content_type: ContentType, body: &str) -> RenderedBody {
    match content_type {
        ContentType::Html => RenderedBody::Markdown(convert_full(body)),
        ContentType::Plain => RenderedBody::Plain(truncate(body, BODY_MAX_CHARS).to_owned()),
    }
}

fn flatten_preview(text: &str) -> String {
    truncate(&text.replace('\n', " "), PREVIEW_MAX_CHARS).to_owned()
}

/// Emoji shown next to an attachment link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentIcon {
    /// `image/*`.
    Picture,
    /// `text/*`.
    Memo,
    /// `application/*`.
    Book,
    /// Anything else, or no MIME type.
    Paperclip,
}

impl AttachmentIcon {
    /// Select the icon for a MIME type hint.
    #[must_use]
    pub fn for_mime(mime_type: Option<&str>) -> Self {
        let Some(mime_type) = mime_type else {
            return Self::Paperclip;
        };
        if mime_type.starts_with("image/") {
            Self::Picture
        } else if mime_type.starts_with("text/") {
            Self::Memo
        } else if mime_type.starts_with("application/") {
            Self::Book
        } else {
            Self::Paperclip
        }
    }

    /// Slack emoji short name, without colons.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Picture => "frame_with_picture",
            Self::Memo => "memo",
            Self::Book => "closed_book",
            Self::Paperclip => "paperclip",
        }
    }
}

//! Zammad user as embedded in webhook payloads.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A Zammad user; used only for formatting, never persisted here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Given name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub firstname: String,
    /// Family name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub lastname: String,
    /// Primary email address.
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Avatar image hash, served by `/api/v1/users/image/{image}`.
    #[serde(default)]
    pub image: Option<String>,
}

impl User {
    /// Full display name, `"First Last"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// `"First Last (email)"`, or `"First Last (role)"` when a role is given.
    #[must_use]
    pub fn label(&self, role: Option<&str>) -> String {
        format!("{} ({})", self.display_name(), role.unwrap_or(&self.email))
    }

    /// Avatar image reference, ignoring empty hashes.
    #[must_use]
    pub fn avatar(&self) -> Option<&str> {
        self.image.as_deref().filter(|image| !image.is_empty())
    }
}

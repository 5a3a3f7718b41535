//! Ticket models: the webhook view and the stored view.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::correlation::CorrelationState;
use super::user::User;

/// Key of the correlation sub-record inside ticket preferences.
pub const CORRELATION_KEY: &str = "slack_gateway";

/// Zammad group the ticket is assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    /// Group name, e.g. `Users`.
    pub name: String,
}

/// Ticket as delivered in the webhook payload.
///
/// Zammad filters `preferences` out of webhook payloads, so this type
/// carries no correlation state; see [`StoredTicket`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    /// Ticket identifier.
    pub id: u64,
    /// Human-facing ticket number.
    #[serde(default)]
    pub number: Option<String>,
    /// Ticket subject line.
    pub title: String,
    /// Customer who opened the ticket.
    pub customer: User,
    /// Assigned group.
    #[serde(default)]
    pub group: Option<Group>,
}

/// Ticket as returned by the Zammad REST API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredTicket {
    /// Ticket identifier.
    pub id: u64,
    /// Arbitrary preferences map, including the correlation sub-record.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub preferences: Map<String, Value>,
}

impl StoredTicket {
    /// Correlation state stored on the ticket, if any.
    ///
    /// A sub-record that does not match the expected shape is treated as
    /// absent so the next relay starts a fresh thread and overwrites it.
    #[must_use]
    pub fn correlation(&self) -> Option<CorrelationState> {
        let raw = self.preferences.get(CORRELATION_KEY)?;
        if raw.is_null() {
            return None;
        }
        match serde_json::from_value::<CorrelationState>(raw.clone()) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(ticket_id = self.id, %err, "ignoring unreadable correlation state");
                None
            }
        }
    }
}

/// Partial ticket update carrying the correlation sub-record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TicketUpdate {
    /// Preferences to merge into the stored ticket.
    pub preferences: PreferencesUpdate,
}

/// Preferences subset written by the gateway.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PreferencesUpdate {
    /// Correlation sub-record.
    pub slack_gateway: CorrelationState,
}

impl TicketUpdate {
    /// Build an update that replaces the correlation sub-record.
    #[must_use]
    pub fn correlation(state: CorrelationState) -> Self {
        Self {
            preferences: PreferencesUpdate {
                slack_gateway: state,
            },
        }
    }
}

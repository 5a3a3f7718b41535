#![forbid(unsafe_code)]

//! Relays Zammad ticket articles into per-ticket Slack threads.
//!
//! The thread a ticket maps to is remembered on the ticket itself
//! (`preferences.slack_gateway`), so the gateway keeps no local state.

pub mod config;
pub mod errors;
pub mod markup;
pub mod models;
pub mod persistence;
pub mod relay;
pub mod server;
pub mod slack;
pub mod zammad;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};

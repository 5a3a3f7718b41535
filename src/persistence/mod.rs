//! Persistence layer modules.
//!
//! Correlation state lives on the Zammad ticket itself, under
//! `preferences.slack_gateway`; there is no local database.

pub mod correlation_repo;

//! Zammad ticketing backend access.

pub mod client;
pub mod store;

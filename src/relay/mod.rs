//! Ticket-to-thread relay.

pub mod correlator;

pub use correlator::{Correlator, RelayOutcome};

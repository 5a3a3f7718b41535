//! Correlation state repository backed by ticket preferences.
//!
//! The gateway owns no database: the `{ ts, last_article_seen }` record lives
//! in the ticket's `preferences.slack_gateway` and is read-modify-written
//! through the [`TicketStore`]. Writes are unconditional; the backend offers
//! no version check, so two events for one ticket racing through
//! [`load`](CorrelationRepo::load) and [`save`](CorrelationRepo::save) can
//! overwrite each other.

use std::sync::Arc;

use tracing::debug;

use crate::models::correlation::CorrelationState;
use crate::models::ticket::TicketUpdate;
use crate::zammad::store::TicketStore;
use crate::Result;

/// Repository wrapper around a [`TicketStore`] for correlation records.
#[derive(Clone)]
pub struct CorrelationRepo {
    store: Arc<dyn TicketStore>,
}

impl CorrelationRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Read the correlation record from the authoritative ticket.
    ///
    /// # Errors
    ///
    /// Returns `AppError::TicketNotFound` if the ticket does not exist.
    pub async fn load(&self, ticket_id: u64) -> Result<Option<CorrelationState>> {
        let ticket = self.store.get_ticket(ticket_id).await?;
        let state = ticket.correlation();
        debug!(ticket_id, ?state, "loaded correlation state");
        Ok(state)
    }

    /// Replace the correlation record on the ticket.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Update` if the backend rejects the write.
    pub async fn save(&self, ticket_id: u64, state: &CorrelationState) -> Result<()> {
        let update = TicketUpdate::correlation(state.clone());
        self.store.update_ticket(ticket_id, &update).await?;
        debug!(ticket_id, ?state, "saved correlation state");
        Ok(())
    }
}

//! Ticket backend abstraction consumed by the correlation repository.

use std::future::Future;
use std::pin::Pin;

use crate::models::ticket::{StoredTicket, TicketUpdate};
use crate::Result;

/// Boxed future returned by ticket store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Ticket read and partial update.
pub trait TicketStore: Send + Sync {
    /// Fetch the authoritative ticket record, including preferences.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TicketNotFound`](crate::AppError::TicketNotFound)
    /// if the ticket does not exist, or
    /// [`AppError::Zammad`](crate::AppError::Zammad) on other failures.
    fn get_ticket(&self, id: u64) -> StoreFuture<'_, StoredTicket>;

    /// Merge `update` into the stored ticket.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Update`](crate::AppError::Update) if the backend
    /// rejects the update.
    fn update_ticket<'a>(&'a self, id: u64, update: &'a TicketUpdate) -> StoreFuture<'a, ()>;
}

//! Store queries for venues, artists and shows
//!
//! Reads go straight to the pool. Every write runs in its own transaction,
//! rolled back explicitly on failure.

use sqlx::{Sqlite, Transaction};

pub mod artists;
pub mod shows;
pub mod venues;

pub use artists::*;
pub use shows::*;
pub use venues::*;

/// Roll back `tx`, logging (not propagating) a failed rollback
///
/// The caller already holds the error that aborted the write.
pub(crate) async fn rollback(tx: Transaction<'_, Sqlite>, caller: &'static str) {
    match tx.rollback().await {
        Ok(()) => tracing::debug!(caller = caller, "Transaction rolled back"),
        Err(e) => tracing::warn!(caller = caller, error = %e, "Rollback failed"),
    }
}

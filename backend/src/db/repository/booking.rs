//! Booking repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::models::{Booking, NewBooking, WorkspaceId};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking. The referenced workspace must exist.
    ///
    /// # Returns
    /// * `Ok(Booking)` - The stored record
    /// * `Err(RepositoryError::NotFound)` - Unknown workspace
    async fn create_booking(&self, booking: NewBooking) -> RepositoryResult<Booking>;

    /// List every booking in insertion order.
    async fn list_bookings(&self) -> RepositoryResult<Vec<Booking>>;

    /// Find confirmed bookings on any of `workspace_ids` whose interval
    /// overlaps `[window_start, window_end]` (both ends inclusive).
    ///
    /// # Arguments
    /// * `workspace_ids` - Set-membership filter; an empty slice matches nothing
    /// * `window_start` - Earliest instant of interest
    /// * `window_end` - Latest instant of interest
    ///
    /// # Returns
    /// * `Ok(Vec<Booking>)` - Matching bookings in insertion order
    async fn find_confirmed_bookings(
        &self,
        workspace_ids: &[WorkspaceId],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Booking>>;
}

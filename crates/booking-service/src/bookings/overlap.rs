use std::sync::Arc;

use super::domain::{Booking, BookingId, BookingStatus, BookingWindow, ListingId};
use super::repository::{BookingRepository, RepositoryError};

/// Policy dial for which statuses hold their date range against new requests.
///
/// `BlockActive` blocks at creation time against pending and accepted
/// bookings, so two pending requests can never both become confirmable.
/// `BlockAcceptedOnly` lets pending requests race and resolves the winner at
/// confirm time instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    #[default]
    BlockActive,
    BlockAcceptedOnly,
}

impl OverlapPolicy {
    /// Whether a booking in `status` holds its range under this policy.
    pub fn blocks(self, status: BookingStatus) -> bool {
        match self {
            OverlapPolicy::BlockActive => status.is_active(),
            OverlapPolicy::BlockAcceptedOnly => status == BookingStatus::Accepted,
        }
    }
}

/// Existence test for date-range collisions within one listing.
pub struct ConflictDetector<R> {
    repository: Arc<R>,
    policy: OverlapPolicy,
}

impl<R> ConflictDetector<R>
where
    R: BookingRepository,
{
    pub fn new(repository: Arc<R>, policy: OverlapPolicy) -> Self {
        Self { repository, policy }
    }

    /// First booking on `listing_id` whose range collides with `window`.
    ///
    /// `exclude` skips one booking when re-validating that booking's own
    /// update or confirmation. Rejected and cancelled bookings never block:
    /// the store only surfaces active ones and the policy filters further.
    pub fn find_conflict(
        &self,
        listing_id: &ListingId,
        window: &BookingWindow,
        exclude: Option<&BookingId>,
    ) -> Result<Option<Booking>, RepositoryError> {
        let candidates = self.repository.list_active_for_listing(listing_id)?;
        Ok(candidates.into_iter().find(|candidate| {
            if exclude == Some(&candidate.id) {
                return false;
            }
            self.policy.blocks(candidate.status) && candidate.window.overlaps(window)
        }))
    }

    /// Boolean form of [`find_conflict`](Self::find_conflict).
    pub fn has_overlap(
        &self,
        listing_id: &ListingId,
        window: &BookingWindow,
        exclude: Option<&BookingId>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.find_conflict(listing_id, window, exclude)?.is_some())
    }
}

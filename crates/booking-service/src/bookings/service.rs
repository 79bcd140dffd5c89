use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::warn;

use super::domain::{
    Booking, BookingDatesPatch, BookingId, BookingRequest, BookingWindow, LandlordId, ListingId,
    TenantId, WindowError,
};
use super::lifecycle::{transition, BookingAction, InvalidTransition};
use super::overlap::{ConflictDetector, OverlapPolicy};
use super::repository::{
    BookingEvent, BookingEventKind, BookingRepository, EventPublisher, RepositoryError,
};

/// Tuning knobs handed to the service at construction; no process-global
/// state, no environment access.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Longest wait for a listing's exclusivity scope before failing `Busy`.
    pub scope_timeout: Duration,
    pub overlap_policy: OverlapPolicy,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            scope_timeout: Duration::from_secs(5),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

/// Selector for the list operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingFilter {
    All,
    Listing(ListingId),
    Tenant(TenantId),
    Landlord(LandlordId),
}

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    #[error(transparent)]
    Validation(#[from] WindowError),
    #[error("requested dates collide with booking {booking_id} covering {window}")]
    Conflict {
        booking_id: BookingId,
        window: BookingWindow,
    },
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error("listing {listing_id} is busy; retry shortly")]
    Busy { listing_id: ListingId },
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Service composing the store, conflict detector, and lifecycle table under
/// per-listing exclusivity.
///
/// Every read-then-write operation on a listing runs inside that listing's
/// scope, so an overlap check and the commit it guards can never interleave
/// with a competing writer. Operations on different listings proceed in
/// parallel; reads never take a scope.
pub struct BookingService<R, E> {
    repository: Arc<R>,
    events: Arc<E>,
    detector: ConflictDetector<R>,
    scopes: ListingScopes,
}

impl<R, E> BookingService<R, E>
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    pub fn new(repository: Arc<R>, events: Arc<E>, config: BookingConfig) -> Self {
        let detector = ConflictDetector::new(repository.clone(), config.overlap_policy);
        Self {
            repository,
            events,
            detector,
            scopes: ListingScopes::new(config.scope_timeout),
        }
    }

    /// Create a `Pending` booking after validating dates and availability.
    pub async fn create(&self, request: BookingRequest) -> Result<Booking, BookingServiceError> {
        let window = request.window()?;
        let created = {
            let _scope = self.scopes.acquire(&request.listing_id).await?;
            self.ensure_free(&request.listing_id, &window, None)?;
            self.repository.insert(Booking::pending(request, window))?
        };
        self.emit(BookingEventKind::Created, &created);
        Ok(created)
    }

    /// Accept a pending booking, re-checking the range now that time has
    /// passed since creation.
    pub async fn confirm(&self, id: &BookingId) -> Result<Booking, BookingServiceError> {
        let updated = {
            let (mut booking, _scope) = self.load_scoped(id).await?;
            booking.status = transition(booking.status, BookingAction::Confirm)?;
            self.ensure_free(&booking.listing_id, &booking.window, Some(&booking.id))?;
            booking.touch();
            self.repository.update(booking.clone())?;
            booking
        };
        self.emit(BookingEventKind::Confirmed, &updated);
        Ok(updated)
    }

    /// Decline a pending booking, freeing its range.
    pub async fn reject(&self, id: &BookingId) -> Result<Booking, BookingServiceError> {
        let updated = {
            let (mut booking, _scope) = self.load_scoped(id).await?;
            booking.status = transition(booking.status, BookingAction::Reject)?;
            booking.touch();
            self.repository.update(booking.clone())?;
            booking
        };
        self.emit(BookingEventKind::Rejected, &updated);
        Ok(updated)
    }

    /// Cancel a pending or accepted booking. The record stays queryable;
    /// only its hold on the date range is released.
    pub async fn cancel(&self, id: &BookingId) -> Result<Booking, BookingServiceError> {
        let updated = {
            let (mut booking, _scope) = self.load_scoped(id).await?;
            booking.status = transition(booking.status, BookingAction::Cancel)?;
            booking.touch();
            self.repository.update(booking.clone())?;
            booking
        };
        self.emit(BookingEventKind::Cancelled, &updated);
        Ok(updated)
    }

    /// Re-window a pending or accepted booking; unset patch fields keep the
    /// stored value.
    pub async fn update_dates(
        &self,
        id: &BookingId,
        patch: BookingDatesPatch,
    ) -> Result<Booking, BookingServiceError> {
        let (mut booking, _scope) = self.load_scoped(id).await?;
        booking.status = transition(booking.status, BookingAction::UpdateDates)?;
        let window = BookingWindow::new(
            patch.start_date.unwrap_or(booking.window.start_date),
            patch.end_date.unwrap_or(booking.window.end_date),
        )?;
        self.ensure_free(&booking.listing_id, &window, Some(&booking.id))?;
        booking.window = window;
        booking.touch();
        self.repository.update(booking.clone())?;
        Ok(booking)
    }

    /// Administrative hard delete; not part of the tenant-facing lifecycle
    /// and deliberately silent on the event channel.
    pub async fn delete(&self, id: &BookingId) -> Result<(), BookingServiceError> {
        let (booking, _scope) = self.load_scoped(id).await?;
        self.repository.remove(&booking.id)?;
        Ok(())
    }

    pub fn get(&self, id: &BookingId) -> Result<Booking, BookingServiceError> {
        Ok(self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    pub fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, BookingServiceError> {
        let bookings = match filter {
            BookingFilter::All => self.repository.list_all()?,
            BookingFilter::Listing(listing_id) => self.repository.list_by_listing(listing_id)?,
            BookingFilter::Tenant(tenant_id) => self.repository.list_by_tenant(tenant_id)?,
            BookingFilter::Landlord(landlord_id) => {
                self.repository.list_by_landlord(landlord_id)?
            }
        };
        Ok(bookings)
    }

    /// Resolve the booking's listing scope, then reload the record under it
    /// so the critical section always sees the latest committed state.
    async fn load_scoped(
        &self,
        id: &BookingId,
    ) -> Result<(Booking, OwnedMutexGuard<()>), BookingServiceError> {
        let listing_id = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?
            .listing_id;
        let scope = self.scopes.acquire(&listing_id).await?;
        let booking = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok((booking, scope))
    }

    fn ensure_free(
        &self,
        listing_id: &ListingId,
        window: &BookingWindow,
        exclude: Option<&BookingId>,
    ) -> Result<(), BookingServiceError> {
        match self.detector.find_conflict(listing_id, window, exclude)? {
            Some(other) => Err(BookingServiceError::Conflict {
                booking_id: other.id,
                window: other.window,
            }),
            None => Ok(()),
        }
    }

    /// Best-effort notification after the commit; a failed publish is logged
    /// and dropped, never surfaced to the caller.
    fn emit(&self, kind: BookingEventKind, booking: &Booking) {
        let event = BookingEvent::for_booking(kind, booking);
        if let Err(err) = self.events.publish(event) {
            warn!(booking_id = %booking.id, error = %err, "booking event dropped");
        }
    }
}

/// Keyed exclusivity scopes; one lock per listing so unrelated listings
/// never serialize behind each other.
struct ListingScopes {
    timeout: Duration,
    entries: Mutex<HashMap<ListingId, Arc<AsyncMutex<()>>>>,
}

impl ListingScopes {
    fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Take the scope for `listing_id`, waiting at most the configured
    /// timeout. Dropping the returned guard (including via caller
    /// cancellation) releases the scope.
    async fn acquire(
        &self,
        listing_id: &ListingId,
    ) -> Result<OwnedMutexGuard<()>, BookingServiceError> {
        let entry = {
            let mut entries = self.entries.lock().expect("listing scope registry poisoned");
            Arc::clone(entries.entry(*listing_id).or_default())
        };

        tokio::time::timeout(self.timeout, entry.lock_owned())
            .await
            .map_err(|_| BookingServiceError::Busy {
                listing_id: *listing_id,
            })
    }
}

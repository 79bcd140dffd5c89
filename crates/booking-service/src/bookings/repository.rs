use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Booking, BookingId, LandlordId, ListingId, TenantId};

/// Storage abstraction so the service can run against in-memory or durable
/// backends and be exercised in isolation.
///
/// The store is the sole source of truth: every listing contract below must
/// reflect the latest committed state at call time.
pub trait BookingRepository: Send + Sync {
    /// Insert a new record; refuses ids that already exist.
    fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError>;
    /// Replace an existing record.
    fn update(&self, booking: Booking) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError>;
    /// Hard delete, distinct from cancellation.
    fn remove(&self, id: &BookingId) -> Result<(), RepositoryError>;
    /// All bookings across the system, `created_at` ascending.
    fn list_all(&self) -> Result<Vec<Booking>, RepositoryError>;
    fn list_by_listing(&self, listing_id: &ListingId) -> Result<Vec<Booking>, RepositoryError>;
    fn list_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<Booking>, RepositoryError>;
    fn list_by_landlord(&self, landlord_id: &LandlordId) -> Result<Vec<Booking>, RepositoryError>;
    /// Bookings still holding their range (`Pending` or `Accepted`).
    fn list_active_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<Booking>, RepositoryError>;
}

/// Error enumeration for booking store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("booking id already exists")]
    DuplicateId,
    #[error("booking not found")]
    NotFound,
    #[error("booking store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification hook (Pub/Sub, webhook adapters).
///
/// Implementations must bound their own send time; the service treats a slow
/// or failing publisher as a dropped event, never as an operation failure.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: BookingEvent) -> Result<(), EventError>;
}

/// Lifecycle notifications fanned out after a committed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingEventKind {
    #[serde(rename = "booking_created")]
    Created,
    #[serde(rename = "booking_confirmed")]
    Confirmed,
    #[serde(rename = "booking_rejected")]
    Rejected,
    #[serde(rename = "booking_cancelled")]
    Cancelled,
}

impl BookingEventKind {
    pub const fn label(self) -> &'static str {
        match self {
            BookingEventKind::Created => "booking_created",
            BookingEventKind::Confirmed => "booking_confirmed",
            BookingEventKind::Rejected => "booking_rejected",
            BookingEventKind::Cancelled => "booking_cancelled",
        }
    }
}

/// Payload delivered to the event notifier; at-most-once, best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingEvent {
    pub event_type: BookingEventKind,
    pub booking_id: BookingId,
    pub listing_id: ListingId,
    pub tenant_id: TenantId,
    pub timestamp: DateTime<Utc>,
}

impl BookingEvent {
    pub fn for_booking(event_type: BookingEventKind, booking: &Booking) -> Self {
        Self {
            event_type,
            booking_id: booking.id,
            listing_id: booking.listing_id,
            tenant_id: booking.tenant_id.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Event dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for persisted bookings; v4, server-assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

impl BookingId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the rented unit; the listing service owns the full record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub Uuid);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque contact identifier of the tenant requesting the booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of the landlord owning the listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LandlordId(pub String);

impl fmt::Display for LandlordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rental period with half-open `[start_date, end_date)` semantics, so
/// back-to-back stays may share a boundary instant without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl BookingWindow {
    /// Validate the requested period; zero-length and inverted ranges are refused.
    pub fn new(
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Self, WindowError> {
        if start_date >= end_date {
            return Err(WindowError {
                start_date,
                end_date,
            });
        }

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Two half-open windows overlap iff each starts before the other ends.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start_date < other.end_date && other.start_date < self.end_date
    }
}

impl fmt::Display for BookingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {})",
            self.start_date.to_rfc3339(),
            self.end_date.to_rfc3339()
        )
    }
}

/// Raised when a requested period does not satisfy `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("booking window must satisfy start < end (start {start_date}, end {end_date})")]
pub struct WindowError {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// High level status tracked throughout the booking lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Active bookings hold their date range against competing requests.
    pub const fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Accepted)
    }

    /// Terminal states accept no further mutating transitions.
    pub const fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Rejected | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intake payload for a new booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub listing_id: ListingId,
    pub tenant_id: TenantId,
    pub landlord_id: LandlordId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl BookingRequest {
    /// Validate the requested period into a well-formed window.
    pub fn window(&self) -> Result<BookingWindow, WindowError> {
        BookingWindow::new(self.start_date, self.end_date)
    }
}

/// Partial dates update; unset fields keep their stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDatesPatch {
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

/// The central booking record; mutated only through the booking service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub listing_id: ListingId,
    pub tenant_id: TenantId,
    pub landlord_id: LandlordId,
    #[serde(flatten)]
    pub window: BookingWindow,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a fresh `Pending` record with server-assigned id and timestamps.
    pub fn pending(request: BookingRequest, window: BookingWindow) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::generate(),
            listing_id: request.listing_id,
            tenant_id: request.tenant_id,
            landlord_id: request.landlord_id,
            window,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stamp a mutation; `updated_at` never runs behind `created_at`.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

//! Rental booking lifecycle: intake, conflict detection, status transitions,
//! and per-listing concurrency control.
//!
//! The [`service::BookingService`] is the only writer; it consults the
//! [`overlap::ConflictDetector`] and the [`lifecycle`] transition table
//! inside a per-listing exclusivity scope before committing to the
//! [`repository::BookingRepository`], then notifies the
//! [`repository::EventPublisher`] on a best-effort basis.

pub mod domain;
pub mod lifecycle;
pub mod overlap;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    Booking, BookingDatesPatch, BookingId, BookingRequest, BookingStatus, BookingWindow,
    LandlordId, ListingId, TenantId, WindowError,
};
pub use lifecycle::{transition, BookingAction, InvalidTransition};
pub use overlap::{ConflictDetector, OverlapPolicy};
pub use repository::{
    BookingEvent, BookingEventKind, BookingRepository, EventError, EventPublisher, RepositoryError,
};
pub use router::booking_router;
pub use service::{BookingConfig, BookingFilter, BookingService, BookingServiceError};
pub use store::InMemoryBookingStore;

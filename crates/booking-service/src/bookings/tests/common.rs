use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::bookings::domain::{
    Booking, BookingId, BookingRequest, BookingStatus, BookingWindow, LandlordId, ListingId,
    TenantId,
};
use crate::bookings::overlap::OverlapPolicy;
use crate::bookings::repository::{
    BookingEvent, BookingRepository, EventError, EventPublisher, RepositoryError,
};
use crate::bookings::router::booking_router;
use crate::bookings::service::{BookingConfig, BookingService};
use crate::bookings::store::InMemoryBookingStore;

pub(super) fn may(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0)
        .single()
        .expect("valid date")
}

pub(super) fn window(start_day: u32, end_day: u32) -> BookingWindow {
    BookingWindow::new(may(start_day), may(end_day)).expect("valid window")
}

pub(super) fn listing() -> ListingId {
    ListingId(Uuid::new_v4())
}

pub(super) fn request(listing_id: ListingId, start_day: u32, end_day: u32) -> BookingRequest {
    request_for_tenant(listing_id, "tenant-t1", start_day, end_day)
}

pub(super) fn request_for_tenant(
    listing_id: ListingId,
    tenant: &str,
    start_day: u32,
    end_day: u32,
) -> BookingRequest {
    BookingRequest {
        listing_id,
        tenant_id: TenantId(tenant.to_string()),
        landlord_id: LandlordId("landlord-l1".to_string()),
        start_date: may(start_day),
        end_date: may(end_day),
    }
}

/// Booking as it would sit in the store after reaching `status`.
pub(super) fn stored_booking(
    listing_id: ListingId,
    start_day: u32,
    end_day: u32,
    status: BookingStatus,
) -> Booking {
    let mut booking = Booking::pending(
        request(listing_id, start_day, end_day),
        window(start_day, end_day),
    );
    booking.status = status;
    booking
}

pub(super) fn booking_config() -> BookingConfig {
    BookingConfig {
        scope_timeout: Duration::from_millis(250),
        overlap_policy: OverlapPolicy::BlockActive,
    }
}

pub(super) fn build_service() -> (
    BookingService<InMemoryBookingStore, RecordingPublisher>,
    Arc<InMemoryBookingStore>,
    Arc<RecordingPublisher>,
) {
    build_service_with(booking_config())
}

pub(super) fn build_service_with(
    config: BookingConfig,
) -> (
    BookingService<InMemoryBookingStore, RecordingPublisher>,
    Arc<InMemoryBookingStore>,
    Arc<RecordingPublisher>,
) {
    let store = Arc::new(InMemoryBookingStore::default());
    let events = Arc::new(RecordingPublisher::default());
    let service = BookingService::new(store.clone(), events.clone(), config);
    (service, store, events)
}

pub(super) fn booking_router_with_service(
    service: BookingService<InMemoryBookingStore, RecordingPublisher>,
) -> axum::Router {
    booking_router(Arc::new(service))
}

#[derive(Default)]
pub(super) struct RecordingPublisher {
    events: Mutex<Vec<BookingEvent>>,
}

impl RecordingPublisher {
    pub(super) fn events(&self) -> Vec<BookingEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: BookingEvent) -> Result<(), EventError> {
        self.events.lock().expect("event mutex poisoned").push(event);
        Ok(())
    }
}

pub(super) struct FailingPublisher;

impl EventPublisher for FailingPublisher {
    fn publish(&self, _event: BookingEvent) -> Result<(), EventError> {
        Err(EventError::Transport("notifier offline".to_string()))
    }
}

pub(super) struct UnavailableStore;

impl BookingRepository for UnavailableStore {
    fn insert(&self, _booking: Booking) -> Result<Booking, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _booking: Booking) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &BookingId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_by_listing(&self, _listing_id: &ListingId) -> Result<Vec<Booking>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_by_tenant(&self, _tenant_id: &TenantId) -> Result<Vec<Booking>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_by_landlord(
        &self,
        _landlord_id: &LandlordId,
    ) -> Result<Vec<Booking>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_active_for_listing(
        &self,
        _listing_id: &ListingId,
    ) -> Result<Vec<Booking>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store wrapper that stalls inserts so scope-timeout behavior is observable.
pub(super) struct SlowInsertStore {
    inner: InMemoryBookingStore,
    delay: Duration,
}

impl SlowInsertStore {
    pub(super) fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryBookingStore::default(),
            delay,
        }
    }
}

impl BookingRepository for SlowInsertStore {
    fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError> {
        std::thread::sleep(self.delay);
        self.inner.insert(booking)
    }

    fn update(&self, booking: Booking) -> Result<(), RepositoryError> {
        self.inner.update(booking)
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn remove(&self, id: &BookingId) -> Result<(), RepositoryError> {
        self.inner.remove(id)
    }

    fn list_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        self.inner.list_all()
    }

    fn list_by_listing(&self, listing_id: &ListingId) -> Result<Vec<Booking>, RepositoryError> {
        self.inner.list_by_listing(listing_id)
    }

    fn list_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<Booking>, RepositoryError> {
        self.inner.list_by_tenant(tenant_id)
    }

    fn list_by_landlord(&self, landlord_id: &LandlordId) -> Result<Vec<Booking>, RepositoryError> {
        self.inner.list_by_landlord(landlord_id)
    }

    fn list_active_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<Booking>, RepositoryError> {
        self.inner.list_active_for_listing(listing_id)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

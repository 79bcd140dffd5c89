use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{Booking, BookingId, LandlordId, ListingId, TenantId};
use super::repository::{BookingRepository, RepositoryError};

/// Hash-map backed booking store.
///
/// Source of truth for single-process deployments and the test suites.
/// Cancelled and rejected bookings stay in the map so historical lookups by
/// id keep working after the range is freed.
#[derive(Default, Clone)]
pub struct InMemoryBookingStore {
    records: Arc<Mutex<HashMap<BookingId, Booking>>>,
}

impl InMemoryBookingStore {
    fn collect<F>(&self, predicate: F) -> Result<Vec<Booking>, RepositoryError>
    where
        F: Fn(&Booking) -> bool,
    {
        let guard = self.records.lock().expect("booking store mutex poisoned");
        let mut matches: Vec<Booking> = guard.values().filter(|b| predicate(b)).cloned().collect();
        // Listing contract: created_at ascending, id as the tiebreak.
        matches.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matches)
    }
}

impl BookingRepository for InMemoryBookingStore {
    fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError> {
        let mut guard = self.records.lock().expect("booking store mutex poisoned");
        if guard.contains_key(&booking.id) {
            return Err(RepositoryError::DuplicateId);
        }
        guard.insert(booking.id, booking.clone());
        Ok(booking)
    }

    fn update(&self, booking: Booking) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("booking store mutex poisoned");
        if guard.contains_key(&booking.id) {
            guard.insert(booking.id, booking);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        let guard = self.records.lock().expect("booking store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &BookingId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("booking store mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        self.collect(|_| true)
    }

    fn list_by_listing(&self, listing_id: &ListingId) -> Result<Vec<Booking>, RepositoryError> {
        self.collect(|booking| booking.listing_id == *listing_id)
    }

    fn list_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<Booking>, RepositoryError> {
        self.collect(|booking| booking.tenant_id == *tenant_id)
    }

    fn list_by_landlord(&self, landlord_id: &LandlordId) -> Result<Vec<Booking>, RepositoryError> {
        self.collect(|booking| booking.landlord_id == *landlord_id)
    }

    fn list_active_for_listing(
        &self,
        listing_id: &ListingId,
    ) -> Result<Vec<Booking>, RepositoryError> {
        self.collect(|booking| booking.listing_id == *listing_id && booking.status.is_active())
    }
}

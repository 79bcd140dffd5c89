use std::sync::{Arc, Mutex};
use std::time::Duration;

use booking_service::bookings::{
    BookingConfig, BookingEvent, BookingRequest, BookingService, EventError, EventPublisher,
    InMemoryBookingStore, LandlordId, ListingId, OverlapPolicy, TenantId,
};
use booking_service::error::AppError;
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use uuid::Uuid;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// First check-in date of the demo stays (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
}

/// Collects events in memory so the demo can print the notifier's view.
#[derive(Default)]
struct CapturedEvents {
    events: Mutex<Vec<BookingEvent>>,
}

impl CapturedEvents {
    fn drain(&self) -> Vec<BookingEvent> {
        std::mem::take(&mut *self.events.lock().expect("event mutex poisoned"))
    }
}

impl EventPublisher for CapturedEvents {
    fn publish(&self, event: BookingEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
        Ok(())
    }
}

fn checkin(date: NaiveDate, offset_days: i64) -> DateTime<Utc> {
    let date = date + chrono::Duration::days(offset_days);
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).expect("valid time"))
}

fn stay(listing_id: ListingId, tenant: &str, date: NaiveDate, from: i64, to: i64) -> BookingRequest {
    BookingRequest {
        listing_id,
        tenant_id: TenantId(tenant.to_string()),
        landlord_id: LandlordId("landlord-demo".to_string()),
        start_date: checkin(date, from),
        end_date: checkin(date, to),
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let start_date = args
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());

    let store = Arc::new(InMemoryBookingStore::default());
    let events = Arc::new(CapturedEvents::default());
    let config = BookingConfig {
        scope_timeout: Duration::from_secs(2),
        overlap_policy: OverlapPolicy::BlockActive,
    };
    let service = BookingService::new(store, events.clone(), config);
    let listing_id = ListingId(Uuid::new_v4());

    println!("Booking lifecycle demo");
    println!("Listing: {listing_id}");

    let first = service
        .create(stay(listing_id, "tenant-avery", start_date, 0, 4))
        .await
        .expect("first booking is creatable");
    println!(
        "\nCreated {} for tenant-avery, {} (status {})",
        first.id, first.window, first.status
    );

    match service
        .create(stay(listing_id, "tenant-blake", start_date, 2, 6))
        .await
    {
        Err(err) => println!("Overlapping request refused: {err}"),
        Ok(booking) => println!("Unexpectedly created {}", booking.id),
    }

    let adjacent = service
        .create(stay(listing_id, "tenant-blake", start_date, 4, 9))
        .await
        .expect("adjacent booking is creatable");
    println!(
        "Adjacent request accepted: {} {} (half-open windows share boundaries)",
        adjacent.id, adjacent.window
    );

    let confirmed = service
        .confirm(&first.id)
        .await
        .expect("pending booking is confirmable");
    println!("\nConfirmed {} (status {})", confirmed.id, confirmed.status);

    match service.reject(&first.id).await {
        Err(err) => println!("Reject after confirm refused: {err}"),
        Ok(_) => println!("Unexpectedly rejected an accepted booking"),
    }

    let cancelled = service
        .cancel(&first.id)
        .await
        .expect("accepted booking is cancellable");
    println!("Cancelled {} (status {})", cancelled.id, cancelled.status);

    let rebooked = service
        .create(stay(listing_id, "tenant-casey", start_date, 0, 4))
        .await
        .expect("cancelled range is bookable again");
    println!(
        "Rebooked the freed range: {} for tenant-casey (status {})",
        rebooked.id, rebooked.status
    );

    println!("\nBookings on the listing");
    let bookings = service
        .list(&booking_service::bookings::BookingFilter::Listing(
            listing_id,
        ))
        .expect("listing is queryable");
    for booking in &bookings {
        println!(
            "- {} | {} | {} | {}",
            booking.id, booking.tenant_id, booking.window, booking.status
        );
    }

    println!("\nEvents delivered to the notifier");
    for event in events.drain() {
        println!(
            "- {} for {} at {}",
            event.event_type.label(),
            event.booking_id,
            event.timestamp.to_rfc3339()
        );
    }

    Ok(())
}

use booking_service::bookings::{BookingEvent, EventError, EventPublisher};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Publisher that surfaces lifecycle events through the log stream.
///
/// Stands in for the Pub/Sub transport in single-process deployments; the
/// topic label mirrors the configured destination so downstream wiring can
/// swap in a real transport without touching the service.
pub(crate) struct LogEventPublisher {
    topic: String,
}

impl LogEventPublisher {
    pub(crate) fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

impl EventPublisher for LogEventPublisher {
    fn publish(&self, event: BookingEvent) -> Result<(), EventError> {
        info!(
            topic = %self.topic,
            event_type = event.event_type.label(),
            booking_id = %event.booking_id,
            listing_id = %event.listing_id,
            tenant_id = %event.tenant_id,
            "booking event published"
        );
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

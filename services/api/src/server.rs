use crate::cli::ServeArgs;
use crate::infra::{AppState, LogEventPublisher};
use crate::routes::with_booking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use booking_service::bookings::{BookingService, InMemoryBookingStore};
use booking_service::config::AppConfig;
use booking_service::error::AppError;
use booking_service::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryBookingStore::default());
    let events = Arc::new(LogEventPublisher::new(config.events.topic.clone()));
    let service = Arc::new(BookingService::new(
        store,
        events,
        config.booking.booking_config(),
    ));

    let app = with_booking_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "booking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

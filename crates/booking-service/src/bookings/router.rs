use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;
use uuid::Uuid;

use super::domain::{BookingDatesPatch, BookingId, BookingRequest, LandlordId, ListingId, TenantId};
use super::repository::{BookingRepository, EventPublisher, RepositoryError};
use super::service::{BookingFilter, BookingService, BookingServiceError};

/// Router builder exposing the booking lifecycle over HTTP.
pub fn booking_router<R, E>(service: Arc<BookingService<R, E>>) -> Router
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/bookings",
            post(create_handler::<R, E>).get(list_handler::<R, E>),
        )
        .route(
            "/api/v1/bookings/:booking_id",
            get(get_handler::<R, E>)
                .patch(update_dates_handler::<R, E>)
                .delete(delete_handler::<R, E>),
        )
        .route(
            "/api/v1/bookings/:booking_id/confirm",
            put(confirm_handler::<R, E>),
        )
        .route(
            "/api/v1/bookings/:booking_id/reject",
            put(reject_handler::<R, E>),
        )
        .route(
            "/api/v1/bookings/:booking_id/cancel",
            put(cancel_handler::<R, E>),
        )
        .route(
            "/api/v1/listings/:listing_id/bookings",
            get(listing_bookings_handler::<R, E>),
        )
        .route(
            "/api/v1/tenants/:tenant_id/bookings",
            get(tenant_bookings_handler::<R, E>),
        )
        .route(
            "/api/v1/landlords/:landlord_id/bookings",
            get(landlord_bookings_handler::<R, E>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    axum::Json(request): axum::Json<BookingRequest>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    match service.create(request).await {
        Ok(booking) => (StatusCode::CREATED, axum::Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    list_response(&service, &BookingFilter::All)
}

pub(crate) async fn get_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    Path(booking_id): Path<Uuid>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    match service.get(&BookingId(booking_id)) {
        Ok(booking) => (StatusCode::OK, axum::Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_dates_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    Path(booking_id): Path<Uuid>,
    axum::Json(patch): axum::Json<BookingDatesPatch>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    match service.update_dates(&BookingId(booking_id), patch).await {
        Ok(booking) => (StatusCode::OK, axum::Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn confirm_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    Path(booking_id): Path<Uuid>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    match service.confirm(&BookingId(booking_id)).await {
        Ok(booking) => (StatusCode::OK, axum::Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    Path(booking_id): Path<Uuid>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    match service.reject(&BookingId(booking_id)).await {
        Ok(booking) => (StatusCode::OK, axum::Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cancel_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    Path(booking_id): Path<Uuid>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    match service.cancel(&BookingId(booking_id)).await {
        Ok(booking) => (StatusCode::OK, axum::Json(booking)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    Path(booking_id): Path<Uuid>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    match service.delete(&BookingId(booking_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn listing_bookings_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    Path(listing_id): Path<Uuid>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    list_response(&service, &BookingFilter::Listing(ListingId(listing_id)))
}

pub(crate) async fn tenant_bookings_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    Path(tenant_id): Path<String>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    list_response(&service, &BookingFilter::Tenant(TenantId(tenant_id)))
}

pub(crate) async fn landlord_bookings_handler<R, E>(
    State(service): State<Arc<BookingService<R, E>>>,
    Path(landlord_id): Path<String>,
) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    list_response(&service, &BookingFilter::Landlord(LandlordId(landlord_id)))
}

fn list_response<R, E>(service: &BookingService<R, E>, filter: &BookingFilter) -> Response
where
    R: BookingRepository + 'static,
    E: EventPublisher + 'static,
{
    match service.list(filter) {
        Ok(bookings) => (StatusCode::OK, axum::Json(bookings)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Map service failures onto the HTTP contract.
///
/// Conflicts carry the colliding booking's id and window so callers can
/// surface the competing reservation.
fn error_response(error: BookingServiceError) -> Response {
    let status = match &error {
        BookingServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BookingServiceError::Conflict { .. } | BookingServiceError::Transition(_) => {
            StatusCode::CONFLICT
        }
        BookingServiceError::Busy { .. } => StatusCode::SERVICE_UNAVAILABLE,
        BookingServiceError::Store(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        BookingServiceError::Store(RepositoryError::DuplicateId) => StatusCode::CONFLICT,
        BookingServiceError::Store(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = match &error {
        BookingServiceError::Conflict { booking_id, window } => json!({
            "error": error.to_string(),
            "conflicting_booking_id": booking_id,
            "conflicting_window": window,
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}

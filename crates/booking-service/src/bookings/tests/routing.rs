use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use super::common::*;
use crate::bookings::domain::BookingStatus;
use crate::bookings::service::BookingService;

fn post_json(uri: &str, body: &serde_json::Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("build request")
}

fn empty_request(
    method: axum::http::Method,
    uri: &str,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .expect("build request")
}

#[tokio::test]
async fn create_route_returns_created_booking() {
    let (service, _store, _events) = build_service();
    let router = booking_router_with_service(service);

    let body = serde_json::to_value(request(listing(), 1, 5)).expect("serialize request");
    let response = router
        .oneshot(post_json("/api/v1/bookings", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload.get("id").is_some());
    assert_eq!(payload.get("status"), Some(&json!("pending")));
}

#[tokio::test]
async fn create_route_reports_conflicts_with_the_colliding_booking() {
    let (service, _store, _events) = build_service();
    let listing_id = listing();
    let first = service
        .create(request(listing_id, 1, 5))
        .await
        .expect("first booking created");

    let router = booking_router_with_service(service);
    let body =
        serde_json::to_value(request_for_tenant(listing_id, "tenant-t2", 3, 7)).expect("serialize");
    let response = router
        .oneshot(post_json("/api/v1/bookings", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload
            .get("conflicting_booking_id")
            .and_then(serde_json::Value::as_str),
        Some(first.id.to_string().as_str())
    );
    assert!(payload.get("conflicting_window").is_some());
}

#[tokio::test]
async fn create_route_rejects_inverted_windows() {
    let (service, _store, _events) = build_service();
    let router = booking_router_with_service(service);

    let body = serde_json::to_value(request(listing(), 9, 2)).expect("serialize request");
    let response = router
        .oneshot(post_json("/api/v1/bookings", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_route_reports_missing_bookings() {
    let (service, _store, _events) = build_service();
    let router = booking_router_with_service(service);

    let response = router
        .oneshot(empty_request(
            axum::http::Method::GET,
            &format!("/api/v1/bookings/{}", Uuid::new_v4()),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn confirm_route_transitions_and_reject_maps_to_conflict_afterwards() {
    let (service, _store, _events) = build_service();
    let listing_id = listing();
    let booking = service
        .create(request(listing_id, 1, 5))
        .await
        .expect("booking created");

    let router = booking_router_with_service(service);

    let response = router
        .clone()
        .oneshot(empty_request(
            axum::http::Method::PUT,
            &format!("/api/v1/bookings/{}/confirm", booking.id),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("status"),
        Some(&json!(BookingStatus::Accepted.label()))
    );

    let response = router
        .oneshot(empty_request(
            axum::http::Method::PUT,
            &format!("/api/v1/bookings/{}/reject", booking.id),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancel_and_delete_routes_differ_in_queryability() {
    let (service, _store, _events) = build_service();
    let listing_id = listing();
    let cancelled = service
        .create(request_for_tenant(listing_id, "tenant-t1", 1, 5))
        .await
        .expect("first booking created");
    let deleted = service
        .create(request_for_tenant(listing_id, "tenant-t2", 6, 9))
        .await
        .expect("second booking created");

    let router = booking_router_with_service(service);

    let response = router
        .clone()
        .oneshot(empty_request(
            axum::http::Method::PUT,
            &format!("/api/v1/bookings/{}/cancel", cancelled.id),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(empty_request(
            axum::http::Method::DELETE,
            &format!("/api/v1/bookings/{}", deleted.id),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .clone()
        .oneshot(empty_request(
            axum::http::Method::GET,
            &format!("/api/v1/bookings/{}", cancelled.id),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(empty_request(
            axum::http::Method::GET,
            &format!("/api/v1/bookings/{}", deleted.id),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_route_patches_dates() {
    let (service, _store, _events) = build_service();
    let listing_id = listing();
    let booking = service
        .create(request(listing_id, 1, 5))
        .await
        .expect("booking created");

    let router = booking_router_with_service(service);
    let patch = json!({ "end_date": may(8) });
    let response = router
        .oneshot({
            axum::http::Request::patch(format!("/api/v1/bookings/{}", booking.id))
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&patch).expect("serialize patch"),
                ))
                .expect("build request")
        })
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("end_date"),
        Some(&serde_json::to_value(may(8)).expect("serialize date"))
    );
}

#[tokio::test]
async fn scoped_listing_routes_filter_results() {
    let (service, _store, _events) = build_service();
    let listing_a = listing();
    let listing_b = listing();
    service
        .create(request_for_tenant(listing_a, "tenant-t1", 1, 5))
        .await
        .expect("a1 created");
    service
        .create(request_for_tenant(listing_a, "tenant-t2", 5, 9))
        .await
        .expect("a2 created");
    service
        .create(request_for_tenant(listing_b, "tenant-t1", 1, 5))
        .await
        .expect("b1 created");

    let router = booking_router_with_service(service);

    let response = router
        .clone()
        .oneshot(empty_request(
            axum::http::Method::GET,
            &format!("/api/v1/listings/{listing_a}/bookings"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));

    let response = router
        .clone()
        .oneshot(empty_request(
            axum::http::Method::GET,
            "/api/v1/tenants/tenant-t1/bookings",
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(2));

    let response = router
        .oneshot(empty_request(
            axum::http::Method::GET,
            "/api/v1/landlords/landlord-l1/bookings",
        ))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn unavailable_store_maps_to_internal_error() {
    let service = BookingService::new(
        Arc::new(UnavailableStore),
        Arc::new(RecordingPublisher::default()),
        booking_config(),
    );
    let router = crate::bookings::router::booking_router(Arc::new(service));

    let body = serde_json::to_value(request(listing(), 1, 5)).expect("serialize request");
    let response = router
        .oneshot(post_json("/api/v1/bookings", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

//! In-process HTTP tests for the `/app` handler and the operational
//! endpoints. Timing-sensitive tests run on the paused tokio clock so the
//! simulated processing delay costs nothing.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;

use loadpulse_core::metrics::Labels;
use loadpulse_service::app_state::AppState;
use loadpulse_service::handler::RESPONSE_BODY;
use loadpulse_service::router::build_router;
use loadpulse_service::{config, status};

fn state_with(delay_ms: u64, histogram: bool, gauge: bool) -> AppState {
    let mut cfg = config::load_from_str("version: 1").unwrap();
    cfg.service.processing_delay_ms = delay_ms;
    cfg.service.record_histogram = histogram;
    cfg.service.track_in_flight = gauge;
    AppState::new(cfg)
}

fn req(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[test]
fn status_policy_table() {
    assert_eq!(status::resolve("200"), StatusCode::OK);
    assert_eq!(status::resolve("400"), StatusCode::BAD_REQUEST);
    assert_eq!(status::resolve("404"), StatusCode::NOT_FOUND);
    for unmapped in ["", "201", "500", "abc", "5xx", "999"] {
        assert_eq!(
            status::resolve(unmapped),
            StatusCode::INTERNAL_SERVER_ERROR,
            "input {unmapped:?}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn status_mapping_over_http() {
    let app = build_router(state_with(2000, true, true));
    let cases = [
        ("200", StatusCode::OK),
        ("400", StatusCode::BAD_REQUEST),
        ("404", StatusCode::NOT_FOUND),
        ("201", StatusCode::INTERNAL_SERVER_ERROR),
        ("500", StatusCode::INTERNAL_SERVER_ERROR),
        ("abc", StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (param, want) in cases {
        let res = app
            .clone()
            .oneshot(req(Method::GET, &format!("/app?status_code={param}")))
            .await
            .unwrap();
        assert_eq!(res.status(), want, "param {param:?}");
    }

    // No parameters at all still maps to 500.
    let res = app.clone().oneshot(req(Method::GET, "/app")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test(start_paused = true)]
async fn scenario_get_200_elon() {
    let state = state_with(2000, true, true);
    let app = build_router(state.clone());

    let res = app
        .oneshot(req(Method::GET, "/app?status_code=200&user=elon"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], RESPONSE_BODY.as_bytes());

    assert_eq!(state.metrics().requests(&Labels::new("GET", "200", "elon")), 1);
}

#[tokio::test(start_paused = true)]
async fn scenario_post_999_bill_keeps_label_verbatim() {
    let state = state_with(2000, true, true);
    let app = build_router(state.clone());

    let res = app
        .oneshot(req(Method::POST, "/app?status_code=999&user=bill"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // The unmapped value is preserved in the series key, not remapped to 500.
    assert_eq!(state.metrics().requests(&Labels::new("POST", "999", "bill")), 1);
    assert_eq!(state.metrics().requests(&Labels::new("POST", "500", "bill")), 0);
}

#[tokio::test(start_paused = true)]
async fn missing_params_become_empty_labels() {
    let state = state_with(2000, true, true);
    let app = build_router(state.clone());

    let res = app.oneshot(req(Method::PATCH, "/app")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(state.metrics().requests(&Labels::new("PATCH", "", "")), 1);
}

#[tokio::test(start_paused = true)]
async fn histogram_sample_covers_the_processing_delay() {
    let state = state_with(2000, true, true);
    let app = build_router(state.clone());
    let labels = Labels::new("GET", "200", "warren");

    let res = app
        .oneshot(req(Method::GET, "/app?status_code=200&user=warren"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(state.metrics().latency_count(&labels), 1);
    assert!(state.metrics().latency_sum_millis(&labels) >= 2000);
}

#[tokio::test(start_paused = true)]
async fn feature_flags_disable_gauge_and_histogram() {
    let state = state_with(100, false, false);
    let app = build_router(state.clone());
    let labels = Labels::new("GET", "200", "jeff");

    let res = app
        .oneshot(req(Method::GET, "/app?status_code=200&user=jeff"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The counter always fires; gauge and histogram stay untouched.
    assert_eq!(state.metrics().requests(&labels), 1);
    assert_eq!(state.metrics().in_flight(&labels), 0);
    assert_eq!(state.metrics().latency_count(&labels), 0);
}

#[tokio::test(start_paused = true)]
async fn gauge_rises_during_processing_and_returns_to_zero() {
    let state = state_with(2000, true, true);
    let app = build_router(state.clone());
    let labels = Labels::new("GET", "200", "elon");

    let call = tokio::spawn(app.oneshot(req(Method::GET, "/app?status_code=200&user=elon")));

    // Partway through the simulated delay the request is in flight.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(state.metrics().in_flight(&labels), 1);

    let res = call.await.unwrap().unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(state.metrics().in_flight(&labels), 0);
    assert_eq!(state.metrics().requests(&labels), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_invocations_leave_gauge_at_zero() {
    let state = state_with(2000, true, true);
    let app = build_router(state.clone());
    let labels = Labels::new("GET", "200", "bill");

    let mut calls = Vec::new();
    for _ in 0..3 {
        let app = app.clone();
        calls.push(tokio::spawn(async move {
            app.oneshot(req(Method::GET, "/app?status_code=200&user=bill"))
                .await
                .unwrap()
        }));
    }
    for c in calls {
        assert_eq!(c.await.unwrap().status(), StatusCode::OK);
    }

    assert_eq!(state.metrics().in_flight(&labels), 0);
    assert_eq!(state.metrics().requests(&labels), 3);
    assert_eq!(state.metrics().latency_count(&labels), 3);
}

#[tokio::test(start_paused = true)]
async fn metrics_scrapes_are_byte_identical_without_traffic() {
    let state = state_with(100, true, true);
    let app = build_router(state);

    let res = app
        .clone()
        .oneshot(req(Method::GET, "/app?status_code=200&user=elon"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res1 = app.clone().oneshot(req(Method::GET, "/metrics")).await.unwrap();
    assert_eq!(res1.status(), StatusCode::OK);
    assert_eq!(
        res1.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let body1 = to_bytes(res1.into_body(), usize::MAX).await.unwrap();

    let res2 = app.clone().oneshot(req(Method::GET, "/metrics")).await.unwrap();
    let body2 = to_bytes(res2.into_body(), usize::MAX).await.unwrap();

    assert_eq!(body1, body2);
    let text = String::from_utf8(body1.to_vec()).unwrap();
    assert!(text.contains(
        r#"loadpulse_http_requests_total{method="GET",status_code="200",user="elon"} 1"#
    ));
}

#[tokio::test]
async fn healthz_is_alive() {
    let app = build_router(state_with(0, true, true));
    let res = app.oneshot(req(Method::GET, "/healthz")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

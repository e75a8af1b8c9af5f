//! The `/app` request handler.
//!
//! Parses `status_code` and `user` from the query string, tracks the request
//! through the three instrument families, and sleeps the configured
//! processing delay to model backend latency. Every metric series is keyed by
//! the verbatim parameter values plus the request method; missing parameters
//! become empty-string labels. The handler never rejects a request.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tokio::time::Instant;

use crate::app_state::AppState;
use crate::status;

/// Fixed body, written for mapped and unmapped status codes alike.
pub const RESPONSE_BODY: &str = "Request is handled.";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppQuery {
    pub status_code: String,
    pub user: String,
}

pub async fn handle(
    State(state): State<AppState>,
    method: Method,
    Query(q): Query<AppQuery>,
) -> Response {
    let resolved = status::resolve(&q.status_code);
    let cfg = &state.cfg().service;
    let metrics = state.metrics();
    let method = method.as_str();

    if cfg.track_in_flight {
        metrics.adjust_in_flight(method, &q.status_code, &q.user, 1);
    }
    let started = Instant::now();

    tokio::time::sleep(Duration::from_millis(cfg.processing_delay_ms)).await;

    if cfg.track_in_flight {
        metrics.adjust_in_flight(method, &q.status_code, &q.user, -1);
    }
    metrics.inc_requests(method, &q.status_code, &q.user);
    if cfg.record_histogram {
        metrics.observe_latency(method, &q.status_code, &q.user, started.elapsed());
    }

    (resolved, RESPONSE_BODY).into_response()
}

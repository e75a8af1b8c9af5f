//! Axum router wiring.
//!
//! `/app` accepts the four simulated methods; `/metrics` and `/healthz` are
//! operational endpoints.

use axum::{routing::get, Router};

use crate::{app_state::AppState, handler, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/app",
            get(handler::handle)
                .post(handler::handle)
                .patch(handler::handle)
                .delete(handler::handle),
        )
        .route("/metrics", get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}

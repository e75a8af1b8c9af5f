//! Status mapping policy for the `/app` handler.
//!
//! The accepted set is an exact string match. Anything outside it (empty,
//! `"201"`, `"500"`, `"abc"`) resolves to the documented default of 500; this
//! is a visible contract, not incidental fallthrough. Label values elsewhere
//! always carry the raw parameter, so unmapped inputs stay visible in the
//! metrics.

use axum::http::StatusCode;

/// Inputs the handler maps onto themselves.
pub const ACCEPTED: &[(&str, StatusCode)] = &[
    ("200", StatusCode::OK),
    ("400", StatusCode::BAD_REQUEST),
    ("404", StatusCode::NOT_FOUND),
];

/// Everything else, including the simulator's own `"201"` and `"500"`.
pub const DEFAULT: StatusCode = StatusCode::INTERNAL_SERVER_ERROR;

/// Resolve the `status_code` query parameter to a response status.
pub fn resolve(param: &str) -> StatusCode {
    ACCEPTED
        .iter()
        .find(|(s, _)| *s == param)
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT)
}

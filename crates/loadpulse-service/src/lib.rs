//! loadpulse service library.
//!
//! Wires the config, router, request handler, operational endpoints, and the
//! traffic simulator into a runnable service. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod handler;
pub mod ops;
pub mod router;
pub mod sim;
pub mod status;

//! loadpulse core library.
//!
//! Holds the label-keyed metrics registry and the shared error type. The
//! service crate wires these into the HTTP surface; tests build fresh
//! registries directly.

pub mod error;
pub mod metrics;

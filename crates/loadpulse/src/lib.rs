//! Top-level facade crate for loadpulse.
//!
//! Re-exports the core registry and the service library so users can depend
//! on a single crate.

pub mod core {
    pub use loadpulse_core::*;
}

pub mod service {
    pub use loadpulse_service::*;
}

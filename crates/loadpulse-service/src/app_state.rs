//! Shared application state.
//!
//! The registry is constructed here and reaches the handler and exporter only
//! through this state; there are no global singletons, so tests get isolation
//! by building fresh states.

use std::sync::Arc;

use loadpulse_core::metrics::AppMetrics;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: Config,
    metrics: AppMetrics,
}

impl AppState {
    pub fn new(cfg: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics: AppMetrics::new(),
            }),
        }
    }

    pub fn cfg(&self) -> &Config {
        &self.inner.cfg
    }

    pub fn metrics(&self) -> &AppMetrics {
        &self.inner.metrics
    }
}

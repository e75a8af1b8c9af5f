//! Synthetic traffic generator.
//!
//! One background task alternating between two states, sleeping and issuing.
//! After a one-time startup delay it issues one request per interval with
//! (method, user, status_code) drawn independently from weighted pools.
//! Transport errors are logged and the loop moves on; only the shutdown
//! signal ends it.

mod issuer;
mod pool;

pub use issuer::{HttpIssuer, RequestIssuer, SimRequest};
pub use pool::WeightedPool;

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;

use loadpulse_core::error::Result;

use crate::config::SimulatorSection;

pub struct Simulator {
    methods: WeightedPool,
    users: WeightedPool,
    status_codes: WeightedPool,
    startup_delay: Duration,
    interval: Duration,
    issuer: Arc<dyn RequestIssuer>,
    rng: StdRng,
}

impl Simulator {
    /// Build from config with the production HTTP issuer and an OS-seeded RNG.
    pub fn from_config(cfg: &SimulatorSection) -> Result<Self> {
        let issuer = HttpIssuer::new(
            &cfg.target,
            Duration::from_millis(cfg.request_timeout_ms),
        )?;
        Self::with_issuer(cfg, Arc::new(issuer), StdRng::from_entropy())
    }

    /// Build with an injected issuer and RNG. Tests use a seed and a recorder
    /// for bounded deterministic runs.
    pub fn with_issuer(
        cfg: &SimulatorSection,
        issuer: Arc<dyn RequestIssuer>,
        rng: StdRng,
    ) -> Result<Self> {
        Ok(Self {
            methods: WeightedPool::from_entries(&cfg.methods)?,
            users: WeightedPool::from_entries(&cfg.users)?,
            status_codes: WeightedPool::from_entries(&cfg.status_codes)?,
            startup_delay: Duration::from_millis(cfg.startup_delay_ms),
            interval: Duration::from_millis(cfg.interval_ms),
            issuer,
            rng,
        })
    }

    fn draw(&mut self) -> SimRequest {
        SimRequest {
            method: self.methods.pick(&mut self.rng).to_string(),
            user: self.users.pick(&mut self.rng).to_string(),
            status_code: self.status_codes.pick(&mut self.rng).to_string(),
        }
    }

    /// Run until `shutdown` flips. There is no other exit; a failed request
    /// is simply followed by the next scheduled iteration.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        // Let the listener come up before the first request.
        tokio::select! {
            _ = tokio::time::sleep(self.startup_delay) => {}
            _ = shutdown.changed() => return,
        }

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => return,
            }

            let req = self.draw();
            tracing::info!(
                method = %req.method,
                user = %req.user,
                status_code = %req.status_code,
                "issuing simulated request"
            );

            if let Err(e) = self.issuer.issue(&req).await {
                tracing::warn!(error = %e, "simulated request failed");
            }
        }
    }
}

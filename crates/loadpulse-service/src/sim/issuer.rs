//! Outbound request issuing.

use std::time::Duration;

use async_trait::async_trait;

use loadpulse_core::error::{LoadPulseError, Result};

/// One synthesized request, drawn once per iteration and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimRequest {
    pub method: String,
    pub status_code: String,
    pub user: String,
}

/// Seam between the simulator loop and the transport. The production
/// implementation speaks HTTP; tests substitute a recorder.
#[async_trait]
pub trait RequestIssuer: Send + Sync {
    async fn issue(&self, req: &SimRequest) -> Result<()>;
}

/// reqwest-backed issuer with a fixed per-request timeout.
pub struct HttpIssuer {
    client: reqwest::Client,
    target: String,
}

impl HttpIssuer {
    pub fn new(target: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadPulseError::Transport(format!("client build failed: {e}")))?;
        Ok(Self {
            client,
            target: target.to_string(),
        })
    }
}

#[async_trait]
impl RequestIssuer for HttpIssuer {
    async fn issue(&self, req: &SimRequest) -> Result<()> {
        let method = reqwest::Method::from_bytes(req.method.as_bytes())
            .map_err(|e| LoadPulseError::Transport(format!("invalid method {}: {e}", req.method)))?;

        let res = self
            .client
            .request(method, &self.target)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(&[
                ("status_code", req.status_code.as_str()),
                ("user", req.user.as_str()),
            ])
            .send()
            .await
            .map_err(|e| LoadPulseError::Transport(format!("request failed: {e}")))?;

        // Drain the body fully so the connection can be reused.
        res.bytes()
            .await
            .map(|_| ())
            .map_err(|e| LoadPulseError::Transport(format!("body read failed: {e}")))
    }
}

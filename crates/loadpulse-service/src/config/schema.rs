use serde::Deserialize;

use loadpulse_core::error::{LoadPulseError, Result};

/// Methods the simulator may draw and the `/app` route accepts.
const KNOWN_METHODS: [&str; 4] = ["GET", "POST", "PATCH", "DELETE"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub version: u32,

    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub simulator: SimulatorSection,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LoadPulseError::Config("version must be 1".into()));
        }
        self.service.validate()?;
        self.simulator.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Simulated backend latency applied to every `/app` request.
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,

    #[serde(default = "default_true")]
    pub record_histogram: bool,

    #[serde(default = "default_true")]
    pub track_in_flight: bool,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            processing_delay_ms: default_processing_delay_ms(),
            record_histogram: true,
            track_in_flight: true,
        }
    }
}

impl ServiceSection {
    pub fn validate(&self) -> Result<()> {
        if self.processing_delay_ms > 60_000 {
            return Err(LoadPulseError::Config(
                "service.processing_delay_ms must be at most 60000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// One-time pause after startup so the listener is up before traffic.
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default = "default_methods")]
    pub methods: Vec<PoolEntry>,

    #[serde(default = "default_users")]
    pub users: Vec<PoolEntry>,

    #[serde(default = "default_status_codes")]
    pub status_codes: Vec<PoolEntry>,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        Self {
            enabled: true,
            startup_delay_ms: default_startup_delay_ms(),
            interval_ms: default_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            target: default_target(),
            methods: default_methods(),
            users: default_users(),
            status_codes: default_status_codes(),
        }
    }
}

impl SimulatorSection {
    pub fn validate(&self) -> Result<()> {
        if !(10..=600_000).contains(&self.interval_ms) {
            return Err(LoadPulseError::Config(
                "simulator.interval_ms must be between 10 and 600000".into(),
            ));
        }
        if !(100..=600_000).contains(&self.request_timeout_ms) {
            return Err(LoadPulseError::Config(
                "simulator.request_timeout_ms must be between 100 and 600000".into(),
            ));
        }
        validate_pool("simulator.methods", &self.methods)?;
        validate_pool("simulator.users", &self.users)?;
        validate_pool("simulator.status_codes", &self.status_codes)?;

        for e in &self.methods {
            if !KNOWN_METHODS.contains(&e.value.as_str()) {
                return Err(LoadPulseError::Config(format!(
                    "simulator.methods: unknown method {}",
                    e.value
                )));
            }
        }
        Ok(())
    }
}

fn validate_pool(name: &str, entries: &[PoolEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(LoadPulseError::Config(format!("{name} must not be empty")));
    }
    for e in entries {
        if e.weight == 0 {
            return Err(LoadPulseError::Config(format!(
                "{name}: entry {} has zero weight",
                e.value
            )));
        }
    }
    Ok(())
}

/// One candidate value with an integer draw weight.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolEntry {
    pub value: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

impl PoolEntry {
    pub fn new(value: &str, weight: u32) -> Self {
        Self {
            value: value.to_string(),
            weight,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_processing_delay_ms() -> u64 {
    2000
}
fn default_startup_delay_ms() -> u64 {
    2000
}
fn default_interval_ms() -> u64 {
    1000
}
fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_target() -> String {
    "http://127.0.0.1:8080/app".into()
}
fn default_true() -> bool {
    true
}
fn default_weight() -> u32 {
    1
}

// Reference traffic skew: heavy on GET and status 200.
fn default_methods() -> Vec<PoolEntry> {
    vec![
        PoolEntry::new("GET", 5),
        PoolEntry::new("POST", 3),
        PoolEntry::new("DELETE", 2),
        PoolEntry::new("PATCH", 1),
    ]
}

fn default_users() -> Vec<PoolEntry> {
    vec![
        PoolEntry::new("elon", 1),
        PoolEntry::new("warren", 1),
        PoolEntry::new("jeff", 1),
        PoolEntry::new("bill", 1),
    ]
}

fn default_status_codes() -> Vec<PoolEntry> {
    vec![
        PoolEntry::new("200", 4),
        PoolEntry::new("201", 2),
        PoolEntry::new("400", 1),
        PoolEntry::new("404", 1),
        PoolEntry::new("500", 1),
    ]
}

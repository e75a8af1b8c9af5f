//! Service config loader (strict parsing).

pub mod schema;

use std::fs;

use loadpulse_core::error::{LoadPulseError, Result};

pub use schema::{Config, PoolEntry, ServiceSection, SimulatorSection};

pub fn load_from_file(path: &str) -> Result<Config> {
    let s = fs::read_to_string(path)
        .map_err(|e| LoadPulseError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<Config> {
    let cfg: Config = serde_yaml::from_str(s)
        .map_err(|e| LoadPulseError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

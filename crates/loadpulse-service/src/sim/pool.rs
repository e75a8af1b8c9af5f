//! Weighted value pools for simulated traffic.

use rand::Rng;

use loadpulse_core::error::{LoadPulseError, Result};

use crate::config::PoolEntry;

/// Pool of candidate values with integer weights. A draw lands on a value
/// with probability weight / total.
#[derive(Debug, Clone)]
pub struct WeightedPool {
    entries: Vec<(String, u32)>,
    total: u32,
}

impl WeightedPool {
    pub fn from_entries(entries: &[PoolEntry]) -> Result<Self> {
        if entries.is_empty() {
            return Err(LoadPulseError::Config("pool must not be empty".into()));
        }
        let mut out = Vec::with_capacity(entries.len());
        let mut total: u32 = 0;
        for e in entries {
            if e.weight == 0 {
                return Err(LoadPulseError::Config(format!(
                    "pool entry {} has zero weight",
                    e.value
                )));
            }
            total = total.checked_add(e.weight).ok_or_else(|| {
                LoadPulseError::Config("pool weights overflow u32".into())
            })?;
            out.push((e.value.clone(), e.weight));
        }
        Ok(Self {
            entries: out,
            total,
        })
    }

    /// Draw one value.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &str {
        let mut roll = rng.gen_range(0..self.total);
        for (value, weight) in &self.entries {
            if roll < *weight {
                return value;
            }
            roll -= *weight;
        }
        // roll < total, so the walk always lands inside an entry
        &self.entries[self.entries.len() - 1].0
    }
}

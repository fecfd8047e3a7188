use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Multiplier applied to every tick's delta time (default: 1.0).
    pub time_scale: f32,
    /// Synthetic delta in milliseconds used by each drain tick (default: 100000).
    pub drain_step_ms: f32,
    /// Upper bound on drain ticks, guarding against process trees that keep
    /// re-enqueueing work (default: 10000).
    pub max_drain_ticks: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            drain_step_ms: 100_000.0,
            max_drain_ticks: 10_000,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_drain_step(mut self, drain_step_ms: f32) -> Self {
        self.drain_step_ms = drain_step_ms;
        self
    }

    pub fn with_max_drain_ticks(mut self, max_drain_ticks: u32) -> Self {
        self.max_drain_ticks = max_drain_ticks;
        self
    }

    /// Parse and validate a config from JSON. Missing fields use defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(MotionError::InvalidConfig(format!(
                "time_scale must be positive, got {}",
                self.time_scale
            )));
        }
        if !(self.drain_step_ms.is_finite() && self.drain_step_ms > 0.0) {
            return Err(MotionError::InvalidConfig(format!(
                "drain_step_ms must be positive, got {}",
                self.drain_step_ms
            )));
        }
        if self.max_drain_ticks == 0 {
            return Err(MotionError::InvalidConfig("max_drain_ticks must be at least 1".into()));
        }
        Ok(())
    }
}

//! Progress engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::progress::{EvictionConfig, DEFAULT_QUEUE_CAPACITY};

/// Subscriber queues, heartbeats, and eviction timing
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// Snapshots buffered per subscriber before the oldest are dropped
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Idle seconds before a keep-alive frame is sent
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,

    /// Seconds a finished, unwatched campaign is kept
    #[serde(default = "default_eviction_grace_secs")]
    pub eviction_grace_secs: u64,

    /// Seconds between eviction sweeps
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl ProgressConfig {
    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }

    pub fn eviction(&self) -> EvictionConfig {
        EvictionConfig::default()
            .with_grace(Duration::from_secs(self.eviction_grace_secs))
            .with_sweep_interval(Duration::from_secs(self.sweep_interval_secs))
    }

    /// Validate progress configuration
    ///
    /// A zero grace period is allowed and evicts on the next sweep.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if self.heartbeat_secs == 0 {
            return Err(ValidationError::ZeroInterval("heartbeat_secs"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::ZeroInterval("sweep_interval_secs"));
        }
        Ok(())
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            heartbeat_secs: default_heartbeat_secs(),
            eviction_grace_secs: default_eviction_grace_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_heartbeat_secs() -> u64 {
    15
}

fn default_eviction_grace_secs() -> u64 {
    30
}

fn default_sweep_interval_secs() -> u64 {
    5
}

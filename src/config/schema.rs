//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the agent.
//! All types derive Serde traits so a resolved configuration can be logged
//! or dumped as a whole.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Default sampling window for the CPU idle figure.
pub const DEFAULT_SAMPLE_WINDOW_MS: u64 = 100;

/// Root configuration for the agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Report channel (state + idle figure, polled by the load balancer).
    pub report: ChannelConfig,

    /// Control channel (operator sets the state).
    pub control: ChannelConfig,

    /// CPU sampler settings.
    pub sampler: SamplerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listen settings for one channel.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Bind address (e.g., "0.0.0.0:5555").
    pub bind_address: String,
}

impl ChannelConfig {
    pub fn new(bind_address: impl Into<String>) -> Self {
        Self {
            bind_address: bind_address.into(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new("127.0.0.1:0")
    }
}

/// CPU sampler settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Time between the two CPU snapshots (milliseconds).
    pub window_ms: u64,
}

impl SamplerConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_SAMPLE_WINDOW_MS,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Prometheus scrape address; `None` disables the exporter.
    pub metrics_address: Option<SocketAddr>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "agent_check=info".to_string(),
            metrics_address: None,
        }
    }
}

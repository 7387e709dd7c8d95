//! Shared utilities for integration tests.

use std::sync::Arc;

use agent_check::config::{AgentConfig, ChannelConfig};
use agent_check::health::IdleSampler;
use agent_check::lifecycle::{self, RunningAgent, Shutdown};
use agent_check::state::{SharedState, StateStore};

/// Sampler that always reports the same figure.
pub struct FixedIdle(pub u8);

impl IdleSampler for FixedIdle {
    async fn sample_idle_percent(&self) -> u8 {
        self.0
    }
}

/// Config binding both channels to ephemeral loopback ports.
pub fn loopback_config() -> AgentConfig {
    AgentConfig {
        report: ChannelConfig::new("127.0.0.1:0"),
        control: ChannelConfig::new("127.0.0.1:0"),
        ..AgentConfig::default()
    }
}

/// Start an agent with a fresh store and a fixed idle figure.
pub async fn start_agent(idle: u8) -> (RunningAgent, Arc<SharedState>, Shutdown) {
    let shutdown = Shutdown::new();
    let store = Arc::new(SharedState::new());
    let agent = lifecycle::start_with(
        &loopback_config(),
        Arc::clone(&store) as Arc<dyn StateStore>,
        Arc::new(FixedIdle(idle)),
        &shutdown,
    )
    .await
    .unwrap();
    (agent, store, shutdown)
}

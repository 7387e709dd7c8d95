//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the report listener, then the control listener
//! - Build the state store and sampler and hand them to the server
//! - Start serving in the background
//!
//! # Design Decisions
//! - Fail fast: a bind failure is fatal and nothing is left running
//! - The caller keeps the `Shutdown` and decides when to stop

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::AgentConfig;
use crate::health::{IdleSampler, SystemIdleSampler};
use crate::lifecycle::Shutdown;
use crate::net::{Channel, Listener, ListenerError};
use crate::server::{AgentServer, ServerExit};
use crate::state::{SharedState, StateStore};

/// A started agent.
#[derive(Debug)]
pub struct RunningAgent {
    pub report_addr: SocketAddr,
    pub control_addr: SocketAddr,
    handle: JoinHandle<ServerExit>,
}

impl RunningAgent {
    /// Wait for both accept loops to end.
    pub async fn join(self) -> Result<ServerExit, tokio::task::JoinError> {
        self.handle.await
    }
}

/// Start the agent with the production store and sampler.
pub async fn start(config: &AgentConfig, shutdown: &Shutdown) -> Result<RunningAgent, ListenerError> {
    let sampler = SystemIdleSampler::from_config(&config.sampler);
    start_with(config, Arc::new(SharedState::new()), Arc::new(sampler), shutdown).await
}

/// Start the agent with an injected store and sampler.
pub async fn start_with<S: IdleSampler>(
    config: &AgentConfig,
    store: Arc<dyn StateStore>,
    sampler: Arc<S>,
    shutdown: &Shutdown,
) -> Result<RunningAgent, ListenerError> {
    let report = Listener::bind(Channel::Report, &config.report).await?;
    let control = Listener::bind(Channel::Control, &config.control).await?;

    let report_addr = report.local_addr().map_err(|source| ListenerError::Bind {
        channel: Channel::Report,
        address: config.report.bind_address.clone(),
        source,
    })?;
    let control_addr = control.local_addr().map_err(|source| ListenerError::Bind {
        channel: Channel::Control,
        address: config.control.bind_address.clone(),
        source,
    })?;

    let server = AgentServer::new(store, sampler);
    let handle = tokio::spawn(server.run(report, control, shutdown.subscribe()));

    tracing::info!(
        report = %report_addr,
        control = %control_addr,
        initial_state = %crate::state::OperationalState::default(),
        "Agent started"
    );

    Ok(RunningAgent {
        report_addr,
        control_addr,
        handle,
    })
}

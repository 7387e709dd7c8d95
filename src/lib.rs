//! Load balancer agent-check sidecar library.

pub mod client;
pub mod config;
pub mod handlers;
pub mod health;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod server;
pub mod state;

pub use config::AgentConfig;
pub use lifecycle::Shutdown;
pub use server::AgentServer;
pub use state::{OperationalState, SharedState, StateStore};

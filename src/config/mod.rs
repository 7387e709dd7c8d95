//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (AC_LISTEN_PORT, AC_TALK_PORT, AC_METRICS_ADDR)
//!     → loader.rs (read & require)
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - A missing required variable is fatal before anything is bound
//! - All fields have defaults so tests can build configs directly

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_from, load_from_env, ConfigError};
pub use schema::AgentConfig;
pub use schema::ChannelConfig;
pub use schema::ObservabilityConfig;
pub use schema::SamplerConfig;

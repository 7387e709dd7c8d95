//! Operational state subsystem.
//!
//! # Data Flow
//! ```text
//! Control channel line
//!     → OperationalState::from_str (case-insensitive vocabulary lookup)
//!     → StateStore::set (exclusive write)
//!
//! Report channel
//!     → StateStore::get (shared read)
//! ```
//!
//! # States
//! `UP` (initial), `READY`, `DRAIN`, `MAINT`, `DOWN`, `FAILED`, `STOPPED`.
//! Any state may follow any other; only a successful `set` moves the machine.
//!
//! # Design Decisions
//! - The state is a `Copy` enum, so readers can never see a partial value
//! - The store is a trait so handlers can be exercised against fakes
//! - No history: only the current value exists, nothing is persisted

pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use store::{SetOutcome, SharedState, StateStore};

/// Operational state reported to the load balancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationalState {
    /// Ready to receive traffic.
    Ready,
    /// Finish current sessions, take no new ones.
    Drain,
    /// Out of rotation for maintenance.
    Maint,
    /// Marked down.
    Down,
    /// Marked failed.
    Failed,
    /// Marked stopped.
    Stopped,
    /// Up; the state on process start.
    #[default]
    Up,
}

impl OperationalState {
    /// Every member of the vocabulary.
    pub const ALL: [OperationalState; 7] = [
        OperationalState::Ready,
        OperationalState::Drain,
        OperationalState::Maint,
        OperationalState::Down,
        OperationalState::Failed,
        OperationalState::Stopped,
        OperationalState::Up,
    ];

    /// Canonical wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationalState::Ready => "READY",
            OperationalState::Drain => "DRAIN",
            OperationalState::Maint => "MAINT",
            OperationalState::Down => "DOWN",
            OperationalState::Failed => "FAILED",
            OperationalState::Stopped => "STOPPED",
            OperationalState::Up => "UP",
        }
    }
}

impl fmt::Display for OperationalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate text outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operational state: {0:?}")]
pub struct UnknownState(pub String);

impl FromStr for OperationalState {
    type Err = UnknownState;

    fn from_str(candidate: &str) -> Result<Self, Self::Err> {
        let normalized = candidate.to_uppercase();
        OperationalState::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| UnknownState(candidate.to_string()))
    }
}

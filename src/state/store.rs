//! Concurrent operational state store.
//!
//! # Responsibilities
//! - Hold the single current operational state
//! - Validate and apply candidate state names
//! - Serialize writers against each other and against readers

use std::fmt;
use std::sync::{PoisonError, RwLock};

use super::OperationalState;
use crate::observability::metrics;

/// Result of a `set` attempt, rendered as the control channel reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The candidate matched and is now current.
    Applied(OperationalState),
    /// The candidate was not in the vocabulary; state unchanged.
    Rejected,
}

impl SetOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SetOutcome::Applied(_))
    }
}

impl fmt::Display for SetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOutcome::Applied(state) => write!(f, "{} OK", state),
            SetOutcome::Rejected => f.write_str("NOT SET"),
        }
    }
}

/// Shared operational state, injected into both channel handlers.
pub trait StateStore: Send + Sync {
    /// Apply `candidate` if it names a state (case-insensitive).
    fn set(&self, candidate: &str) -> SetOutcome;

    /// Current canonical state.
    fn get(&self) -> OperationalState;
}

/// Production store behind a reader/writer lock.
///
/// Concurrent `get`s share the lock; each `set` takes it exclusively, so the
/// last writer to acquire it wins.
#[derive(Debug, Default)]
pub struct SharedState {
    current: RwLock<OperationalState>,
}

impl SharedState {
    /// Create a store holding the initial state (`UP`).
    pub fn new() -> Self {
        Self::with_initial(OperationalState::default())
    }

    pub fn with_initial(state: OperationalState) -> Self {
        metrics::record_current_state(state);
        Self {
            current: RwLock::new(state),
        }
    }
}

impl StateStore for SharedState {
    fn set(&self, candidate: &str) -> SetOutcome {
        let Ok(state) = candidate.parse::<OperationalState>() else {
            return SetOutcome::Rejected;
        };

        // A poisoned lock still guards a whole `Copy` value.
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = state;
        // Published under the write lock so the gauge follows write order.
        metrics::record_current_state(state);

        SetOutcome::Applied(state)
    }

    fn get(&self) -> OperationalState {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn outcome_wire_text() {
        assert_eq!(SetOutcome::Applied(OperationalState::Drain).to_string(), "DRAIN OK");
        assert_eq!(SetOutcome::Rejected.to_string(), "NOT SET");
    }

    #[test]
    fn starts_up() {
        assert_eq!(SharedState::new().get(), OperationalState::Up);
    }

    #[test]
    fn set_then_get_returns_canonical_form() {
        let store = SharedState::new();
        assert_eq!(store.set("maint"), SetOutcome::Applied(OperationalState::Maint));
        assert_eq!(store.get(), OperationalState::Maint);

        assert_eq!(store.set("Ready"), SetOutcome::Applied(OperationalState::Ready));
        assert_eq!(store.get(), OperationalState::Ready);
    }

    #[test]
    fn rejected_set_leaves_state_unchanged() {
        let store = SharedState::with_initial(OperationalState::Down);
        assert_eq!(store.set("bogus"), SetOutcome::Rejected);
        assert_eq!(store.set(""), SetOutcome::Rejected);
        assert_eq!(store.get(), OperationalState::Down);
    }

    #[test]
    fn setting_current_state_again_is_applied() {
        let store = SharedState::new();
        assert_eq!(store.set("up"), SetOutcome::Applied(OperationalState::Up));
        assert_eq!(store.get(), OperationalState::Up);
    }

    #[test]
    fn concurrent_writers_leave_one_valid_state() {
        let store = Arc::new(SharedState::new());
        let candidates = ["ready", "drain", "maint", "down", "failed", "stopped"];

        let writers: Vec<_> = candidates
            .into_iter()
            .map(|candidate| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        assert!(store.set(candidate).is_applied());
                    }
                })
            })
            .collect();

        let reader = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..1_000 {
                    assert!(OperationalState::ALL.contains(&store.get()));
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        reader.join().unwrap();

        let last = store.get();
        assert!(candidates.iter().any(|c| c.parse::<OperationalState>() == Ok(last)));
    }
}

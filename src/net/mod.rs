//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, one task per connection)
//!     → connection.rs (connection ID, open-connection tracking)
//!     → Hand off to the channel's handler
//! ```
//!
//! # Design Decisions
//! - Each channel has its own listener and loop; one failing leaves the other running
//! - An accept error ends that channel's loop instead of retrying
//! - No connection limit and no timeouts

pub mod connection;
pub mod listener;

use std::fmt;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker};
pub use listener::{Listener, ListenerError};

/// The two agent endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Load balancer polls state and idle figure.
    Report,
    /// Operator pushes a new state.
    Control,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Report => "report",
            Channel::Control => "control",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Connection identity and lifecycle tracking.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Count open connections per channel
//! - Publish connection metrics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::Channel;
use crate::observability::metrics;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is enough: only uniqueness matters.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Tracks open connections on one channel.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    channel: Channel,
    active_count: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            active_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record a new open connection. Returns a guard that decrements on drop.
    pub fn track(&self) -> ConnectionGuard {
        self.active_count.fetch_add(1, Ordering::SeqCst);
        metrics::record_connection_opened(self.channel);
        ConnectionGuard {
            channel: self.channel,
            active_count: Arc::clone(&self.active_count),
            id: ConnectionId::new(),
        }
    }

    /// Get current open connection count.
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

/// Guard that tracks a connection's lifetime.
/// Decrements the open count when dropped, including when the handler task panics.
#[derive(Debug)]
pub struct ConnectionGuard {
    channel: Channel,
    active_count: Arc<AtomicU64>,
    id: ConnectionId,
}

impl ConnectionGuard {
    /// Get this connection's ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
        metrics::record_connection_closed(self.channel);
        tracing::trace!(channel = %self.channel, connection_id = %self.id, "Connection closed");
    }
}

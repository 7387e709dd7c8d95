//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define agent metrics (connections, state changes, idle figure)
//! - Expose Prometheus-compatible metrics endpoint when configured
//!
//! # Metrics
//! - `agent_check_connections_total` (counter): accepted connections by channel
//! - `agent_check_active_connections` (gauge): open connections by channel
//! - `agent_check_state_changes_total` (counter): control requests by result
//! - `agent_check_state` (gauge): 1 for the current state, 0 for the others
//! - `agent_check_idle_percent` (gauge): last reported CPU idle figure
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - Labels are static strings only

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::net::Channel;
use crate::state::{OperationalState, SetOutcome};

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_connection_opened(channel: Channel) {
    ::metrics::counter!("agent_check_connections_total", "channel" => channel.as_str()).increment(1);
    ::metrics::gauge!("agent_check_active_connections", "channel" => channel.as_str()).increment(1.0);
}

pub fn record_connection_closed(channel: Channel) {
    ::metrics::gauge!("agent_check_active_connections", "channel" => channel.as_str()).decrement(1.0);
}

pub fn record_state_change(outcome: SetOutcome) {
    let result = if outcome.is_applied() { "ok" } else { "rejected" };
    ::metrics::counter!("agent_check_state_changes_total", "result" => result).increment(1);
}

/// Publish `current` as the one active state.
pub fn record_current_state(current: OperationalState) {
    for state in OperationalState::ALL {
        let value = if state == current { 1.0 } else { 0.0 };
        ::metrics::gauge!("agent_check_state", "state" => state.as_str()).set(value);
    }
}

pub fn record_idle_percent(idle: u8) {
    ::metrics::gauge!("agent_check_idle_percent").set(f64::from(idle));
}

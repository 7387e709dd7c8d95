//! Configuration loading from the process environment.

use crate::config::schema::{AgentConfig, ChannelConfig};
use crate::config::validation::{validate_port, validate_socket_addr, ValidationError};

/// Port of the report channel (bound on all interfaces).
pub const LISTEN_PORT_VAR: &str = "AC_LISTEN_PORT";
/// Port of the control channel (bound on localhost).
pub const TALK_PORT_VAR: &str = "AC_TALK_PORT";
/// Optional Prometheus scrape address.
pub const METRICS_ADDR_VAR: &str = "AC_METRICS_ADDR";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{} not set", .0.replace('_', " "))]
    Missing(&'static str),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Load configuration from the process environment.
pub fn load_from_env() -> Result<AgentConfig, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_from<F>(lookup: F) -> Result<AgentConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |var: &'static str| {
        lookup(var)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(var))
    };

    let listen_port = validate_port(LISTEN_PORT_VAR, &required(LISTEN_PORT_VAR)?)?;
    let talk_port = validate_port(TALK_PORT_VAR, &required(TALK_PORT_VAR)?)?;

    let mut config = AgentConfig {
        report: ChannelConfig::new(format!("0.0.0.0:{}", listen_port)),
        control: ChannelConfig::new(format!("localhost:{}", talk_port)),
        ..AgentConfig::default()
    };

    if let Some(addr) = lookup(METRICS_ADDR_VAR).filter(|value| !value.is_empty()) {
        config.observability.metrics_address = Some(validate_socket_addr(METRICS_ADDR_VAR, &addr)?);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn binds_report_publicly_and_control_locally() {
        let config = load_from(env(&[("AC_LISTEN_PORT", "5555"), ("AC_TALK_PORT", "5556")])).unwrap();
        assert_eq!(config.report.bind_address, "0.0.0.0:5555");
        assert_eq!(config.control.bind_address, "localhost:5556");
        assert_eq!(config.sampler.window_ms, 100);
        assert!(config.observability.metrics_address.is_none());
    }

    #[test]
    fn missing_listen_port_is_reported_first() {
        let err = load_from(env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AC_LISTEN_PORT")));
        assert_eq!(err.to_string(), "AC LISTEN PORT not set");
    }

    #[test]
    fn missing_talk_port() {
        let err = load_from(env(&[("AC_LISTEN_PORT", "5555")])).unwrap_err();
        assert_eq!(err.to_string(), "AC TALK PORT not set");
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = load_from(env(&[("AC_LISTEN_PORT", ""), ("AC_TALK_PORT", "5556")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AC_LISTEN_PORT")));
    }

    #[test]
    fn invalid_port_rejected() {
        let err = load_from(env(&[("AC_LISTEN_PORT", "abc"), ("AC_TALK_PORT", "5556")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ValidationError::InvalidPort { .. })));
    }

    #[test]
    fn metrics_address_is_optional_but_validated() {
        let config = load_from(env(&[
            ("AC_LISTEN_PORT", "5555"),
            ("AC_TALK_PORT", "5556"),
            ("AC_METRICS_ADDR", "127.0.0.1:9100"),
        ]))
        .unwrap();
        assert_eq!(config.observability.metrics_address, Some("127.0.0.1:9100".parse().unwrap()));

        let err = load_from(env(&[
            ("AC_LISTEN_PORT", "5555"),
            ("AC_TALK_PORT", "5556"),
            ("AC_METRICS_ADDR", "nowhere"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ValidationError::InvalidAddress { .. })));
    }
}

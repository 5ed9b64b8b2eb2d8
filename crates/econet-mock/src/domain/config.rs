//! Simulator configuration.
//!
//! [`SimulatorConfig`] is the single source of truth for runtime settings.
//! `main.rs` builds it from defaults, an optional TOML file and CLI
//! arguments (in increasing order of precedence); tests build it directly.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// A configuration value that would make the simulator misbehave.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidConfig {
    /// A timer period of zero would spin the emission loop.
    #[error("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },

    /// The upgrade path must be absolute, like `/ws`.
    #[error("WebSocket path '{0}' must start with '/'")]
    RelativePath(String),

    /// A zero-capacity outbound queue cannot hold even one message.
    #[error("outbound queue capacity must be at least 1")]
    EmptyQueue,
}

/// All runtime configuration for the simulator.
///
/// # Example
///
/// ```rust
/// use econet_mock::domain::SimulatorConfig;
///
/// let cfg = SimulatorConfig::default();
/// assert_eq!(cfg.ws_path, "/ws");
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Address and port the WebSocket listener binds to.
    pub bind_addr: SocketAddr,

    /// The only request path upgraded to a WebSocket; all others get a 404.
    pub ws_path: String,

    /// Period of the `stats_stream` push.
    pub telemetry_interval: Duration,

    /// Period of the synthetic `log` push.
    pub log_interval: Duration,

    /// Per-connection queue between the emitters and the socket writer.
    pub outbound_queue: usize,
}

impl SimulatorConfig {
    /// Checks the values that would otherwise panic or stall at runtime.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvalidConfig`] found.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.telemetry_interval.is_zero() {
            return Err(InvalidConfig::ZeroInterval {
                name: "telemetry interval",
            });
        }
        if self.log_interval.is_zero() {
            return Err(InvalidConfig::ZeroInterval {
                name: "log interval",
            });
        }
        if !self.ws_path.starts_with('/') {
            return Err(InvalidConfig::RelativePath(self.ws_path.clone()));
        }
        if self.outbound_queue == 0 {
            return Err(InvalidConfig::EmptyQueue);
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    /// | Field              | Default           |
    /// |--------------------|-------------------|
    /// | bind_addr          | `127.0.0.1:8080`  |
    /// | ws_path            | `/ws`             |
    /// | telemetry_interval | 1 second          |
    /// | log_interval       | 3 seconds         |
    /// | outbound_queue     | 64                |
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            ws_path: "/ws".to_string(),
            telemetry_interval: Duration::from_secs(1),
            log_interval: Duration::from_secs(3),
            outbound_queue: 64,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_is_8080() {
        let cfg = SimulatorConfig::default();
        assert_eq!(cfg.bind_addr.port(), 8080);
    }

    #[test]
    fn test_default_binds_loopback_only() {
        let cfg = SimulatorConfig::default();
        assert!(cfg.bind_addr.ip().is_loopback());
    }

    #[test]
    fn test_default_intervals_match_device_cadence() {
        let cfg = SimulatorConfig::default();
        assert_eq!(cfg.telemetry_interval, Duration::from_secs(1));
        assert_eq!(cfg.log_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimulatorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_telemetry_interval_is_rejected() {
        // Arrange
        let cfg = SimulatorConfig {
            telemetry_interval: Duration::ZERO,
            ..SimulatorConfig::default()
        };

        // Act
        let result = cfg.validate();

        // Assert
        assert_eq!(
            result,
            Err(InvalidConfig::ZeroInterval {
                name: "telemetry interval"
            })
        );
    }

    #[test]
    fn test_zero_log_interval_is_rejected() {
        let cfg = SimulatorConfig {
            log_interval: Duration::ZERO,
            ..SimulatorConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(InvalidConfig::ZeroInterval { name: "log interval" })
        ));
    }

    #[test]
    fn test_relative_path_is_rejected() {
        let cfg = SimulatorConfig {
            ws_path: "ws".to_string(),
            ..SimulatorConfig::default()
        };
        assert_eq!(cfg.validate(), Err(InvalidConfig::RelativePath("ws".to_string())));
    }

    #[test]
    fn test_empty_queue_is_rejected() {
        let cfg = SimulatorConfig {
            outbound_queue: 0,
            ..SimulatorConfig::default()
        };
        assert_eq!(cfg.validate(), Err(InvalidConfig::EmptyQueue));
    }
}

//! Optional TOML configuration file for the simulator.
//!
//! Every key is optional; a missing key leaves the built-in default (or the
//! value set by an earlier layer) untouched.  Command-line flags are applied
//! after the file, so they always win.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 8080
//! path = "/ws"
//!
//! [simulation]
//! telemetry_interval_ms = 1000
//! log_interval_ms = 3000
//! outbound_queue = 64
//! ```

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::SimulatorConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk schema.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub simulation: SimulationSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub bind: Option<IpAddr>,
    pub port: Option<u16>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    pub telemetry_interval_ms: Option<u64>,
    pub log_interval_ms: Option<u64>,
    pub outbound_queue: Option<usize>,
}

impl FileConfig {
    /// Reads and parses `path`.
    ///
    /// Values are not range-checked here; the merged [`SimulatorConfig`] is
    /// validated once every layer has been applied.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`]
    /// if it is not valid TOML for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parses TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Overlays every key present in the file onto `config`.
    pub fn apply_to(&self, config: &mut SimulatorConfig) {
        if let Some(ip) = self.server.bind {
            config.bind_addr.set_ip(ip);
        }
        if let Some(port) = self.server.port {
            config.bind_addr.set_port(port);
        }
        if let Some(path) = &self.server.path {
            config.ws_path = path.clone();
        }
        if let Some(ms) = self.simulation.telemetry_interval_ms {
            config.telemetry_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.simulation.log_interval_ms {
            config.log_interval = Duration::from_millis(ms);
        }
        if let Some(n) = self.simulation.outbound_queue {
            config.outbound_queue = n;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, SocketAddr};

    #[test]
    fn test_empty_file_changes_nothing() {
        // Arrange
        let file = FileConfig::parse("").unwrap();
        let mut cfg = SimulatorConfig::default();

        // Act
        file.apply_to(&mut cfg);

        // Assert
        assert_eq!(cfg, SimulatorConfig::default());
    }

    #[test]
    fn test_full_file_overrides_every_field() {
        let file = FileConfig::parse(
            r#"
            [server]
            bind = "0.0.0.0"
            port = 9000
            path = "/device"

            [simulation]
            telemetry_interval_ms = 250
            log_interval_ms = 500
            outbound_queue = 8
            "#,
        )
        .unwrap();
        let mut cfg = SimulatorConfig::default();

        file.apply_to(&mut cfg);

        assert_eq!(cfg.bind_addr, SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9000)));
        assert_eq!(cfg.ws_path, "/device");
        assert_eq!(cfg.telemetry_interval, Duration::from_millis(250));
        assert_eq!(cfg.log_interval, Duration::from_millis(500));
        assert_eq!(cfg.outbound_queue, 8);
    }

    #[test]
    fn test_port_only_keeps_default_bind_address() {
        let file = FileConfig::parse("[server]\nport = 8181\n").unwrap();
        let mut cfg = SimulatorConfig::default();

        file.apply_to(&mut cfg);

        assert!(cfg.bind_addr.ip().is_loopback());
        assert_eq!(cfg.bind_addr.port(), 8181);
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let err = FileConfig::parse("[server]\nprot = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_bad_ip_is_a_parse_error() {
        let err = FileConfig::parse("[server]\nbind = \"localhost-ish\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_out_of_range_values_parse_and_fail_validation_after_merge() {
        // Arrange: a later layer may still override these, so parsing accepts them
        let file = FileConfig::parse("[simulation]\ntelemetry_interval_ms = 0\n").unwrap();
        let mut cfg = SimulatorConfig::default();

        // Act
        file.apply_to(&mut cfg);

        // Assert
        assert!(matches!(
            cfg.validate(),
            Err(crate::domain::InvalidConfig::ZeroInterval { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error_with_path() {
        let path = std::env::temp_dir().join(format!("econet-mock-{}.toml", uuid::Uuid::new_v4()));

        let err = FileConfig::load(&path).unwrap_err();

        match err {
            ConfigError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("econet-mock-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[simulation]\nlog_interval_ms = 42\n").unwrap();

        let file = FileConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(file.simulation.log_interval_ms, Some(42));
    }
}

//! Settings resources the dashboard can fetch (`get_*`) and propose (`save_*`).
//!
//! Field names follow the dashboard's JSON exactly, including its mix of
//! `snake_case` (station rows) and `camelCase` (station lists, clock fields).

use serde::{Deserialize, Serialize};

/// Wi-Fi station (client mode) credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiSettings {
    pub ssid: String,
    /// Always reported empty by `get_wifi`; only meaningful in `save_wifi`.
    #[serde(default)]
    pub password: String,
}

/// Wi-Fi access-point settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiApSettings {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// A station on the local Econet bus that the bridge exposes over AUN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconetStation {
    /// Econet station number (1–254).
    pub station_id: u8,
    /// Local UDP port the bridge listens on for this station.
    pub udp_port: u16,
}

/// A remote AUN host that appears as a station on the local Econet bus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AunStation {
    /// Econet station number the remote host is mapped to.
    pub station_id: u8,
    /// IP address (or hostname) of the remote AUN host.
    pub remote_ip: String,
    /// UDP port on the remote host.
    pub udp_port: u16,
}

/// The Econet station tables: local stations and bridged remote stations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconetSettings {
    #[serde(
        rename = "econetStations",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub econet_stations: Option<Vec<EconetStation>>,
    #[serde(rename = "aunStations", default, skip_serializing_if = "Option::is_none")]
    pub aun_stations: Option<Vec<AunStation>>,
}

/// Where the Econet bus clock comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockMode {
    /// The bridge generates the clock itself.
    Internal,
    /// An external clock box drives the bus.
    External,
}

/// Econet bus clock configuration.
///
/// The frequency and duty cycle only apply in [`ClockMode::Internal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconetClockSettings {
    pub mode: ClockMode,
    #[serde(
        rename = "internalFrequencyHz",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub internal_frequency_hz: Option<u32>,
    /// Duty cycle in percent.
    #[serde(
        rename = "internalDutyCycle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub internal_duty_cycle: Option<u32>,
}

impl EconetClockSettings {
    /// An internally generated clock at `frequency_hz` with `duty_cycle` percent.
    pub fn internal(frequency_hz: u32, duty_cycle: u32) -> Self {
        Self {
            mode: ClockMode::Internal,
            internal_frequency_hz: Some(frequency_hz),
            internal_duty_cycle: Some(duty_cycle),
        }
    }
}

fn default_true() -> bool {
    true
}

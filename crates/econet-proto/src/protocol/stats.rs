//! Traffic counter groups reported by the bridge.
//!
//! The bridge keeps two independent groups of counters:
//!
//! - [`BridgeStats`] – the AUN (IP) side: datagrams sent to and received from
//!   remote stations.  Wire key `aunbridge_stats`.
//! - [`LinkStats`] – the Econet side: frames seen on the local clocked bus.
//!   Wire key `econet_stats`.
//!
//! Every counter is a non-negative integer that only ever grows while a
//! connection is open.  The `stats_stream` push carries *partial* groups
//! ([`BridgeStatsUpdate`], [`LinkStatsUpdate`]): any field may be absent, and
//! an absent field means "unchanged", not "zero".

use serde::{Deserialize, Serialize};

// ── AUN bridge side ───────────────────────────────────────────────────────────

/// Complete snapshot of the AUN bridge counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeStats {
    /// AUN datagrams transmitted.
    pub tx_count: u64,
    /// Transmissions that needed at least one retry.
    pub tx_retry_count: u64,
    /// Transmissions abandoned after exhausting retries.
    pub tx_abort_count: u64,
    /// Transmissions that failed at the socket layer.
    pub tx_error_count: u64,
    /// AUN acknowledgements sent.
    pub tx_ack_count: u64,
    /// AUN negative acknowledgements sent.
    pub tx_nack_count: u64,
    /// AUN data datagrams received.
    pub rx_data_count: u64,
    /// AUN acknowledgements received.
    pub rx_ack_count: u64,
    /// AUN negative acknowledgements received.
    pub rx_nack_count: u64,
    /// Datagrams received with an unrecognised AUN type.
    pub rx_unknown_count: u64,
}

impl BridgeStats {
    /// Returns every counter paired with its wire name, in wire order.
    pub fn counters(&self) -> [(&'static str, u64); 10] {
        [
            ("tx_count", self.tx_count),
            ("tx_retry_count", self.tx_retry_count),
            ("tx_abort_count", self.tx_abort_count),
            ("tx_error_count", self.tx_error_count),
            ("tx_ack_count", self.tx_ack_count),
            ("tx_nack_count", self.tx_nack_count),
            ("rx_data_count", self.rx_data_count),
            ("rx_ack_count", self.rx_ack_count),
            ("rx_nack_count", self.rx_nack_count),
            ("rx_unknown_count", self.rx_unknown_count),
        ]
    }

    /// Overwrites every field present in `update`; absent fields are kept.
    pub fn apply(&mut self, update: &BridgeStatsUpdate) {
        replace(&mut self.tx_count, update.tx_count);
        replace(&mut self.tx_retry_count, update.tx_retry_count);
        replace(&mut self.tx_abort_count, update.tx_abort_count);
        replace(&mut self.tx_error_count, update.tx_error_count);
        replace(&mut self.tx_ack_count, update.tx_ack_count);
        replace(&mut self.tx_nack_count, update.tx_nack_count);
        replace(&mut self.rx_data_count, update.rx_data_count);
        replace(&mut self.rx_ack_count, update.rx_ack_count);
        replace(&mut self.rx_nack_count, update.rx_nack_count);
        replace(&mut self.rx_unknown_count, update.rx_unknown_count);
    }
}

/// Partial AUN bridge counters as carried by `stats_stream`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeStatsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_retry_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_abort_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_error_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_ack_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_nack_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_data_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_ack_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_nack_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_unknown_count: Option<u64>,
}

impl From<BridgeStats> for BridgeStatsUpdate {
    fn from(s: BridgeStats) -> Self {
        Self {
            tx_count: Some(s.tx_count),
            tx_retry_count: Some(s.tx_retry_count),
            tx_abort_count: Some(s.tx_abort_count),
            tx_error_count: Some(s.tx_error_count),
            tx_ack_count: Some(s.tx_ack_count),
            tx_nack_count: Some(s.tx_nack_count),
            rx_data_count: Some(s.rx_data_count),
            rx_ack_count: Some(s.rx_ack_count),
            rx_nack_count: Some(s.rx_nack_count),
            rx_unknown_count: Some(s.rx_unknown_count),
        }
    }
}

// ── Econet link side ──────────────────────────────────────────────────────────

/// Complete snapshot of the Econet link counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStats {
    /// Frames received from the Econet bus.
    pub rx_frame_count: u64,
    /// Frames dropped because the CRC did not match.
    pub rx_crc_fail_count: u64,
    /// Frames too short to carry an Econet header.
    pub rx_short_frame_count: u64,
    /// Frames terminated by an abort sequence.
    pub rx_abort_count: u64,
    /// Frames larger than the receive buffer.
    pub rx_oversize_count: u64,
    /// Scout/data acknowledgements received.
    pub rx_ack_count: u64,
    /// Negative acknowledgements received.
    pub rx_nack_count: u64,
    /// Frames transmitted onto the bus.
    pub tx_frame_count: u64,
    /// Acknowledgements transmitted onto the bus.
    pub tx_ack_count: u64,
}

impl LinkStats {
    /// Returns every counter paired with its wire name, in wire order.
    pub fn counters(&self) -> [(&'static str, u64); 9] {
        [
            ("rx_frame_count", self.rx_frame_count),
            ("rx_crc_fail_count", self.rx_crc_fail_count),
            ("rx_short_frame_count", self.rx_short_frame_count),
            ("rx_abort_count", self.rx_abort_count),
            ("rx_oversize_count", self.rx_oversize_count),
            ("rx_ack_count", self.rx_ack_count),
            ("rx_nack_count", self.rx_nack_count),
            ("tx_frame_count", self.tx_frame_count),
            ("tx_ack_count", self.tx_ack_count),
        ]
    }

    /// Overwrites every field present in `update`; absent fields are kept.
    pub fn apply(&mut self, update: &LinkStatsUpdate) {
        replace(&mut self.rx_frame_count, update.rx_frame_count);
        replace(&mut self.rx_crc_fail_count, update.rx_crc_fail_count);
        replace(&mut self.rx_short_frame_count, update.rx_short_frame_count);
        replace(&mut self.rx_abort_count, update.rx_abort_count);
        replace(&mut self.rx_oversize_count, update.rx_oversize_count);
        replace(&mut self.rx_ack_count, update.rx_ack_count);
        replace(&mut self.rx_nack_count, update.rx_nack_count);
        replace(&mut self.tx_frame_count, update.tx_frame_count);
        replace(&mut self.tx_ack_count, update.tx_ack_count);
    }
}

/// Partial Econet link counters as carried by `stats_stream`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkStatsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_frame_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_crc_fail_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_short_frame_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_abort_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_oversize_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_ack_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx_nack_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_frame_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_ack_count: Option<u64>,
}

impl From<LinkStats> for LinkStatsUpdate {
    fn from(s: LinkStats) -> Self {
        Self {
            rx_frame_count: Some(s.rx_frame_count),
            rx_crc_fail_count: Some(s.rx_crc_fail_count),
            rx_short_frame_count: Some(s.rx_short_frame_count),
            rx_abort_count: Some(s.rx_abort_count),
            rx_oversize_count: Some(s.rx_oversize_count),
            rx_ack_count: Some(s.rx_ack_count),
            rx_nack_count: Some(s.rx_nack_count),
            tx_frame_count: Some(s.tx_frame_count),
            tx_ack_count: Some(s.tx_ack_count),
        }
    }
}

fn replace(slot: &mut u64, value: Option<u64>) {
    if let Some(v) = value {
        *slot = v;
    }
}

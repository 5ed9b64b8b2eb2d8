//! Simulated traffic counters.
//!
//! Each tick every counter grows by a random offset drawn from `0..spread`,
//! where `spread` is per counter: bulk-traffic counters move quickly, error
//! counters barely at all.  Counters never reset, wrap or shrink.
//!
//! Every counter drifts from its *own* previous value.  The dashboard's
//! JavaScript mock server derives a few counters from a sibling (`tx_ack_count` from
//! `tx_abort_count`, `tx_nack_count` from `tx_error_count`, the link's
//! `rx_ack_count` from `rx_nack_count`), which lets `rx_ack_count` fall
//! between ticks.  That coupling is not reproduced.
//!
//! The random source is the [`Jitter`] trait so tests can drive the drift
//! deterministically.

use econet_proto::{BridgeStats, LinkStats, StatsStream};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-counter spread for the AUN bridge group.
pub const BRIDGE_SPREAD: BridgeStats = BridgeStats {
    tx_count: 10,
    tx_retry_count: 2,
    tx_abort_count: 1,
    tx_error_count: 1,
    tx_ack_count: 1,
    tx_nack_count: 1,
    rx_data_count: 15,
    rx_ack_count: 15,
    rx_nack_count: 2,
    rx_unknown_count: 1,
};

/// Per-counter spread for the Econet link group.
pub const LINK_SPREAD: LinkStats = LinkStats {
    rx_frame_count: 20,
    rx_crc_fail_count: 1,
    rx_short_frame_count: 1,
    rx_abort_count: 1,
    rx_oversize_count: 1,
    rx_ack_count: 2,
    rx_nack_count: 2,
    tx_frame_count: 20,
    tx_ack_count: 20,
};

/// Source of the non-negative offset added to a counter each tick.
#[cfg_attr(test, mockall::automock)]
pub trait Jitter: Send {
    /// Returns an offset in `0..spread` (always 0 when `spread` is 0).
    fn offset(&mut self, spread: u64) -> u64;
}

/// [`Jitter`] backed by any `rand` generator.
#[derive(Debug)]
pub struct RngJitter<R>(R);

impl RngJitter<StdRng> {
    /// Seeds a generator from the operating system.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// A reproducible generator, for tests and benchmarks.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send> Jitter for RngJitter<R> {
    fn offset(&mut self, spread: u64) -> u64 {
        if spread == 0 {
            0
        } else {
            self.0.gen_range(0..spread)
        }
    }
}

/// One connection's simulated counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Telemetry {
    uptime_ticks: u64,
    bridge: BridgeStats,
    link: LinkStats,
}

impl Telemetry {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the given counters instead of zero.
    pub fn with_counters(bridge: BridgeStats, link: LinkStats) -> Self {
        Self {
            uptime_ticks: 0,
            bridge,
            link,
        }
    }

    /// Number of ticks since the connection opened.
    pub fn uptime_ticks(&self) -> u64 {
        self.uptime_ticks
    }

    pub fn bridge(&self) -> &BridgeStats {
        &self.bridge
    }

    pub fn link(&self) -> &LinkStats {
        &self.link
    }

    /// Advances uptime and every counter once, returning the full snapshot.
    pub fn tick(&mut self, jitter: &mut dyn Jitter) -> StatsStream {
        self.uptime_ticks = self.uptime_ticks.saturating_add(1);

        let b = &mut self.bridge;
        let s = &BRIDGE_SPREAD;
        b.tx_count = drift(b.tx_count, s.tx_count, jitter);
        b.tx_retry_count = drift(b.tx_retry_count, s.tx_retry_count, jitter);
        b.tx_abort_count = drift(b.tx_abort_count, s.tx_abort_count, jitter);
        b.tx_error_count = drift(b.tx_error_count, s.tx_error_count, jitter);
        b.tx_ack_count = drift(b.tx_ack_count, s.tx_ack_count, jitter);
        b.tx_nack_count = drift(b.tx_nack_count, s.tx_nack_count, jitter);
        b.rx_data_count = drift(b.rx_data_count, s.rx_data_count, jitter);
        b.rx_ack_count = drift(b.rx_ack_count, s.rx_ack_count, jitter);
        b.rx_nack_count = drift(b.rx_nack_count, s.rx_nack_count, jitter);
        b.rx_unknown_count = drift(b.rx_unknown_count, s.rx_unknown_count, jitter);

        let l = &mut self.link;
        let s = &LINK_SPREAD;
        l.rx_frame_count = drift(l.rx_frame_count, s.rx_frame_count, jitter);
        l.rx_crc_fail_count = drift(l.rx_crc_fail_count, s.rx_crc_fail_count, jitter);
        l.rx_short_frame_count = drift(l.rx_short_frame_count, s.rx_short_frame_count, jitter);
        l.rx_abort_count = drift(l.rx_abort_count, s.rx_abort_count, jitter);
        l.rx_oversize_count = drift(l.rx_oversize_count, s.rx_oversize_count, jitter);
        l.rx_ack_count = drift(l.rx_ack_count, s.rx_ack_count, jitter);
        l.rx_nack_count = drift(l.rx_nack_count, s.rx_nack_count, jitter);
        l.tx_frame_count = drift(l.tx_frame_count, s.tx_frame_count, jitter);
        l.tx_ack_count = drift(l.tx_ack_count, s.tx_ack_count, jitter);

        StatsStream::full(self.bridge, self.link)
    }
}

fn drift(value: u64, spread: u64, jitter: &mut dyn Jitter) -> u64 {
    value.saturating_add(jitter.offset(spread))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

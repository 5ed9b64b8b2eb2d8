//! # econet-proto
//!
//! Shared library for the EconetWiFi dashboard protocol: the JSON messages
//! exchanged over the `/ws` WebSocket between the browser dashboard and the
//! Econet-to-AUN bridge (or the development simulator standing in for it).
//!
//! This crate is used by both the simulator (`econet-mock`) and the client
//! state store (`econet-client`).  It has no dependencies on sockets, async
//! runtimes, or UI frameworks.
//!
//! # Architecture overview
//!
//! The bridge device sits between a legacy Econet network and an IP network,
//! encapsulating Econet frames as AUN datagrams.  The dashboard watches two
//! groups of traffic counters (one per side of the bridge), a live log, and
//! edits a handful of settings resources.
//!
//! - **`protocol`** – What travels over the wire.  Client requests
//!   ([`Request`]), server pushes and responses ([`ServerMessage`]), the two
//!   stat groups, the settings resources, and the JSON codec.
//!
//! - **`domain`** – Protocol-adjacent logic with no I/O: log line
//!   classification ([`LogLevel`], [`LogEntry`]).

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `econet_proto::Request` instead of `econet_proto::protocol::messages::Request`.
pub use domain::log::{LogEntry, LogLevel};
pub use protocol::codec::{decode_request, decode_server_message, encode_message, ProtocolError};
pub use protocol::messages::{Request, RequestId, RequestKind, Response, ServerMessage, StatsStream};
pub use protocol::sequence::RequestIdCounter;
pub use protocol::stats::{BridgeStats, BridgeStatsUpdate, LinkStats, LinkStatsUpdate};

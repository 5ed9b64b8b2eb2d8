//! Application layer for econet-mock.
//!
//! Everything the simulated device *does*, expressed as synchronous code with
//! no sockets or timers:
//!
//! - [`telemetry`] – counter drift for the `stats_stream` push
//! - [`log_feed`] – the periodic synthetic log line
//! - [`handler`] – canned answers to the twelve request kinds
//!
//! The infrastructure layer decides *when* these run.

pub mod handler;
pub mod log_feed;
pub mod telemetry;

pub use handler::{handle_request, reply_to_protocol_error, Reply};
pub use log_feed::simulated_log_line;
pub use telemetry::{Jitter, RngJitter, Telemetry};

//! Domain layer: protocol-adjacent logic with no I/O.
//!
//! Anything here must be usable from both the simulator and the client store
//! without pulling in sockets or an async runtime.

pub mod log;

pub use log::{LogEntry, LogLevel};

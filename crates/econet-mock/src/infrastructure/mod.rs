//! Infrastructure layer for econet-mock.
//!
//! Everything that touches sockets, tasks, timers or the filesystem:
//!
//! - [`ws_server`] binds the listener, guards the upgrade path and runs one
//!   task per dashboard connection
//! - [`connection`] owns a connection's timers and turns text frames into
//!   responses
//! - [`config_file`] reads the optional TOML configuration

pub mod config_file;
pub mod connection;
pub mod ws_server;

pub use config_file::{ConfigError, FileConfig};
pub use connection::{ChannelClosed, Connection};
pub use ws_server::{run_server, SimulatorServer};

//! Domain layer for econet-mock.
//!
//! Only plain data lives here: the runtime configuration and the error that
//! describes an unusable one.

pub mod config;

pub use config::{InvalidConfig, SimulatorConfig};

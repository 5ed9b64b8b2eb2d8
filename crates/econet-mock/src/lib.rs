//! econet-mock library crate.
//!
//! A stand-in for the EconetWiFi bridge's `/ws` endpoint, so the dashboard
//! can be developed without hardware.  Each WebSocket connection gets its own
//! simulated device: counters that drift upward once per second, a synthetic
//! log line every three seconds, and canned answers to every configuration
//! request (reads succeed, writes are refused).
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Dashboard (JSON over WebSocket, path /ws)
//!         ↕
//! [econet-mock]
//!   ├── domain/           SimulatorConfig
//!   ├── application/      Counter drift, synthetic log lines, request handler
//!   └── infrastructure/
//!         ├── config_file/ Optional TOML configuration
//!         ├── connection/  Per-connection context: timers + request dispatch
//!         └── ws_server/   Accept loop and upgrade-path guard (tokio-tungstenite)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `econet-proto` only; everything in
//!   it is a plain synchronous function or struct.
//! - `infrastructure` owns sockets, tasks and timers.

/// Domain layer: configuration types (no I/O).
pub mod domain;

/// Application layer: the simulated device's behaviour.
pub mod application;

/// Infrastructure layer: WebSocket server, connection context, config file.
pub mod infrastructure;

//! econet-client library crate.
//!
//! The dashboard side of the EconetWiFi protocol, without the rendering:
//! a reactive state store that folds the device's `stats_stream` and `log`
//! pushes into display-ready state, request/response correlation by id, and a
//! WebSocket driver that ties the two to a live device or to `econet-mock`.
//!
//! # Architecture
//!
//! ```text
//! [econet-client]
//!   ├── domain/           ClientStore, LogBuffer, ConnectionState, DeviceSummary
//!   ├── application/      PendingRequests (id → waiting caller)
//!   └── infrastructure/   DeviceClient (tokio-tungstenite)
//! ```

/// Domain layer: client state and its change events.
pub mod domain;

/// Application layer: request correlation.
pub mod application;

/// Infrastructure layer: WebSocket driver.
pub mod infrastructure;

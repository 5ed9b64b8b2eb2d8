//! Domain layer for econet-client: the state a dashboard renders.
//!
//! No sockets here.  The store only depends on `tokio::sync::broadcast` for
//! change notification.

pub mod log_buffer;
pub mod store;

pub use log_buffer::{LogBuffer, MAX_LOGS};
pub use store::{ClientStore, ConnectionState, DeviceSummary, DeviceUpdate, StoreEvent};

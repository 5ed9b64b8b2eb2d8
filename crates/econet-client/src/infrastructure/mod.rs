//! Infrastructure layer for econet-client: the WebSocket connection.

pub mod ws_client;

pub use ws_client::{ClientError, DeviceClient, DEFAULT_CALL_TIMEOUT};

//! Display-ready state built from the device's message stream.
//!
//! [`ClientStore`] is a plain synchronous state container.  Whoever owns it
//! (the WebSocket driver, a UI, a test) feeds it [`ServerMessage`]s through
//! [`ClientStore::ingest`]; every mutation is announced as a [`StoreEvent`] on
//! a broadcast channel.  Notifications are best-effort: a store with no
//! subscribers is normal, and a slow subscriber only loses events, never
//! blocks ingestion.

use econet_proto::{
    BridgeStats, LinkStats, LogEntry, Response, ServerMessage, StatsStream,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::log_buffer::LogBuffer;

/// Buffered events per subscriber before the oldest are dropped.
const EVENT_CAPACITY: usize = 256;

/// Lifecycle of the dashboard's channel to the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

/// Static and slow-changing facts about the device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub model: String,
    pub online: bool,
    pub uptime: u64,
    pub temperature: f64,
    pub voltage: f64,
    pub firmware: String,
}

/// Partial update for [`DeviceSummary`]; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceUpdate {
    pub model: Option<String>,
    pub online: Option<bool>,
    pub uptime: Option<u64>,
    pub temperature: Option<f64>,
    pub voltage: Option<f64>,
    pub firmware: Option<String>,
}

impl DeviceSummary {
    pub fn apply(&mut self, update: DeviceUpdate) {
        if let Some(v) = update.model {
            self.model = v;
        }
        if let Some(v) = update.online {
            self.online = v;
        }
        if let Some(v) = update.uptime {
            self.uptime = v;
        }
        if let Some(v) = update.temperature {
            self.temperature = v;
        }
        if let Some(v) = update.voltage {
            self.voltage = v;
        }
        if let Some(v) = update.firmware {
            self.firmware = v;
        }
    }
}

/// Change notification published by [`ClientStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    ConnectionChanged(ConnectionState),
    /// Carries the state after the update.
    StatsUpdated { bridge: BridgeStats, link: LinkStats },
    LogAppended(LogEntry),
    DeviceUpdated(DeviceSummary),
}

/// Reactive client-side state for one device.
#[derive(Debug)]
pub struct ClientStore {
    connection: ConnectionState,
    bridge: BridgeStats,
    link: LinkStats,
    logs: LogBuffer,
    device: DeviceSummary,
    events: broadcast::Sender<StoreEvent>,
}

impl ClientStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            connection: ConnectionState::default(),
            bridge: BridgeStats::default(),
            link: LinkStats::default(),
            logs: LogBuffer::new(),
            device: DeviceSummary::default(),
            events,
        }
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    pub fn bridge_stats(&self) -> &BridgeStats {
        &self.bridge
    }

    pub fn link_stats(&self) -> &LinkStats {
        &self.link
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    pub fn device(&self) -> &DeviceSummary {
        &self.device
    }

    /// Records a connection transition.  Repeating the current state is a
    /// no-op and publishes nothing.
    pub fn set_connection_state(&mut self, state: ConnectionState) {
        if self.connection == state {
            return;
        }
        self.connection = state;
        self.publish(StoreEvent::ConnectionChanged(state));
    }

    /// Merges a `stats_stream` push.  Each present field replaces the stored
    /// value; absent fields and absent groups keep their previous values.
    pub fn apply_stats(&mut self, stats: &StatsStream) {
        if let Some(update) = &stats.bridge_stats {
            self.bridge.apply(update);
        }
        if let Some(update) = &stats.link_stats {
            self.link.apply(update);
        }
        self.publish(StoreEvent::StatsUpdated {
            bridge: self.bridge,
            link: self.link,
        });
    }

    /// Classifies and appends one log line, evicting the oldest past the cap.
    pub fn append_log(&mut self, line: impl Into<String>) {
        let entry = LogEntry::new(line);
        self.logs.push(entry.clone());
        self.publish(StoreEvent::LogAppended(entry));
    }

    pub fn apply_device(&mut self, update: DeviceUpdate) {
        self.device.apply(update);
        self.publish(StoreEvent::DeviceUpdated(self.device.clone()));
    }

    /// Routes one device message.
    ///
    /// Pushes are folded into the state; a response is handed back to the
    /// caller for correlation and leaves the state untouched.
    pub fn ingest(&mut self, msg: ServerMessage) -> Option<Response> {
        match msg {
            ServerMessage::StatsStream(stats) => {
                self.apply_stats(&stats);
                None
            }
            ServerMessage::Log { line } => {
                self.append_log(line);
                None
            }
            ServerMessage::Response(response) => Some(response),
        }
    }

    fn publish(&self, event: StoreEvent) {
        // An error only means nobody is subscribed.
        let _ = self.events.send(event);
    }
}

impl Default for ClientStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use econet_proto::{BridgeStatsUpdate, LinkStatsUpdate, LogLevel};

    #[test]
    fn test_initial_state_is_connecting() {
        let store = ClientStore::new();
        assert_eq!(store.connection_state(), ConnectionState::Connecting);
        assert!(store.logs().is_empty());
        assert_eq!(*store.bridge_stats(), BridgeStats::default());
    }

    #[test]
    fn test_connection_transitions_are_published() {
        // Arrange
        let mut store = ClientStore::new();
        let mut rx = store.subscribe();

        // Act
        store.set_connection_state(ConnectionState::Connected);
        store.set_connection_state(ConnectionState::Connected);
        store.set_connection_state(ConnectionState::Disconnected);

        // Assert: the repeated state produced no event
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::ConnectionChanged(ConnectionState::Connected)
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::ConnectionChanged(ConnectionState::Disconnected)
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_partial_stats_keep_absent_fields() {
        // Arrange
        let mut store = ClientStore::new();
        store.apply_stats(&StatsStream::full(
            BridgeStats {
                tx_count: 10,
                rx_data_count: 20,
                ..BridgeStats::default()
            },
            LinkStats {
                rx_frame_count: 30,
                ..LinkStats::default()
            },
        ));

        // Act: only tx_count, and no link group at all
        store.apply_stats(&StatsStream {
            bridge_stats: Some(BridgeStatsUpdate {
                tx_count: Some(11),
                ..BridgeStatsUpdate::default()
            }),
            link_stats: None,
        });

        // Assert
        assert_eq!(store.bridge_stats().tx_count, 11);
        assert_eq!(store.bridge_stats().rx_data_count, 20);
        assert_eq!(store.link_stats().rx_frame_count, 30);
    }

    #[test]
    fn test_link_update_replaces_only_present_fields() {
        let mut store = ClientStore::new();
        store.apply_stats(&StatsStream {
            bridge_stats: None,
            link_stats: Some(LinkStatsUpdate {
                tx_ack_count: Some(4),
                ..LinkStatsUpdate::default()
            }),
        });
        assert_eq!(store.link_stats().tx_ack_count, 4);
        assert_eq!(store.link_stats().tx_frame_count, 0);
    }

    #[test]
    fn test_append_log_classifies_and_caps() {
        let mut store = ClientStore::new();
        for n in 0..=200 {
            store.append_log(format!("I tick {n}"));
        }
        assert_eq!(store.logs().len(), 200);
        assert_eq!(store.logs().get(0).unwrap().line, "I tick 1");
        assert!(store.logs().iter().all(|e| e.level == LogLevel::Info));
    }

    #[test]
    fn test_ingest_routes_each_message_kind() {
        // Arrange
        let mut store = ClientStore::new();
        let mut rx = store.subscribe();

        // Act
        let from_log = store.ingest(ServerMessage::Log {
            line: "E disk on fire".to_string(),
        });
        let from_stats = store.ingest(ServerMessage::StatsStream(StatsStream::default()));
        let from_response = store.ingest(ServerMessage::Response(Response::ok(9)));

        // Assert
        assert!(from_log.is_none());
        assert!(from_stats.is_none());
        assert_eq!(from_response.map(|r| r.id()), Some(9));
        assert_eq!(store.logs().get(0).unwrap().level, LogLevel::Error);
        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::LogAppended(_)));
        assert!(matches!(rx.try_recv().unwrap(), StoreEvent::StatsUpdated { .. }));
        assert!(rx.try_recv().is_err(), "responses do not touch the state");
    }

    #[test]
    fn test_device_update_is_partial() {
        let mut store = ClientStore::new();
        store.apply_device(DeviceUpdate {
            model: Some("EconetWiFi".to_string()),
            firmware: Some("1.2.0".to_string()),
            ..DeviceUpdate::default()
        });

        store.apply_device(DeviceUpdate {
            online: Some(true),
            uptime: Some(42),
            ..DeviceUpdate::default()
        });

        let device = store.device();
        assert_eq!(device.model, "EconetWiFi");
        assert_eq!(device.firmware, "1.2.0");
        assert!(device.online);
        assert_eq!(device.uptime, 42);
    }

    #[test]
    fn test_store_without_subscribers_still_updates() {
        let mut store = ClientStore::new();
        store.append_log("no one is listening");
        store.set_connection_state(ConnectionState::Connected);
        assert_eq!(store.logs().len(), 1);
        assert_eq!(store.connection_state(), ConnectionState::Connected);
    }

    #[test]
    fn test_device_update_deserializes_from_partial_json() {
        let update: DeviceUpdate =
            serde_json::from_str(r#"{"temperature": 41.5, "voltage": 5.1}"#).unwrap();
        assert_eq!(update.temperature, Some(41.5));
        assert_eq!(update.voltage, Some(5.1));
        assert!(update.model.is_none());
    }
}

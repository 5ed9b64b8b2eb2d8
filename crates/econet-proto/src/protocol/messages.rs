//! JSON message types for the dashboard WebSocket protocol.
//!
//! # Message flow
//!
//! ```text
//! Dashboard → Device:  JSON text frame  →  Request
//! Device → Dashboard:  ServerMessage    →  JSON text frame
//! ```
//!
//! Every message is a JSON object with a `"type"` field that identifies the
//! variant; all other fields sit in the same object:
//!
//! ```json
//! {"type":"get_wifi","id":7}
//! {"type":"response","id":7,"ok":true,"settings":{"ssid":"the.internet","password":""}}
//! {"type":"log","line":"I bridge up"}
//! ```
//!
//! # Correlation
//!
//! Requests carry a caller-chosen numeric `id` and every [`Response`] echoes
//! it.  There is no other multiplexing: responses to different requests may
//! interleave with `stats_stream` and `log` pushes in any order.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::settings::{
    EconetClockSettings, EconetSettings, WifiApSettings, WifiSettings,
};
use super::stats::{BridgeStats, BridgeStatsUpdate, LinkStats, LinkStatsUpdate};

/// Caller-chosen correlation identifier carried by every request.
pub type RequestId = u64;

// ── Dashboard → Device ────────────────────────────────────────────────────────

/// All requests the dashboard can send.
///
/// Matching on this enum is exhaustive, so adding a request kind forces every
/// handler to decide what to do with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    GetWifi {
        id: RequestId,
    },
    SaveWifi {
        id: RequestId,
        settings: WifiSettings,
    },
    GetWifiAp {
        id: RequestId,
    },
    SaveWifiAp {
        id: RequestId,
        settings: WifiApSettings,
    },
    GetEconet {
        id: RequestId,
    },
    SaveEconet {
        id: RequestId,
        #[serde(default)]
        settings: EconetSettings,
    },
    GetEconetClock {
        id: RequestId,
    },
    SaveEconetClock {
        id: RequestId,
        settings: EconetClockSettings,
    },
    GetEconetTermination {
        id: RequestId,
    },
    SaveEconetTermination {
        id: RequestId,
        /// `1` enables the bus terminators, `0` disables them.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<i32>,
    },
    Reboot {
        id: RequestId,
    },
    FactoryReset {
        id: RequestId,
    },
}

impl Request {
    /// Returns the correlation id of this request.
    pub fn id(&self) -> RequestId {
        match self {
            Request::GetWifi { id }
            | Request::SaveWifi { id, .. }
            | Request::GetWifiAp { id }
            | Request::SaveWifiAp { id, .. }
            | Request::GetEconet { id }
            | Request::SaveEconet { id, .. }
            | Request::GetEconetClock { id }
            | Request::SaveEconetClock { id, .. }
            | Request::GetEconetTermination { id }
            | Request::SaveEconetTermination { id, .. }
            | Request::Reboot { id }
            | Request::FactoryReset { id } => *id,
        }
    }

    /// Returns the payload-free kind of this request.
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::GetWifi { .. } => RequestKind::GetWifi,
            Request::SaveWifi { .. } => RequestKind::SaveWifi,
            Request::GetWifiAp { .. } => RequestKind::GetWifiAp,
            Request::SaveWifiAp { .. } => RequestKind::SaveWifiAp,
            Request::GetEconet { .. } => RequestKind::GetEconet,
            Request::SaveEconet { .. } => RequestKind::SaveEconet,
            Request::GetEconetClock { .. } => RequestKind::GetEconetClock,
            Request::SaveEconetClock { .. } => RequestKind::SaveEconetClock,
            Request::GetEconetTermination { .. } => RequestKind::GetEconetTermination,
            Request::SaveEconetTermination { .. } => RequestKind::SaveEconetTermination,
            Request::Reboot { .. } => RequestKind::Reboot,
            Request::FactoryReset { .. } => RequestKind::FactoryReset,
        }
    }
}

/// The twelve request kinds, without payloads.
///
/// Used for log messages (never log settings, they may hold passwords) and to
/// tell an unknown `"type"` apart from a known one with a bad payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    GetWifi,
    SaveWifi,
    GetWifiAp,
    SaveWifiAp,
    GetEconet,
    SaveEconet,
    GetEconetClock,
    SaveEconetClock,
    GetEconetTermination,
    SaveEconetTermination,
    Reboot,
    FactoryReset,
}

impl RequestKind {
    /// Every kind, in the order the dashboard's settings pages use them.
    pub const ALL: [RequestKind; 12] = [
        RequestKind::GetWifi,
        RequestKind::SaveWifi,
        RequestKind::GetWifiAp,
        RequestKind::SaveWifiAp,
        RequestKind::GetEconet,
        RequestKind::SaveEconet,
        RequestKind::GetEconetClock,
        RequestKind::SaveEconetClock,
        RequestKind::GetEconetTermination,
        RequestKind::SaveEconetTermination,
        RequestKind::Reboot,
        RequestKind::FactoryReset,
    ];

    /// The `"type"` string used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::GetWifi => "get_wifi",
            RequestKind::SaveWifi => "save_wifi",
            RequestKind::GetWifiAp => "get_wifi_ap",
            RequestKind::SaveWifiAp => "save_wifi_ap",
            RequestKind::GetEconet => "get_econet",
            RequestKind::SaveEconet => "save_econet",
            RequestKind::GetEconetClock => "get_econet_clock",
            RequestKind::SaveEconetClock => "save_econet_clock",
            RequestKind::GetEconetTermination => "get_econet_termination",
            RequestKind::SaveEconetTermination => "save_econet_termination",
            RequestKind::Reboot => "reboot",
            RequestKind::FactoryReset => "factory_reset",
        }
    }

    /// Looks up a kind by its wire `"type"` string.
    pub fn from_wire(s: &str) -> Option<RequestKind> {
        RequestKind::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// `true` for kinds that fetch a resource and carry no payload.
    pub fn is_get(self) -> bool {
        matches!(
            self,
            RequestKind::GetWifi
                | RequestKind::GetWifiAp
                | RequestKind::GetEconet
                | RequestKind::GetEconetClock
                | RequestKind::GetEconetTermination
        )
    }

    /// Builds the payload-free request for a `get_*` kind, or `None` for
    /// kinds that need a payload or act on the device.
    pub fn get_request(self, id: RequestId) -> Option<Request> {
        match self {
            RequestKind::GetWifi => Some(Request::GetWifi { id }),
            RequestKind::GetWifiAp => Some(Request::GetWifiAp { id }),
            RequestKind::GetEconet => Some(Request::GetEconet { id }),
            RequestKind::GetEconetClock => Some(Request::GetEconetClock { id }),
            RequestKind::GetEconetTermination => Some(Request::GetEconetTermination { id }),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Device → Dashboard ────────────────────────────────────────────────────────

/// All messages the device (or simulator) sends to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Unsolicited telemetry push.
    StatsStream(StatsStream),
    /// One line of device log output.
    Log { line: String },
    /// Reply to exactly one [`Request`].
    Response(Response),
}

/// Payload of a `stats_stream` push.  Either group may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsStream {
    #[serde(
        rename = "aunbridge_stats",
        alias = "bridge_stats",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bridge_stats: Option<BridgeStatsUpdate>,
    #[serde(
        rename = "econet_stats",
        alias = "link_stats",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub link_stats: Option<LinkStatsUpdate>,
}

impl StatsStream {
    /// A push carrying both groups in full.
    pub fn full(bridge: BridgeStats, link: LinkStats) -> Self {
        Self {
            bridge_stats: Some(bridge.into()),
            link_stats: Some(link.into()),
        }
    }
}

/// Reply to a single request.
///
/// A response is either a success (`"ok": true`, optionally with `settings` or
/// `value`) or a failure (`"error": "..."`), never both.  The constructors
/// enforce this; a decoded response from a misbehaving peer that carries both
/// is treated as a failure by [`Response::outcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    settings: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<serde_json::Value>,
}

impl Response {
    /// A bare success with no payload.
    pub fn ok(id: RequestId) -> Self {
        Self {
            id,
            ok: Some(true),
            error: None,
            settings: None,
            value: None,
        }
    }

    /// A success carrying a settings resource.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` cannot be represented as JSON.
    pub fn with_settings<T: Serialize>(id: RequestId, settings: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            settings: Some(serde_json::to_value(settings)?),
            ..Self::ok(id)
        })
    }

    /// A success carrying a scalar `value`.
    pub fn with_value(id: RequestId, value: impl Into<serde_json::Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::ok(id)
        }
    }

    /// A failure with a human-readable reason.
    pub fn error(id: RequestId, reason: impl Into<String>) -> Self {
        Self {
            id,
            ok: None,
            error: Some(reason.into()),
            settings: None,
            value: None,
        }
    }

    /// The id of the request this response answers.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// `true` when this is a success response.
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && self.ok == Some(true)
    }

    /// The failure reason, if this is a failure response.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `Ok(())` for a success, `Err(reason)` for a failure.
    ///
    /// A response with neither `ok` nor `error` is reported as a failure.
    pub fn outcome(&self) -> Result<(), &str> {
        match (&self.error, self.ok) {
            (Some(reason), _) => Err(reason.as_str()),
            (None, Some(true)) => Ok(()),
            (None, _) => Err("response carried neither 'ok' nor 'error'"),
        }
    }

    /// The raw `settings` payload, if any.
    pub fn settings(&self) -> Option<&serde_json::Value> {
        self.settings.as_ref()
    }

    /// The raw `value` payload, if any.
    pub fn value(&self) -> Option<&serde_json::Value> {
        self.value.as_ref()
    }

    /// Decodes the `settings` payload into a typed resource.
    ///
    /// Returns `Ok(None)` when the response has no settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match `T`.
    pub fn settings_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.settings
            .as_ref()
            .map(|v| T::deserialize(v))
            .transpose()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

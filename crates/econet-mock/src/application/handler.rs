//! Canned answers to dashboard requests.
//!
//! The simulator is read-only: every `get_*` succeeds with a fixed demo
//! payload and every state-changing request is refused.  Refusals are
//! ordinary responses carrying `"error"`, not transport faults.
//!
//! [`handle_request`] is exhaustive over [`Request`], so a new request kind
//! does not compile until it has an answer here.

use econet_proto::protocol::settings::{
    AunStation, EconetClockSettings, EconetSettings, EconetStation, WifiApSettings, WifiSettings,
};
use econet_proto::{ProtocolError, Request, RequestId, Response};
use serde::Serialize;

pub const WIFI_REFUSAL: &str = "No WiFi for you";
pub const WIFI_AP_REFUSAL: &str = "No WiFi AP for you";
pub const SAVE_REFUSAL: &str = "No saving for you";
pub const REBOOT_REFUSAL: &str = "Can't reboot the mock!";
pub const FACTORY_RESET_REFUSAL: &str = "Can't factory reset the mock!";

/// Termination setting reported by `get_econet_termination` (terminators on).
pub const DEMO_TERMINATION: i32 = 1;

/// The outcome of handling one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Side-effect lines to log, in order, before the response is sent.
    pub audit: Vec<String>,
    /// The single response for the request's id.
    pub response: Response,
}

impl Reply {
    fn plain(response: Response) -> Self {
        Self {
            audit: Vec::new(),
            response,
        }
    }
}

pub fn demo_wifi() -> WifiSettings {
    WifiSettings {
        ssid: "the.internet".to_string(),
        password: String::new(),
    }
}

pub fn demo_wifi_ap() -> WifiApSettings {
    WifiApSettings {
        ssid: "n-break-econet".to_string(),
        password: String::new(),
        enabled: true,
    }
}

pub fn demo_clock() -> EconetClockSettings {
    EconetClockSettings::internal(100_000, 30)
}

pub fn demo_econet() -> EconetSettings {
    EconetSettings {
        econet_stations: Some(vec![
            EconetStation {
                station_id: 127,
                udp_port: 32768,
            },
            EconetStation {
                station_id: 88,
                udp_port: 32769,
            },
        ]),
        aun_stations: Some(vec![AunStation {
            station_id: 254,
            remote_ip: "10.222.8.8".to_string(),
            udp_port: 32768,
        }]),
    }
}

/// Answers one request.
pub fn handle_request(request: &Request) -> Reply {
    match request {
        Request::GetWifi { id } => Reply::plain(settings_response(*id, &demo_wifi())),
        Request::SaveWifi { id, .. } => Reply::plain(Response::error(*id, WIFI_REFUSAL)),

        Request::GetWifiAp { id } => Reply::plain(settings_response(*id, &demo_wifi_ap())),
        Request::SaveWifiAp { id, .. } => Reply::plain(Response::error(*id, WIFI_AP_REFUSAL)),

        Request::GetEconetClock { id } => Reply::plain(settings_response(*id, &demo_clock())),
        Request::SaveEconetClock { id, .. } => Reply::plain(Response::error(*id, SAVE_REFUSAL)),

        Request::GetEconetTermination { id } => {
            Reply::plain(Response::with_value(*id, DEMO_TERMINATION))
        }
        Request::SaveEconetTermination { id, .. } => {
            Reply::plain(Response::error(*id, SAVE_REFUSAL))
        }

        Request::GetEconet { id } => Reply::plain(settings_response(*id, &demo_econet())),
        Request::SaveEconet { id, settings } => {
            // Echo what would have been saved so the dashboard developer can
            // see the submitted tables in the simulator's output.
            let local = settings.econet_stations.iter().flatten();
            let remote = settings.aun_stations.iter().flatten();
            let audit = local
                .map(|s| format!("ECO Station {}", s.station_id))
                .chain(remote.map(|s| format!("AUN Station {}", s.remote_ip)))
                .collect();
            Reply {
                audit,
                response: Response::error(*id, SAVE_REFUSAL),
            }
        }

        Request::Reboot { id } => Reply::plain(Response::error(*id, REBOOT_REFUSAL)),
        Request::FactoryReset { id } => Reply::plain(Response::error(*id, FACTORY_RESET_REFUSAL)),
    }
}

/// Builds the generic error response for a frame that could not be handled.
///
/// Returns `None` when the frame carried no usable id; such frames can only
/// be logged and dropped.
pub fn reply_to_protocol_error(err: &ProtocolError) -> Option<Response> {
    err.request_id().map(|id| Response::error(id, err.to_string()))
}

fn settings_response<T: Serialize>(id: RequestId, settings: &T) -> Response {
    Response::with_settings(id, settings)
        .unwrap_or_else(|e| Response::error(id, format!("internal error: {e}")))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Integration tests pinning the JSON wire format.
//!
//! The dashboard is written against frames produced by the real firmware and
//! by the development simulator.  These tests feed in frames in exactly the
//! shape those producers emit (including the firmware's hand-formatted JSON
//! with stray spaces) and check the shapes this crate emits in return.

use econet_proto::protocol::settings::{
    AunStation, ClockMode, EconetClockSettings, EconetSettings, EconetStation, WifiSettings,
};
use econet_proto::{
    decode_request, decode_server_message, encode_message, BridgeStats, LinkStats, Request,
    Response, ServerMessage, StatsStream,
};
use serde_json::{json, Value};

fn as_value(msg: &ServerMessage) -> Value {
    let text = encode_message(msg).expect("encode must succeed");
    serde_json::from_str(&text).expect("encoded text must be JSON")
}

#[test]
fn test_stats_stream_uses_dashboard_group_keys() {
    // Arrange
    let msg = ServerMessage::StatsStream(StatsStream::full(
        BridgeStats {
            tx_count: 5,
            ..BridgeStats::default()
        },
        LinkStats {
            tx_ack_count: 9,
            ..LinkStats::default()
        },
    ));

    // Act
    let value = as_value(&msg);

    // Assert
    assert_eq!(value["type"], "stats_stream");
    assert_eq!(value["aunbridge_stats"]["tx_count"], 5);
    assert_eq!(value["aunbridge_stats"].as_object().unwrap().len(), 10);
    assert_eq!(value["econet_stats"]["tx_ack_count"], 9);
    assert_eq!(value["econet_stats"].as_object().unwrap().len(), 9);
}

#[test]
fn test_stats_stream_with_one_group_omits_the_other() {
    let msg = ServerMessage::StatsStream(StatsStream {
        bridge_stats: None,
        link_stats: Some(LinkStats::default().into()),
    });
    let value = as_value(&msg);
    assert!(value.get("aunbridge_stats").is_none());
    assert!(value.get("econet_stats").is_some());
}

#[test]
fn test_firmware_ok_response_with_spaces_decodes() {
    let msg = decode_server_message(r#"{"type":"response","id": 12, "ok":true}"#).unwrap();
    match msg {
        ServerMessage::Response(r) => {
            assert_eq!(r.id(), 12);
            assert!(r.is_ok());
        }
        other => panic!("expected Response, got {other:?}"),
    }
}

#[test]
fn test_firmware_get_wifi_response_tolerates_extra_enabled_field() {
    // The firmware reports `enabled` for the station too; the typed station
    // settings simply ignore it.
    let text = r#"{"type":"response","id": 4, "ok":true,"settings": {"ssid": "home","password": "","enabled": true}}"#;

    let msg = decode_server_message(text).unwrap();

    let ServerMessage::Response(resp) = msg else {
        panic!("expected a response");
    };
    let wifi: WifiSettings = resp.settings_as().unwrap().unwrap();
    assert_eq!(wifi.ssid, "home");
}

#[test]
fn test_dashboard_save_econet_frame_decodes() {
    let text = json!({
        "type": "save_econet",
        "id": 41,
        "settings": {
            "econetStations": [{"station_id": 127, "udp_port": 32768}],
            "aunStations": [{"station_id": 254, "remote_ip": "10.222.8.8", "udp_port": 32768}]
        }
    })
    .to_string();

    let req = decode_request(&text).unwrap();

    assert_eq!(
        req,
        Request::SaveEconet {
            id: 41,
            settings: EconetSettings {
                econet_stations: Some(vec![EconetStation {
                    station_id: 127,
                    udp_port: 32768
                }]),
                aun_stations: Some(vec![AunStation {
                    station_id: 254,
                    remote_ip: "10.222.8.8".to_string(),
                    udp_port: 32768
                }]),
            },
        }
    );
}

#[test]
fn test_clock_settings_response_decodes_to_typed_settings() {
    let resp = Response::with_settings(6, &EconetClockSettings::internal(100_000, 30)).unwrap();
    let text = encode_message(&ServerMessage::Response(resp)).unwrap();

    let ServerMessage::Response(decoded) = decode_server_message(&text).unwrap() else {
        panic!("expected a response");
    };
    let clock: EconetClockSettings = decoded.settings_as().unwrap().unwrap();
    assert_eq!(clock.mode, ClockMode::Internal);
    assert_eq!(clock.internal_frequency_hz, Some(100_000));
    assert_eq!(clock.internal_duty_cycle, Some(30));
}

#[test]
fn test_log_message_shape() {
    let value = as_value(&ServerMessage::Log {
        line: "[mock] 12:00:00 - simulated log entry".to_string(),
    });
    assert_eq!(
        value,
        json!({"type": "log", "line": "[mock] 12:00:00 - simulated log entry"})
    );
}

#[test]
fn test_termination_save_value_is_optional() {
    let req = decode_request(r#"{"type":"save_econet_termination","id":3,"value":0}"#).unwrap();
    assert_eq!(
        req,
        Request::SaveEconetTermination {
            id: 3,
            value: Some(0)
        }
    );
    let bare = decode_request(r#"{"type":"save_econet_termination","id":3}"#).unwrap();
    assert_eq!(bare, Request::SaveEconetTermination { id: 3, value: None });
}

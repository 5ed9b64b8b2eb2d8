//! econet-monitor: a terminal view of an EconetWiFi bridge.
//!
//! Connects to a bridge (or `econet-mock`), feeds the client store and logs
//! what a dashboard would show: connection changes, classified device log
//! lines and a periodic traffic summary.  With `--fetch-settings` it reads
//! every settings resource once after connecting.
//!
//! ```text
//! econet-monitor [--url ws://127.0.0.1:8080/ws] [--fetch-settings]
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::{broadcast::error::RecvError, Mutex};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use econet_client::domain::{ClientStore, ConnectionState, StoreEvent};
use econet_client::infrastructure::{DeviceClient, DEFAULT_CALL_TIMEOUT};
use econet_proto::{LogEntry, LogLevel, RequestKind, Response};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Watch an EconetWiFi bridge's live telemetry and log.
#[derive(Debug, Parser)]
#[command(
    name = "econet-monitor",
    about = "Terminal monitor for the EconetWiFi bridge dashboard protocol",
    version
)]
struct Cli {
    /// WebSocket URL of the device.
    #[arg(long, default_value = "ws://127.0.0.1:8080/ws", env = "ECONET_MONITOR_URL")]
    url: String,

    /// Read every settings resource once after connecting.
    #[arg(long)]
    fetch_settings: bool,

    /// Seconds between traffic summaries.
    #[arg(long, default_value_t = 5)]
    stats_interval_secs: u64,
}

impl Cli {
    fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs.max(1))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let store = Arc::new(Mutex::new(ClientStore::new()));
    let mut events = store.lock().await.subscribe();

    let client = DeviceClient::connect_with_store(&cli.url, Arc::clone(&store))
        .await
        .with_context(|| format!("could not reach device at {}", cli.url))?;

    if cli.fetch_settings {
        fetch_settings(&client).await;
    }

    let mut summary = tokio::time::interval(cli.stats_interval());
    summary.tick().await;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("received Ctrl+C, disconnecting");
                break;
            }
            event = events.recv() => match event {
                Ok(StoreEvent::ConnectionChanged(state)) => {
                    info!("connection {state:?}");
                    if state == ConnectionState::Disconnected {
                        break;
                    }
                }
                Ok(StoreEvent::LogAppended(entry)) => log_device_line(&entry),
                Ok(StoreEvent::StatsUpdated { .. } | StoreEvent::DeviceUpdated(_)) => {}
                Err(RecvError::Lagged(n)) => warn!("monitor fell behind; {n} event(s) skipped"),
                Err(RecvError::Closed) => break,
            },
            _ = summary.tick() => {
                let s = store.lock().await;
                let (bridge, link) = (s.bridge_stats(), s.link_stats());
                info!(
                    "AUN tx={} rx={} retries={} | Econet rx={} tx={} crc_fail={}",
                    bridge.tx_count,
                    bridge.rx_data_count,
                    bridge.tx_retry_count,
                    link.rx_frame_count,
                    link.tx_frame_count,
                    link.rx_crc_fail_count,
                );
            }
        }
    }

    client.close().await;
    Ok(())
}

async fn fetch_settings(client: &DeviceClient) {
    for kind in RequestKind::ALL.into_iter().filter(|k| k.is_get()) {
        match client.get(kind, DEFAULT_CALL_TIMEOUT).await {
            Ok(response) => info!("{kind}: {}", describe_response(&response)),
            Err(e) => warn!("{kind} failed: {e}"),
        }
    }
}

fn describe_response(response: &Response) -> String {
    match response.outcome() {
        Err(reason) => format!("refused ({reason})"),
        Ok(()) => match (response.settings(), response.value()) {
            (Some(settings), _) => settings.to_string(),
            (None, Some(value)) => value.to_string(),
            (None, None) => "ok".to_string(),
        },
    }
}

fn log_device_line(entry: &LogEntry) {
    match entry.level {
        LogLevel::Error => error!(target: "device", "{}", entry.line),
        LogLevel::Warn => warn!(target: "device", "{}", entry.line),
        LogLevel::Info | LogLevel::Other => info!(target: "device", "{}", entry.line),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cli_default_url_points_at_local_simulator() {
        let cli = Cli::parse_from(["econet-monitor"]);
        assert_eq!(cli.url, "ws://127.0.0.1:8080/ws");
        assert!(!cli.fetch_settings);
    }

    #[test]
    fn test_cli_url_override() {
        let cli = Cli::parse_from(["econet-monitor", "--url", "ws://10.0.0.7/ws"]);
        assert_eq!(cli.url, "ws://10.0.0.7/ws");
    }

    #[test]
    fn test_cli_fetch_settings_flag() {
        let cli = Cli::parse_from(["econet-monitor", "--fetch-settings"]);
        assert!(cli.fetch_settings);
    }

    #[test]
    fn test_stats_interval_never_zero() {
        let cli = Cli::parse_from(["econet-monitor", "--stats-interval-secs", "0"]);
        assert_eq!(cli.stats_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_describe_refusal() {
        let r = Response::error(1, "No WiFi for you");
        assert_eq!(describe_response(&r), "refused (No WiFi for you)");
    }

    #[test]
    fn test_describe_value_and_settings() {
        assert_eq!(describe_response(&Response::with_value(1, 1)), "1");
        let r = Response::with_settings(2, &json!({"ssid": "x"})).unwrap();
        assert_eq!(describe_response(&r), r#"{"ssid":"x"}"#);
        assert_eq!(describe_response(&Response::ok(3)), "ok");
    }
}

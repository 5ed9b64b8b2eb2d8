//! EconetWiFi dashboard simulator: entry point.
//!
//! Serves the bridge's dashboard WebSocket protocol without hardware, so the
//! dashboard can be developed against a moving target: counters drift once a
//! second, a log line appears every three seconds, configuration reads return
//! demo values and writes are refused.
//!
//! # Usage
//!
//! ```text
//! econet-mock [OPTIONS]
//!
//! Options:
//!   --bind <IP>                  Listener address [default: 127.0.0.1]
//!   --port <PORT>                Listener port [default: 8080]
//!   --path <PATH>                WebSocket upgrade path [default: /ws]
//!   --telemetry-interval-ms <MS> stats_stream period [default: 1000]
//!   --log-interval-ms <MS>       Log line period [default: 3000]
//!   --config <FILE>              Optional TOML configuration file
//! ```
//!
//! # Precedence
//!
//! Built-in defaults, then the TOML file, then command-line flags (or their
//! environment variables).
//!
//! | Variable             | Flag       |
//! |----------------------|------------|
//! | `ECONET_MOCK_BIND`   | `--bind`   |
//! | `ECONET_MOCK_PORT`   | `--port`   |
//! | `ECONET_MOCK_PATH`   | `--path`   |
//! | `ECONET_MOCK_CONFIG` | `--config` |

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use econet_mock::domain::SimulatorConfig;
use econet_mock::infrastructure::{run_server, FileConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Development simulator for the EconetWiFi bridge dashboard.
#[derive(Debug, Parser)]
#[command(
    name = "econet-mock",
    about = "Simulated EconetWiFi bridge for dashboard development",
    version
)]
struct Cli {
    /// IP address to listen on.  Use `0.0.0.0` to expose the simulator on
    /// the LAN.
    #[arg(long, env = "ECONET_MOCK_BIND")]
    bind: Option<String>,

    /// TCP port to listen on.
    #[arg(long, env = "ECONET_MOCK_PORT")]
    port: Option<u16>,

    /// The only path upgraded to a WebSocket.
    #[arg(long, env = "ECONET_MOCK_PATH")]
    path: Option<String>,

    /// Milliseconds between `stats_stream` pushes.
    #[arg(long)]
    telemetry_interval_ms: Option<u64>,

    /// Milliseconds between synthetic log lines.
    #[arg(long)]
    log_interval_ms: Option<u64>,

    /// TOML file with `[server]` and `[simulation]` sections.
    #[arg(long, env = "ECONET_MOCK_CONFIG")]
    config: Option<PathBuf>,
}

impl Cli {
    /// Merges defaults, the optional config file and the CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded, `--bind` is not
    /// an IP address, or the merged configuration is invalid.
    fn into_simulator_config(self) -> anyhow::Result<SimulatorConfig> {
        let mut config = SimulatorConfig::default();

        if let Some(path) = &self.config {
            FileConfig::load(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?
                .apply_to(&mut config);
        }

        if let Some(bind) = &self.bind {
            let ip: IpAddr = bind
                .parse()
                .with_context(|| format!("invalid bind address: '{bind}'"))?;
            config.bind_addr.set_ip(ip);
        }
        if let Some(port) = self.port {
            config.bind_addr.set_port(port);
        }
        if let Some(path) = self.path {
            config.ws_path = path;
        }
        if let Some(ms) = self.telemetry_interval_ms {
            config.telemetry_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = self.log_interval_ms {
            config.log_interval = Duration::from_millis(ms);
        }

        config.validate().context("invalid simulator configuration")?;
        Ok(config)
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

    let config = Cli::parse().into_simulator_config()?;

    info!(
        "EconetWiFi simulator starting: ws://{}{} (stats every {:?}, log every {:?})",
        config.bind_addr, config.ws_path, config.telemetry_interval, config.log_interval
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(config, running).await?;

    info!("EconetWiFi simulator stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Per-connection context.
//!
//! A [`Connection`] is one simulated device.  Opening it starts two interval
//! tasks (telemetry and log lines) that enqueue onto the connection's
//! outbound queue; [`Connection::handle_text`] answers requests onto the same
//! queue.  The socket writer that drains the queue belongs to the server, so
//! this type can be driven from tests with a bare `mpsc` channel.
//!
//! Dropping or closing the connection aborts both tasks.  Once the last
//! sender is gone the queue's receiver sees end-of-stream.

use std::time::Duration;

use chrono::Local;
use econet_proto::{decode_request, ServerMessage};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::{
    handle_request, reply_to_protocol_error, simulated_log_line, RngJitter, Telemetry,
};
use crate::domain::SimulatorConfig;

/// The outbound queue is gone; the socket writer has stopped.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("outbound channel of connection {0} is closed")]
pub struct ChannelClosed(pub Uuid);

/// One simulated device bound to one WebSocket connection.
#[derive(Debug)]
pub struct Connection {
    id: Uuid,
    outbound: mpsc::Sender<ServerMessage>,
    telemetry_task: JoinHandle<()>,
    log_task: JoinHandle<()>,
}

impl Connection {
    /// Starts the emission timers for a new connection.
    ///
    /// Both timers skip their immediate first tick: the first `stats_stream`
    /// arrives one `telemetry_interval` after opening.
    pub fn open(config: &SimulatorConfig, outbound: mpsc::Sender<ServerMessage>) -> Self {
        let id = Uuid::new_v4();
        // Each loop holds its own sender clone; the queue closes only once
        // both tasks and this connection are gone.
        let telemetry_task = tokio::spawn(telemetry_loop(
            id,
            config.telemetry_interval,
            outbound.clone(),
        ));
        let log_task = tokio::spawn(log_loop(id, config.log_interval, outbound.clone()));
        debug!(connection = %id, "simulated device started");

        Self {
            id,
            outbound,
            telemetry_task,
            log_task,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Handles one text frame from the dashboard.
    ///
    /// Requests get exactly one response.  Frames that cannot be decoded are
    /// logged; they are answered only when they still carried a numeric id.
    ///
    /// # Errors
    ///
    /// [`ChannelClosed`] if the response could not be queued.
    pub async fn handle_text(&self, text: &str) -> Result<(), ChannelClosed> {
        let response = match decode_request(text) {
            Ok(request) => {
                debug!(connection = %self.id, id = request.id(), kind = %request.kind(), "request");
                let reply = handle_request(&request);
                // Audit lines go out before the response is queued.
                for line in &reply.audit {
                    info!(connection = %self.id, "{line}");
                }
                Some(reply.response)
            }
            Err(e) => {
                warn!(connection = %self.id, "dropping frame: {e}");
                reply_to_protocol_error(&e)
            }
        };

        match response {
            Some(response) => self
                .outbound
                .send(ServerMessage::Response(response))
                .await
                .map_err(|_| ChannelClosed(self.id)),
            None => Ok(()),
        }
    }

    /// Stops both timers.  Nothing is enqueued after this returns.
    pub fn close(self) {
        debug!(connection = %self.id, "simulated device stopped");
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.telemetry_task.abort();
        self.log_task.abort();
    }
}

fn ticker(period: Duration) -> tokio::time::Interval {
    // `interval` panics on a zero period.
    let period = period.max(Duration::from_millis(1));
    // Start one period out so the immediate tick is skipped.
    let mut ticker = interval_at(Instant::now() + period, period);
    // A stalled writer should not cause a burst of catch-up pushes.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

async fn telemetry_loop(id: Uuid, period: Duration, tx: mpsc::Sender<ServerMessage>) {
    let mut telemetry = Telemetry::new();
    let mut jitter = RngJitter::from_entropy();
    let mut ticker = ticker(period);
    loop {
        ticker.tick().await;
        let push = telemetry.tick(&mut jitter);
        // Waits for queue space; an error means the session is gone.
        if tx.send(ServerMessage::StatsStream(push)).await.is_err() {
            debug!(connection = %id, "telemetry stopped: queue closed");
            break;
        }
    }
}

async fn log_loop(id: Uuid, period: Duration, tx: mpsc::Sender<ServerMessage>) {
    let mut ticker = ticker(period);
    loop {
        ticker.tick().await;
        let line = simulated_log_line(&Local::now());
        if tx.send(ServerMessage::Log { line }).await.is_err() {
            debug!(connection = %id, "log feed stopped: queue closed");
            break;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

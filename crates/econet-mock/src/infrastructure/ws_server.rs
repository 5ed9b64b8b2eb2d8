//! WebSocket server: accept loop, upgrade-path guard and session plumbing.
//!
//! Each accepted TCP connection runs in its own Tokio task:
//!
//! 1. The HTTP upgrade is accepted only on the configured path (`/ws` by
//!    default); any other path is answered with `404 Not Found`.
//! 2. A [`Connection`] is opened.  Its timers and request handler enqueue
//!    onto a bounded queue.
//! 3. A single writer task drains that queue onto the socket, so frames are
//!    never interleaved.
//! 4. The reader loop feeds text frames to the connection until the peer
//!    closes.  Teardown stops the timers, then lets the writer answer the
//!    peer's Close frame before it exits.
//!
//! Shutdown is triggered by clearing a shared `AtomicBool` (see `main.rs`).

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use econet_proto::{encode_message, ServerMessage};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::server::{
    ErrorResponse, Request as HandshakeRequest, Response as HandshakeResponse,
};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{accept_hdr_async, WebSocketStream};
use tracing::{debug, error, info, warn};

use crate::domain::SimulatorConfig;
use crate::infrastructure::connection::{ChannelClosed, Connection};

const ACCEPT_POLL: Duration = Duration::from_millis(200);

/// How long the writer gets to complete the close handshake.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

// ── Public API ────────────────────────────────────────────────────────────────

/// A bound simulator listener, ready to serve.
///
/// Binding and serving are separate so callers (and tests) can bind to port
/// 0 and read back the assigned address before the accept loop starts.
pub struct SimulatorServer {
    listener: TcpListener,
    config: Arc<SimulatorConfig>,
}

impl SimulatorServer {
    /// Validates `config` and binds the listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the address cannot
    /// be bound (port in use, missing permission).
    pub async fn bind(config: SimulatorConfig) -> anyhow::Result<Self> {
        config
            .validate()
            .context("invalid simulator configuration")?;
        let listener = TcpListener::bind(config.bind_addr)
            .await
            .with_context(|| format!("failed to bind WebSocket listener on {}", config.bind_addr))?;
        Ok(Self {
            listener,
            config: Arc::new(config),
        })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until `running` is set to `false`.
    ///
    /// Sessions already in progress are not interrupted; they end when their
    /// peer disconnects or the runtime shuts down.
    pub async fn serve(self, running: Arc<AtomicBool>) -> anyhow::Result<()> {
        match self.local_addr() {
            Ok(addr) => info!(
                "simulator listening on ws://{addr}{}",
                self.config.ws_path
            ),
            Err(e) => warn!("simulator listening (address unavailable: {e})"),
        }

        loop {
            if !running.load(Ordering::Relaxed) {
                info!("shutdown flag set; stopping accept loop");
                break;
            }

            // Bounded wait so the shutdown flag is checked regularly.
            match timeout(ACCEPT_POLL, self.listener.accept()).await {
                Ok(Ok((stream, peer_addr))) => {
                    debug!("new TCP connection from {peer_addr}");
                    // Each session gets its own handle to the shared config
                    // and runs independently of the accept loop.
                    let cfg = Arc::clone(&self.config);
                    tokio::spawn(async move {
                        handle_session(stream, peer_addr, cfg).await;
                    });
                }
                Ok(Err(e)) => {
                    error!("accept error: {e}");
                }
                Err(_) => {
                    // No connection within the poll window; re-check the flag.
                }
            }
        }

        Ok(())
    }
}

/// Binds and serves in one call.
///
/// # Errors
///
/// See [`SimulatorServer::bind`].
pub async fn run_server(config: SimulatorConfig, running: Arc<AtomicBool>) -> anyhow::Result<()> {
    SimulatorServer::bind(config).await?.serve(running).await
}

/// Accepts the upgrade only when the request path equals `expected`.
///
/// The query string is not part of the comparison.
///
/// # Errors
///
/// Returns a `404 Not Found` response for any other path.
pub fn check_upgrade_path(expected: &str, request: &HandshakeRequest) -> Result<(), ErrorResponse> {
    let path = request.uri().path();
    if path == expected {
        return Ok(());
    }
    let mut response = ErrorResponse::new(Some(format!("no WebSocket endpoint at {path}")));
    *response.status_mut() = StatusCode::NOT_FOUND;
    Err(response)
}

// ── Per-session handler ───────────────────────────────────────────────────────

async fn handle_session(raw_stream: TcpStream, peer_addr: SocketAddr, config: Arc<SimulatorConfig>) {
    match run_session(raw_stream, peer_addr, config).await {
        Ok(()) => info!("session {peer_addr} closed"),
        Err(e) => warn!("session {peer_addr} ended with error: {e:#}"),
    }
}

async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<SimulatorConfig>,
) -> anyhow::Result<()> {
    // The handshake callback must be 'static, so it gets its own copy of the path.
    let expected = config.ws_path.clone();
    let ws_stream = accept_hdr_async(
        raw_stream,
        move |req: &HandshakeRequest,
              resp: HandshakeResponse|
              -> Result<HandshakeResponse, ErrorResponse> {
            check_upgrade_path(&expected, req)?;
            Ok(resp)
        },
    )
    .await
    .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    // Split so the reader loop and the writer task can each own one half.
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // Bounded queue shared by the timers and the request handler; the
    // writer below is its only consumer.
    let (out_tx, mut out_rx) = mpsc::channel::<ServerMessage>(config.outbound_queue);
    let connection = Connection::open(&config, out_tx);
    let conn_id = connection.id();
    info!(connection = %conn_id, "dashboard connected from {peer_addr}");

    // Fired once the reader is done, asking the writer to finish the close
    // handshake instead of draining more pushes.
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    // Sole owner of the sink: every outbound frame goes through here.
    let mut writer = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                _ = &mut stop_rx => break,
                msg = out_rx.recv() => {
                    let Some(msg) = msg else { break };
                    let text = match encode_message(&msg) {
                        Ok(t) => t,
                        Err(e) => {
                            error!(connection = %conn_id, "{e}");
                            continue;
                        }
                    };
                    if ws_tx.send(WsMessage::Text(text)).await.is_err() {
                        debug!(connection = %conn_id, "send failed (dashboard disconnected)");
                        break;
                    }
                }
            }
        }
        // Flushes the Close reply tungstenite queued when the peer's Close
        // frame was read, or starts the handshake from our side.
        if let Err(e) = ws_tx.close().await {
            debug!(connection = %conn_id, "close handshake not completed: {e}");
        }
    });

    // Whichever side stops first ends the session.
    let writer_done = tokio::select! {
        _ = &mut writer => {
            debug!(connection = %conn_id, "writer task ended");
            true
        }
        result = read_frames(&mut ws_rx, &connection) => {
            if let Err(e) = result {
                debug!("{e}");
            }
            false
        }
    };

    // Timers first, so nothing new is queued while the writer winds down.
    connection.close();
    if !writer_done {
        let _ = stop_tx.send(());
        // A peer that stopped reading must not hold the session open.
        if timeout(CLOSE_GRACE, &mut writer).await.is_err() {
            writer.abort();
        }
    }
    info!(connection = %conn_id, "dashboard disconnected");
    Ok(())
}

async fn read_frames(
    ws_rx: &mut SplitStream<WebSocketStream<TcpStream>>,
    connection: &Connection,
) -> Result<(), ChannelClosed> {
    let conn_id = connection.id();
    while let Some(frame) = ws_rx.next().await {
        let msg = match frame {
            Ok(msg) => msg,
            Err(WsError::ConnectionClosed | WsError::Protocol(_)) => {
                debug!(connection = %conn_id, "WebSocket closed");
                break;
            }
            Err(e) => {
                warn!(connection = %conn_id, "WebSocket error: {e}");
                break;
            }
        };

        match msg {
            WsMessage::Text(text) => connection.handle_text(&text).await?,
            WsMessage::Binary(data) => {
                warn!(
                    connection = %conn_id,
                    "unexpected binary frame ({} bytes, ignored)",
                    data.len()
                );
            }
            WsMessage::Close(_) => {
                debug!(connection = %conn_id, "Close frame received");
                break;
            }
            // tungstenite answers pings itself.
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {}
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

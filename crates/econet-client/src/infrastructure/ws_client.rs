//! WebSocket driver connecting a [`ClientStore`] to a device.
//!
//! ```text
//! device ──frames──> reader task ──ingest──> ClientStore ──StoreEvent──> subscribers
//!                         │
//!                         └─ responses ──resolve──> PendingRequests ──> DeviceClient::call
//! ```
//!
//! The reader task is the only consumer of the socket.  Requests are written
//! through a shared sink guarded by a `tokio::sync::Mutex`.

use std::sync::Arc;
use std::time::Duration;

use econet_proto::{
    decode_server_message, encode_message, ProtocolError, Request, RequestId, RequestIdCounter,
    RequestKind, Response,
};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::application::PendingRequests;
use crate::domain::{ClientStore, ConnectionState};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Default time to wait for a response.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur in the client driver.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The WebSocket handshake with the device failed.
    #[error("failed to connect to {url}: {source}")]
    ConnectFailed {
        url: String,
        #[source]
        source: WsError,
    },

    /// A request frame could not be written.
    #[error("failed to send request {id}: {source}")]
    SendFailed {
        id: RequestId,
        #[source]
        source: WsError,
    },

    /// A request could not be encoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// No response arrived in time.
    #[error("request {id} timed out after {after:?}")]
    Timeout { id: RequestId, after: Duration },

    /// The connection dropped before or while the request was outstanding.
    #[error("connection closed before request {id} was answered")]
    Disconnected { id: RequestId },

    /// [`DeviceClient::get`] was asked for a state-changing request kind.
    #[error("'{0}' is not a read request")]
    NotReadable(RequestKind),
}

/// A live connection to a device (or the simulator).
pub struct DeviceClient {
    store: Arc<Mutex<ClientStore>>,
    pending: Arc<Mutex<PendingRequests>>,
    ids: RequestIdCounter,
    sink: Mutex<SplitSink<WsStream, WsMessage>>,
    reader: JoinHandle<()>,
}

impl DeviceClient {
    /// Connects with a fresh store.
    ///
    /// # Errors
    ///
    /// [`ClientError::ConnectFailed`] if the handshake fails.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        Self::connect_with_store(url, Arc::new(Mutex::new(ClientStore::new()))).await
    }

    /// Connects and drives an existing store.
    ///
    /// Subscribe to the store before calling this to observe the
    /// `Connected` transition.
    pub async fn connect_with_store(
        url: &str,
        store: Arc<Mutex<ClientStore>>,
    ) -> Result<Self, ClientError> {
        store
            .lock()
            .await
            .set_connection_state(ConnectionState::Connecting);

        let ws = match connect_async(url).await {
            Ok((ws, _)) => ws,
            Err(source) => {
                store
                    .lock()
                    .await
                    .set_connection_state(ConnectionState::Disconnected);
                return Err(ClientError::ConnectFailed {
                    url: url.to_string(),
                    source,
                });
            }
        };
        info!("connected to {url}");
        store
            .lock()
            .await
            .set_connection_state(ConnectionState::Connected);

        let (sink, stream) = ws.split();
        let pending = Arc::new(Mutex::new(PendingRequests::new()));
        let reader = tokio::spawn(read_loop(stream, Arc::clone(&store), Arc::clone(&pending)));

        Ok(Self {
            store,
            pending,
            ids: RequestIdCounter::new(),
            sink: Mutex::new(sink),
            reader,
        })
    }

    /// The store this client feeds.
    pub fn store(&self) -> Arc<Mutex<ClientStore>> {
        Arc::clone(&self.store)
    }

    /// Sends the request built by `make` with a freshly allocated id and
    /// waits for its response.
    ///
    /// A refusal from the device is still `Ok`; inspect it with
    /// [`Response::outcome`].
    ///
    /// # Errors
    ///
    /// [`ClientError::Disconnected`] once the device has gone away, otherwise
    /// encoding, send or timeout failures.
    pub async fn call<F>(&self, make: F, timeout: Duration) -> Result<Response, ClientError>
    where
        F: FnOnce(RequestId) -> Request,
    {
        let request = make(self.ids.next());
        self.round_trip(request, timeout).await
    }

    /// Issues the `get_*` request for `kind`.
    ///
    /// # Errors
    ///
    /// [`ClientError::NotReadable`] for save/reboot kinds, otherwise as
    /// [`DeviceClient::call`].
    pub async fn get(&self, kind: RequestKind, timeout: Duration) -> Result<Response, ClientError> {
        let request = kind
            .get_request(self.ids.next())
            .ok_or(ClientError::NotReadable(kind))?;
        self.round_trip(request, timeout).await
    }

    /// Sends a Close frame and stops the reader.
    pub async fn close(self) {
        if let Err(e) = self.sink.lock().await.close().await {
            debug!("close handshake failed: {e}");
        }
        // The reader is aborted on drop before it can record the disconnect.
        self.store
            .lock()
            .await
            .set_connection_state(ConnectionState::Disconnected);
        self.pending.lock().await.cancel_all();
    }

    async fn round_trip(&self, request: Request, timeout: Duration) -> Result<Response, ClientError> {
        let id = request.id();
        // The reader records a dropped connection; don't write into a dead sink.
        if self.store.lock().await.connection_state() == ConnectionState::Disconnected {
            return Err(ClientError::Disconnected { id });
        }
        let text = encode_message(&request)?;
        let rx = self.pending.lock().await.register(id);
        debug!(id, kind = %request.kind(), "sending request");

        if let Err(source) = self.sink.lock().await.send(WsMessage::Text(text)).await {
            self.pending.lock().await.forget(id);
            return Err(ClientError::SendFailed { id, source });
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(ClientError::Disconnected { id }),
            Err(_) => {
                self.pending.lock().await.forget(id);
                Err(ClientError::Timeout { id, after: timeout })
            }
        }
    }
}

impl Drop for DeviceClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(
    mut stream: SplitStream<WsStream>,
    store: Arc<Mutex<ClientStore>>,
    pending: Arc<Mutex<PendingRequests>>,
) {
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(WsMessage::Text(text)) => text,
            Ok(WsMessage::Close(_)) => {
                debug!("device sent Close");
                break;
            }
            Ok(WsMessage::Binary(data)) => {
                warn!("unexpected binary frame ({} bytes, ignored)", data.len());
                continue;
            }
            Ok(_) => continue,
            Err(WsError::ConnectionClosed | WsError::Protocol(_)) => break,
            Err(e) => {
                warn!("WebSocket error: {e}");
                break;
            }
        };

        let msg = match decode_server_message(&text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("dropping malformed frame: {e}");
                continue;
            }
        };

        let response = store.lock().await.ingest(msg);
        if let Some(response) = response {
            pending.lock().await.resolve(response);
        }
    }

    info!("connection to device closed");
    store
        .lock()
        .await
        .set_connection_state(ConnectionState::Disconnected);
    pending.lock().await.cancel_all();
}

//! WebSocket transport implementation for MCP
//!
//! One JSON message per text frame; the wire format supports native
//! JSON-RPC batching (a frame may carry a single envelope or a batch array).
//! Server side is built on axum's `ws` feature, grounded on the same
//! accept/route shape as [`crate::http::server::HttpTransportServer`].
//! Client side uses `tokio-tungstenite`'s standard connect/split pattern.

use crate::{
    ConnectionState, Result, ServerTransport, ShutdownConfig, Transport, TransportError,
    TransportHealth,
};
use async_trait::async_trait;
use axum::{
    extract::ws::{Message as AxumMessage, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_tungstenite::tungstenite::Message as TungsteniteMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use mcprs_core::protocol::JsonRpcMessage;

/// Client-side WebSocket transport: one socket, one session.
pub struct WebSocketTransport {
    sink: futures_util::stream::SplitSink<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
        TungsteniteMessage,
    >,
    stream: futures_util::stream::SplitStream<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
    >,
    health: TransportHealth,
    connected_at: Option<std::time::SystemTime>,
}

impl WebSocketTransport {
    /// Connect to a WebSocket MCP server at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws_stream, _response) =
            tokio_tungstenite::connect_async(url)
                .await
                .map_err(|e| TransportError::ConnectionError {
                    message: format!("Failed to connect to {url}: {e}"),
                })?;
        let (sink, stream) = ws_stream.split();
        Ok(Self {
            sink,
            stream,
            health: TransportHealth {
                state: ConnectionState::Connected,
                ..Default::default()
            },
            connected_at: Some(std::time::SystemTime::now()),
        })
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send_message(&mut self, message: JsonRpcMessage) -> Result<()> {
        let json_str = serde_json::to_string(&message).map_err(|e| TransportError::SerializationError {
            message: format!("Failed to serialize message: {e}"),
        })?;
        self.sink
            .send(TungsteniteMessage::Text(json_str.into()))
            .await
            .map_err(|e| {
                self.health.error_count += 1;
                self.health.state = ConnectionState::Failed(format!("send failed: {e}"));
                TransportError::NetworkError {
                    message: format!("Failed to send frame: {e}"),
                }
            })?;
        self.health.messages_sent += 1;
        self.health.last_activity = Some(std::time::SystemTime::now());
        Ok(())
    }

    async fn receive_message(&mut self) -> Result<JsonRpcMessage> {
        loop {
            match self.stream.next().await {
                Some(Ok(TungsteniteMessage::Text(text))) => {
                    let message: JsonRpcMessage =
                        serde_json::from_str(&text).map_err(|e| {
                            self.health.error_count += 1;
                            TransportError::SerializationError {
                                message: format!("Failed to parse JSON frame: {e}"),
                            }
                        })?;
                    self.health.messages_received += 1;
                    self.health.last_activity = Some(std::time::SystemTime::now());
                    return Ok(message);
                }
                Some(Ok(TungsteniteMessage::Ping(_))) | Some(Ok(TungsteniteMessage::Pong(_))) => {
                    continue;
                }
                Some(Ok(TungsteniteMessage::Close(_))) | None => {
                    self.health.state = ConnectionState::Disconnected;
                    return Err(TransportError::ConnectionClosed);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    self.health.error_count += 1;
                    return Err(TransportError::NetworkError {
                        message: format!("WebSocket read error: {e}"),
                    });
                }
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.health.state = ConnectionState::Disconnected;
        let _ = self.sink.close().await;
        debug!("WebSocket transport closed");
        Ok(())
    }

    fn get_state(&self) -> ConnectionState {
        self.health.state.clone()
    }

    fn get_health(&self) -> TransportHealth {
        let mut health = self.health.clone();
        if let Some(connected_at) = self.connected_at {
            health.connection_duration = connected_at.elapsed().ok();
        }
        health
    }

    async fn shutdown(&mut self, _config: ShutdownConfig) -> Result<()> {
        self.health.state = ConnectionState::ShuttingDown;
        self.close().await
    }

    async fn force_shutdown(&mut self) -> Result<()> {
        self.close().await
    }

    async fn reset(&mut self) -> Result<()> {
        Ok(())
    }
}

struct WsSession {
    outbound: mpsc::Sender<JsonRpcMessage>,
    cancel: CancellationToken,
}

/// Server-side WebSocket transport built on axum. One session per accepted
/// upgrade; inbound frames surface through `take_inbound`.
#[derive(Clone)]
pub struct WebSocketServerTransport {
    addr: std::net::SocketAddr,
    sessions: Arc<RwLock<HashMap<String, Arc<WsSession>>>>,
    inbound_tx: mpsc::Sender<(String, JsonRpcMessage)>,
    inbound_rx: Arc<Mutex<Option<mpsc::Receiver<(String, JsonRpcMessage)>>>>,
    root_cancel: CancellationToken,
}

impl WebSocketServerTransport {
    pub fn new(addr: std::net::SocketAddr) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(1024);
        Self {
            addr,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            inbound_tx,
            inbound_rx: Arc::new(Mutex::new(Some(inbound_rx))),
            root_cancel: CancellationToken::new(),
        }
    }

    pub async fn take_inbound(&self) -> Option<mpsc::Receiver<(String, JsonRpcMessage)>> {
        self.inbound_rx.lock().await.take()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/mcp/ws", get(handle_upgrade))
            .with_state(self.clone())
    }
}

async fn handle_upgrade(
    State(state): State<WebSocketServerTransport>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

async fn handle_socket(state: WebSocketServerTransport, socket: WebSocket) {
    let session_id = uuid::Uuid::new_v4().to_string();
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<JsonRpcMessage>(256);
    let cancel = state.root_cancel.child_token();

    let session = Arc::new(WsSession {
        outbound: outbound_tx,
        cancel: cancel.clone(),
    });
    state
        .sessions
        .write()
        .await
        .insert(session_id.clone(), session);
    info!("WebSocket session {} connected", session_id);

    let writer_cancel = cancel.clone();
    let writer_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = writer_cancel.cancelled() => break,
                msg = outbound_rx.recv() => {
                    match msg {
                        Some(message) => {
                            let Ok(json_str) = serde_json::to_string(&message) else { continue };
                            if ws_tx.send(AxumMessage::Text(json_str.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }
    });

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(AxumMessage::Text(text))) => {
                        match serde_json::from_str::<JsonRpcMessage>(&text) {
                            Ok(message) => {
                                if state.inbound_tx.send((session_id.clone(), message)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!("Dropping unparseable WS frame on session {}: {}", session_id, e),
                        }
                    }
                    Some(Ok(AxumMessage::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        error!("WebSocket read error on session {}: {}", session_id, e);
                        break;
                    }
                }
            }
        }
    }

    writer_task.abort();
    state.sessions.write().await.remove(&session_id);
    debug!("WebSocket session {} disconnected", session_id);
}

#[async_trait]
impl ServerTransport for WebSocketServerTransport {
    async fn start(&self) -> Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| TransportError::InitializationError {
                message: format!("Failed to bind WebSocket listener on {}: {}", self.addr, e),
            })?;
        info!("WebSocket server transport listening on {}", self.addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                error!("WebSocket server failed: {}", e);
            }
        });
        Ok(())
    }

    async fn send_message(&self, session_id: &str, message: JsonRpcMessage) -> Result<()> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(session_id)
            .ok_or_else(|| TransportError::ConnectionError {
                message: format!("unknown session {session_id}"),
            })?
            .clone();
        drop(sessions);
        session
            .outbound
            .send(message)
            .await
            .map_err(|_| TransportError::ConnectionError {
                message: format!("session {session_id} writer gone"),
            })
    }

    async fn disconnect(&self, session_id: &str, reason: &str) -> Result<()> {
        if let Some(session) = self.sessions.write().await.remove(session_id) {
            session.cancel.cancel();
            debug!("Disconnected WebSocket session {}: {}", session_id, reason);
        }
        Ok(())
    }

    fn get_session_context(&self, session_id: &str) -> Option<CancellationToken> {
        let sessions = self.sessions.try_read().ok()?;
        sessions.get(session_id).map(|s| s.cancel.clone())
    }

    async fn stop(&self, config: ShutdownConfig) -> Result<()> {
        self.root_cancel.cancel();
        tokio::time::sleep(config.grace_period.min(std::time::Duration::from_millis(50))).await;
        self.sessions.write().await.clear();
        info!("WebSocket server transport stopped");
        Ok(())
    }
}

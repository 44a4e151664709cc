//! TCP transport implementation for MCP
//!
//! Newline-delimited JSON over a single TCP socket. The client half
//! (`TcpTransport`) implements [`Transport`] and models one already-connected
//! socket, mirroring [`crate::stdio::StdioTransport`]'s framing loop. The
//! server half (`TcpServerTransport`) accepts many connections, assigning one
//! session per accepted socket, and implements [`ServerTransport`] so the
//! engine can address sessions by id.

use crate::{
    ConnectionState, Result, ServerTransport, ShutdownConfig, Transport, TransportError,
    TransportHealth,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};
use mcprs_core::protocol::JsonRpcMessage;

/// Client-side TCP transport: one socket, one session.
pub struct TcpTransport {
    reader: BufReader<tokio::net::tcp::OwnedReadHalf>,
    writer: BufWriter<tokio::net::tcp::OwnedWriteHalf>,
    health: TransportHealth,
    connected_at: Option<std::time::SystemTime>,
}

impl TcpTransport {
    /// Connect to a TCP MCP server at `addr`.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| TransportError::ConnectionError {
                message: format!("Failed to connect to {addr}: {e}"),
            })?;
        Ok(Self::from_stream(stream))
    }

    fn from_stream(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            health: TransportHealth {
                state: ConnectionState::Connected,
                ..Default::default()
            },
            connected_at: Some(std::time::SystemTime::now()),
        }
    }

    fn update_connection_duration(&mut self) {
        if let Some(connected_at) = self.connected_at {
            self.health.connection_duration = connected_at.elapsed().ok();
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send_message(&mut self, message: JsonRpcMessage) -> Result<()> {
        if !matches!(self.health.state, ConnectionState::Connected) {
            return Err(TransportError::ConnectionError {
                message: "transport not connected".to_string(),
            });
        }

        let json_str = serde_json::to_string(&message).map_err(|e| {
            self.health.error_count += 1;
            TransportError::SerializationError {
                message: format!("Failed to serialize message: {e}"),
            }
        })?;

        trace!("Sending message: {}", json_str);

        self.writer
            .write_all(json_str.as_bytes())
            .await
            .map_err(|e| {
                self.health.error_count += 1;
                self.health.state = ConnectionState::Failed(format!("write failed: {e}"));
                TransportError::NetworkError {
                    message: format!("Failed to write message: {e}"),
                }
            })?;
        self.writer.write_all(b"\n").await.map_err(|e| {
            self.health.state = ConnectionState::Failed(format!("write failed: {e}"));
            TransportError::NetworkError {
                message: format!("Failed to write newline: {e}"),
            }
        })?;
        self.writer.flush().await.map_err(|e| {
            self.health.state = ConnectionState::Failed(format!("flush failed: {e}"));
            TransportError::NetworkError {
                message: format!("Failed to flush socket: {e}"),
            }
        })?;

        self.health.messages_sent += 1;
        self.health.last_activity = Some(std::time::SystemTime::now());
        self.update_connection_duration();
        Ok(())
    }

    async fn receive_message(&mut self) -> Result<JsonRpcMessage> {
        if !matches!(self.health.state, ConnectionState::Connected) {
            return Err(TransportError::ConnectionError {
                message: "transport not connected".to_string(),
            });
        }

        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line).await.map_err(|e| {
            self.health.error_count += 1;
            TransportError::NetworkError {
                message: format!("Failed to read from socket: {e}"),
            }
        })?;

        if bytes_read == 0 {
            self.health.state = ConnectionState::Disconnected;
            return Err(TransportError::ConnectionClosed);
        }

        let message_str = line.trim_end();
        if message_str.is_empty() {
            self.health.error_count += 1;
            return Err(TransportError::SerializationError {
                message: "received empty message".to_string(),
            });
        }

        let message: JsonRpcMessage =
            serde_json::from_str(message_str).map_err(|e| {
                self.health.error_count += 1;
                TransportError::SerializationError {
                    message: format!("Failed to parse JSON message: {e}"),
                }
            })?;

        self.health.messages_received += 1;
        self.health.last_activity = Some(std::time::SystemTime::now());
        self.update_connection_duration();
        Ok(message)
    }

    async fn close(&mut self) -> Result<()> {
        self.health.state = ConnectionState::Disconnected;
        let _ = self.writer.shutdown().await;
        debug!("TCP transport closed");
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
        self.health = TransportHealth {
            state: ConnectionState::Connected,
            ..Default::default()
        };
        self.connected_at = Some(std::time::SystemTime::now());
        Ok(())
    }
}

struct TcpSession {
    writer: Mutex<BufWriter<tokio::net::tcp::OwnedWriteHalf>>,
    cancel: CancellationToken,
}

/// Server-side TCP transport: accepts connections on `addr`, one session per
/// accepted socket. Inbound frames are pushed to `inbound_rx` as
/// `(session_id, JsonRpcMessage)`; outbound sends are addressed by session id
/// via `send_message`.
pub struct TcpServerTransport {
    addr: SocketAddr,
    sessions: Arc<RwLock<HashMap<String, Arc<TcpSession>>>>,
    inbound_tx: mpsc::Sender<(String, JsonRpcMessage)>,
    inbound_rx: Mutex<Option<mpsc::Receiver<(String, JsonRpcMessage)>>>,
    root_cancel: CancellationToken,
}

impl TcpServerTransport {
    pub fn new(addr: SocketAddr) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(1024);
        Self {
            addr,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            inbound_tx,
            inbound_rx: Mutex::new(Some(inbound_rx)),
            root_cancel: CancellationToken::new(),
        }
    }

    /// Take the inbound message stream. May only be called once; the engine
    /// owns the receiver for the lifetime of the transport.
    pub async fn take_inbound(&self) -> Option<mpsc::Receiver<(String, JsonRpcMessage)>> {
        self.inbound_rx.lock().await.take()
    }

    async fn accept_loop(self: Arc<Self>, listener: TcpListener) {
        loop {
            tokio::select! {
                _ = self.root_cancel.cancelled() => {
                    info!("TCP server transport stopping accept loop");
                    break;
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let session_id = uuid::Uuid::new_v4().to_string();
                            info!("Accepted TCP connection from {} as session {}", peer, session_id);
                            self.clone().spawn_session(session_id, stream);
                        }
                        Err(e) => {
                            error!("TCP accept failed: {}", e);
                        }
                    }
                }
            }
        }
    }

    fn spawn_session(self: Arc<Self>, session_id: String, stream: TcpStream) {
        let (read_half, write_half) = stream.into_split();
        let cancel = self.root_cancel.child_token();
        let session = Arc::new(TcpSession {
            writer: Mutex::new(BufWriter::new(write_half)),
            cancel: cancel.clone(),
        });

        tokio::spawn({
            let sessions = self.sessions.clone();
            let session_id = session_id.clone();
            let session = session.clone();
            async move {
                sessions.write().await.insert(session_id, session);
            }
        });

        let inbound_tx = self.inbound_tx.clone();
        let sessions = self.sessions.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            loop {
                let mut line = String::new();
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    read = reader.read_line(&mut line) => {
                        match read {
                            Ok(0) => {
                                debug!("TCP session {} closed by peer", session_id);
                                break;
                            }
                            Ok(_) => {
                                let trimmed = line.trim_end();
                                if trimmed.is_empty() {
                                    continue;
                                }
                                match serde_json::from_str::<JsonRpcMessage>(trimmed) {
                                    Ok(message) => {
                                        if inbound_tx.send((session_id.clone(), message)).await.is_err() {
                                            break;
                                        }
                                    }
                                    Err(e) => {
                                        warn!("Dropping unparseable frame on session {}: {}", session_id, e);
                                    }
                                }
                            }
                            Err(e) => {
                                error!("TCP read error on session {}: {}", session_id, e);
                                break;
                            }
                        }
                    }
                }
            }
            sessions.write().await.remove(&session_id);
        });
    }
}

#[async_trait]
impl ServerTransport for TcpServerTransport {
    async fn start(&self) -> Result<()> {
        let listener =
            TcpListener::bind(self.addr)
                .await
                .map_err(|e| TransportError::InitializationError {
                    message: format!("Failed to bind TCP listener on {}: {}", self.addr, e),
                })?;
        info!("TCP server transport listening on {}", self.addr);

        // Constructing this with `Arc::new(self_clone)` is not possible from
        // `&self`; callers are expected to hold the transport behind an
        // `Arc` and call `start` through it (see `McpServerRuntime::run_tcp`).
        let sessions = self.sessions.clone();
        let inbound_tx = self.inbound_tx.clone();
        let root_cancel = self.root_cancel.clone();
        let addr = self.addr;
        let accept_state = Arc::new(TcpServerTransport {
            addr,
            sessions,
            inbound_tx,
            inbound_rx: Mutex::new(None),
            root_cancel,
        });
        tokio::spawn(accept_state.accept_loop(listener));
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

        let json_str = serde_json::to_string(&message).map_err(|e| TransportError::SerializationError {
            message: format!("Failed to serialize message: {e}"),
        })?;

        let mut writer = session.writer.lock().await;
        writer
            .write_all(json_str.as_bytes())
            .await
            .map_err(|e| TransportError::NetworkError {
                message: format!("write failed for session {session_id}: {e}"),
            })?;
        writer.write_all(b"\n").await.map_err(|e| TransportError::NetworkError {
            message: format!("write failed for session {session_id}: {e}"),
        })?;
        writer.flush().await.map_err(|e| TransportError::NetworkError {
            message: format!("flush failed for session {session_id}: {e}"),
        })
    }

    async fn disconnect(&self, session_id: &str, reason: &str) -> Result<()> {
        if let Some(session) = self.sessions.write().await.remove(session_id) {
            session.cancel.cancel();
            debug!("Disconnected TCP session {}: {}", session_id, reason);
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
        info!("TCP server transport stopped");
        Ok(())
    }
}

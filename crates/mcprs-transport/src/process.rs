//! Transport over a managed child process's stdio pipes.
//!
//! Framing matches [`crate::stdio`]: newline-delimited JSON written to the
//! child's stdin, read back line by line from its stdout. The child's stderr
//! is left connected to this process's stderr so server logs surface where
//! an operator would expect them.

use crate::{ConnectionState, Result, Transport, TransportError, TransportHealth};
use async_trait::async_trait;
use mcprs_core::protocol::JsonRpcMessage;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tracing::{debug, trace, warn};

/// Transport that talks to a spawned MCP server over its stdin/stdout pipes.
pub struct ChildProcessTransport {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    health: TransportHealth,
    connected_at: Option<std::time::SystemTime>,
}

impl ChildProcessTransport {
    /// Take ownership of a spawned child's stdio pipes. The child must have
    /// been spawned with `stdin(Stdio::piped())` and `stdout(Stdio::piped())`.
    pub fn new(mut child: Child) -> Result<Self> {
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::InitializationError {
                message: "child process has no stdin pipe".to_string(),
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::InitializationError {
                message: "child process has no stdout pipe".to_string(),
            })?;

        Ok(Self {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
            health: TransportHealth {
                state: ConnectionState::Connected,
                ..Default::default()
            },
            connected_at: Some(std::time::SystemTime::now()),
        })
    }

    /// The child's OS process id, if it's still running.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Send SIGKILL (or the platform equivalent) to the child immediately.
    pub async fn kill(&mut self) -> Result<()> {
        self.child
            .kill()
            .await
            .map_err(|e| TransportError::InternalError {
                message: format!("failed to kill child process: {e}"),
            })
    }
}

#[async_trait]
impl Transport for ChildProcessTransport {
    async fn send_message(&mut self, message: JsonRpcMessage) -> Result<()> {
        let json_str =
            serde_json::to_string(&message).map_err(|e| TransportError::SerializationError {
                message: format!("Failed to serialize message: {e}"),
            })?;

        trace!("Sending message to child process: {}", json_str);

        self.stdin
            .write_all(json_str.as_bytes())
            .await
            .map_err(|e| {
                self.health.error_count += 1;
                self.health.state = ConnectionState::Failed(format!("write failed: {e}"));
                TransportError::NetworkError {
                    message: format!("Failed to write to child stdin: {e}"),
                }
            })?;
        self.stdin.write_all(b"\n").await.map_err(|e| {
            self.health.error_count += 1;
            TransportError::NetworkError {
                message: format!("Failed to write newline to child stdin: {e}"),
            }
        })?;
        self.stdin.flush().await.map_err(|e| {
            self.health.error_count += 1;
            TransportError::NetworkError {
                message: format!("Failed to flush child stdin: {e}"),
            }
        })?;

        self.health.messages_sent += 1;
        self.health.last_activity = Some(std::time::SystemTime::now());
        Ok(())
    }

    async fn receive_message(&mut self) -> Result<JsonRpcMessage> {
        let mut line = String::new();
        let bytes_read = self.stdout.read_line(&mut line).await.map_err(|e| {
            self.health.error_count += 1;
            TransportError::NetworkError {
                message: format!("Failed to read from child stdout: {e}"),
            }
        })?;

        if bytes_read == 0 {
            self.health.state = ConnectionState::Disconnected;
            return Err(TransportError::ConnectionClosed);
        }

        let message_str = line.trim_end();
        if message_str.is_empty() {
            return Err(TransportError::SerializationError {
                message: "Received empty line from child process".to_string(),
            });
        }

        let message: JsonRpcMessage = serde_json::from_str(message_str).map_err(|e| {
            self.health.error_count += 1;
            TransportError::SerializationError {
                message: format!("Failed to parse JSON from child process: {e}"),
            }
        })?;

        self.health.messages_received += 1;
        self.health.last_activity = Some(std::time::SystemTime::now());
        Ok(message)
    }

    async fn close(&mut self) -> Result<()> {
        self.health.state = ConnectionState::Disconnected;
        let _ = self.stdin.shutdown().await;
        debug!("Child process transport closed (pid {:?})", self.child.id());
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

    async fn shutdown(&mut self, config: crate::ShutdownConfig) -> Result<()> {
        self.health.state = ConnectionState::ShuttingDown;
        self.close().await?;
        match tokio::time::timeout(config.grace_period, self.child.wait()).await {
            Ok(Ok(status)) => {
                debug!("Child process exited: {}", status);
            }
            Ok(Err(e)) => warn!("Error waiting for child process exit: {}", e),
            Err(_) => {
                warn!("Child process did not exit within grace period, killing");
                let _ = self.kill().await;
            }
        }
        Ok(())
    }

    async fn force_shutdown(&mut self) -> Result<()> {
        self.kill().await
    }

    async fn reset(&mut self) -> Result<()> {
        self.health = TransportHealth::default();
        self.health.state = ConnectionState::Connected;
        self.connected_at = Some(std::time::SystemTime::now());
        Ok(())
    }
}

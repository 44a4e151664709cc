//! Managed subprocess registry.
//!
//! Mirrors the `mcpServers` configuration block used by MCP hosts: each
//! named entry describes a command to spawn as a child MCP server,
//! communicating over its stdio pipes. `${NAME}` references inside `env`
//! values are expanded from this process's own environment at spawn time.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::sync::RwLock;
use tracing::{info, warn};

use mcprs_core::{
    error::{MCPError, MCPResult},
    protocol::capabilities::ClientCapabilities,
    types::client::ClientInfo,
};
use mcprs_transport::ChildProcessTransport;

use crate::McpClientRuntime;

/// One `mcpServers` entry: how to launch a single managed server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// The `{"mcpServers": {...}}` document a host's config file carries.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct McpServersConfig {
    #[serde(rename = "mcpServers", default)]
    pub mcp_servers: HashMap<String, McpServerConfig>,
}

/// Expand `${NAME}` references in `value` using this process's environment.
/// Unset variables expand to the empty string.
fn expand_env_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            for c2 in chars.by_ref() {
                if c2 == '}' {
                    break;
                }
                name.push(c2);
            }
            result.push_str(&std::env::var(&name).unwrap_or_default());
        } else {
            result.push(c);
        }
    }
    result
}

/// A single running managed server: its client runtime plus the order it
/// was started in, so `stop_all` can tear down in reverse (LIFO).
struct ManagedServer {
    client: Arc<McpClientRuntime>,
    order: usize,
}

/// Spawns and tracks managed MCP server subprocesses declared in an
/// `mcpServers` config block.
pub struct McpServerRegistry {
    servers: RwLock<HashMap<String, ManagedServer>>,
    next_order: std::sync::atomic::AtomicUsize,
}

impl Default for McpServerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl McpServerRegistry {
    pub fn new() -> Self {
        Self {
            servers: RwLock::new(HashMap::new()),
            next_order: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Spawn every server named in `config` that isn't already running,
    /// initializing each as an MCP client over its stdio pipes.
    pub async fn start_all(
        &self,
        config: &McpServersConfig,
        client_info: ClientInfo,
        capabilities: ClientCapabilities,
    ) -> MCPResult<()> {
        for (name, server_config) in &config.mcp_servers {
            self.start(name, server_config, client_info.clone(), capabilities.clone())
                .await?;
        }
        Ok(())
    }

    /// Spawn a single named server and initialize it as an MCP client.
    pub async fn start(
        &self,
        name: &str,
        server_config: &McpServerConfig,
        client_info: ClientInfo,
        capabilities: ClientCapabilities,
    ) -> MCPResult<Arc<McpClientRuntime>> {
        if let Some(existing) = self.servers.read().await.get(name) {
            return Ok(existing.client.clone());
        }

        info!("Spawning managed MCP server '{}': {}", name, server_config.command);

        let mut command = Command::new(&server_config.command);
        command
            .args(&server_config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        for (key, value) in &server_config.env {
            command.env(key, expand_env_value(value));
        }

        let child = command
            .spawn()
            .map_err(|e| MCPError::internal_error(format!("Failed to spawn '{name}': {e}")))?;

        let transport = ChildProcessTransport::new(child)
            .map_err(|e| MCPError::internal_error(format!("Failed to attach to '{name}': {e}")))?;

        let client = Arc::new(McpClientRuntime::new(client_info, capabilities));
        client
            .connect_with_transport(Box::new(transport))
            .await
            .map_err(|e| MCPError::internal_error(format!("Failed to initialize '{name}': {e}")))?;

        let order = self
            .next_order
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.servers.write().await.insert(
            name.to_string(),
            ManagedServer {
                client: client.clone(),
                order,
            },
        );

        Ok(client)
    }

    /// Look up a running managed server's client by name.
    pub async fn get(&self, name: &str) -> Option<Arc<McpClientRuntime>> {
        self.servers.read().await.get(name).map(|s| s.client.clone())
    }

    /// Stop a single managed server.
    pub async fn stop(&self, name: &str) -> MCPResult<()> {
        if let Some(server) = self.servers.write().await.remove(name) {
            server.client.disconnect().await?;
            info!("Stopped managed MCP server '{}'", name);
        }
        Ok(())
    }

    /// Stop every managed server in LIFO order (most recently started
    /// first), matching the `mcpServers` teardown order hosts expect.
    pub async fn stop_all(&self) {
        let mut entries: Vec<(String, usize)> = {
            let servers = self.servers.read().await;
            servers.iter().map(|(name, s)| (name.clone(), s.order)).collect()
        };
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        for (name, _) in entries {
            if let Err(e) = self.stop(&name).await {
                warn!("Error stopping managed server '{}': {}", name, e);
            }
        }
    }

    /// Names of currently running managed servers.
    pub async fn running(&self) -> Vec<String> {
        self.servers.read().await.keys().cloned().collect()
    }
}

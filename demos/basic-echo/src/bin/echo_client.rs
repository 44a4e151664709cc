//! Spawns `echo-server` as a managed subprocess, calls its `echo` tool, reads
//! its static resource, then tears the child down.
//!
//! Usage: `echo-client [path-to-echo-server-binary]`. Defaults to
//! `echo-server`, which must be reachable on `PATH` (e.g. via
//! `cargo build` placing both binaries in the same `target/<profile>` dir).

use std::collections::HashMap;

use mcprs_core::{
    protocol::capabilities::ClientCapabilities,
    types::{client::ClientInfo, resources::ReadResourceRequest, tools::ToolCall},
};
use mcprs_client::{McpServerConfig, McpServerRegistry, McpServersConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let server_bin = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "echo-server".to_string());

    let mut mcp_servers = HashMap::new();
    mcp_servers.insert(
        "basic-echo".to_string(),
        McpServerConfig {
            command: server_bin,
            args: vec![],
            env: HashMap::new(),
        },
    );
    let config = McpServersConfig {
        mcp_servers,
    };

    let registry = McpServerRegistry::new();
    registry
        .start_all(
            &config,
            ClientInfo::default(),
            ClientCapabilities::default(),
        )
        .await?;

    let client = registry
        .get("basic-echo")
        .await
        .expect("basic-echo was just started");

    let tools = client.list_tools().await?;
    println!("server advertises {} tool(s):", tools.len());
    for tool in &tools {
        println!("  - {} : {}", tool.name, tool.description);
    }

    let result = client
        .call_tool(ToolCall {
            name: "echo".to_string(),
            arguments: Some(serde_json::json!({"message": "hello from echo-client"})),
        })
        .await?;
    println!("echo tool replied: {result:?}");

    let resource = client
        .read_resource(ReadResourceRequest {
            uri: "echo://greeting".to_string(),
            ..Default::default()
        })
        .await?;
    println!("greeting resource: {resource:?}");

    registry.stop_all().await;
    Ok(())
}

//! Minimal MCP server over stdio: one "echo" tool, one static resource.
//!
//! Run directly (`echo-server`) or let `echo-client` spawn it as a managed
//! subprocess over its own stdio pipes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use mcprs_core::{
    error::{MCPError, MCPResult},
    protocol::capabilities::{ServerCapabilities, ToolsCapability},
    types::{
        resources::{
            ListResourceTemplatesRequest, ListResourceTemplatesResponse, ListResourcesRequest,
            ListResourcesResponse, ReadResourceRequest, ReadResourceResponse, Resource,
            ResourceContent,
        },
        server::ServerInfo,
        tools::{ListToolsRequest, ListToolsResponse, Tool, ToolCall, ToolContent, ToolResult},
    },
};
use mcprs_server::{Context, McpServerRuntime, ResourceHandler, ToolHandler};

const GREETING_URI: &str = "echo://greeting";

struct EchoToolHandler;

#[async_trait]
impl ToolHandler for EchoToolHandler {
    async fn handle_tool_call(&self, call: ToolCall, _ctx: Context) -> MCPResult<ToolResult> {
        match call.name.as_str() {
            "echo" => {
                let message = call
                    .arguments
                    .as_ref()
                    .and_then(|args| args.get("message"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("Hello, World!");
                Ok(ToolResult {
                    content: vec![ToolContent::text(message.to_string())],
                    is_error: Some(false),
                })
            }
            other => Err(MCPError::method_not_found(format!(
                "unknown tool: {other}"
            ))),
        }
    }

    async fn list_tools(&self, _request: ListToolsRequest) -> MCPResult<ListToolsResponse> {
        Ok(ListToolsResponse {
            tools: vec![Tool {
                name: "echo".to_string(),
                description: "Echo a message back unchanged".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "message": {"type": "string", "default": "Hello, World!"}
                    }
                }),
                output_schema: None,
                annotations: None,
            }],
            next_cursor: None,
        })
    }
}

struct GreetingResourceHandler;

#[async_trait]
impl ResourceHandler for GreetingResourceHandler {
    async fn read_resource(
        &self,
        request: ReadResourceRequest,
    ) -> MCPResult<ReadResourceResponse> {
        if request.uri != GREETING_URI {
            return Err(MCPError::not_found(format!(
                "unknown resource: {}",
                request.uri
            )));
        }
        Ok(ReadResourceResponse {
            contents: vec![ResourceContent::text(
                GREETING_URI.to_string(),
                "Hello from the mcprs basic-echo demo server.".to_string(),
            )],
        })
    }

    async fn list_resources(
        &self,
        _request: ListResourcesRequest,
    ) -> MCPResult<ListResourcesResponse> {
        Ok(ListResourcesResponse {
            resources: vec![Resource {
                uri: GREETING_URI.to_string(),
                name: "greeting".to_string(),
                description: Some("A static greeting message".to_string()),
                mime_type: Some("text/plain".to_string()),
            }],
            next_cursor: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: ListResourceTemplatesRequest,
    ) -> MCPResult<ListResourceTemplatesResponse> {
        Ok(ListResourceTemplatesResponse {
            resource_templates: vec![],
            next_cursor: None,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let server_info = ServerInfo::new("basic-echo-server".to_string(), "0.1.0".to_string())
        .with_description("mcprs demo: echoes tool calls and serves a static resource".to_string());

    let capabilities = ServerCapabilities {
        tools: Some(ToolsCapability {
            list_changed: Some(false),
        }),
        ..Default::default()
    };

    let server = McpServerRuntime::new(server_info, capabilities)
        .with_tool_handler(Arc::new(EchoToolHandler))
        .with_resource_handler(Arc::new(GreetingResourceHandler));

    server.run_stdio().await?;
    Ok(())
}

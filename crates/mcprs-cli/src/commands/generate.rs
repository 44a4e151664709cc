use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::*;

/// Generate project scaffolding
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// What to generate
    #[arg(value_name = "TYPE")]
    pub generate_type: String,

    /// Name for the generated item
    #[arg(short, long)]
    pub name: Option<String>,

    /// Template to use
    #[arg(short, long)]
    pub template: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

pub async fn execute(args: GenerateArgs, _config: Option<Config>) -> Result<()> {
    println!("{}", "Generating project scaffolding...".green().bold());

    match args.generate_type.as_str() {
        "tool" => generate_tool(&args).await,
        "resource" => generate_resource(&args).await,
        "client" => generate_client(&args).await,
        "server" => generate_server(&args).await,
        _ => {
            anyhow::bail!("Unknown generation type: {}", args.generate_type);
        }
    }
}

async fn generate_tool(args: &GenerateArgs) -> Result<()> {
    let tool_name = args
        .name
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Tool name is required for tool generation"))?;

    println!("🔧 Generating tool: {tool_name}");

    // Create tools directory if it doesn't exist
    std::fs::create_dir_all("src/tools").context("Failed to create src/tools directory")?;

    let snake_case_name = tool_name.to_lowercase().replace('-', "_");
    let pascal_case_name = snake_case_name
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
            }
        })
        .collect::<String>();

    let tool_template = format!(
        r#"//! {tool_name} tool implementation

use serde::{{Deserialize, Serialize}};
use mcprs::prelude::*;

/// Request structure for the {tool_name} tool
#[derive(Debug, Deserialize)]
pub struct {pascal_case_name}Request {{
    /// Input message for the tool
    pub message: String,
    /// Optional configuration parameters
    pub options: Option<{pascal_case_name}Options>,
}}

/// Optional configuration for the {tool_name} tool
#[derive(Debug, Deserialize)]
pub struct {pascal_case_name}Options {{
    /// Enable verbose output
    pub verbose: Option<bool>,
    /// Custom formatting options
    pub format: Option<String>,
}}

/// Response structure for the {tool_name} tool
#[derive(Debug, Serialize)]
pub struct {pascal_case_name}Response {{
    /// The result of the tool execution
    pub result: String,
    /// Execution metadata
    pub metadata: {pascal_case_name}Metadata,
}}

/// Metadata for tool execution
#[derive(Debug, Serialize)]
pub struct {pascal_case_name}Metadata {{
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Number of operations performed
    pub operations_count: usize,
}}

/// Main handler function for the {tool_name} tool
pub async fn {snake_case_name}(
    req: {pascal_case_name}Request,
    ctx: Context,
) -> Result<{pascal_case_name}Response, Box<dyn std::error::Error + Send + Sync>> {{
    let start_time = std::time::Instant::now();
    
    // Log the incoming request
    ctx.log_info(&format!("Processing {tool_name} request: {{}}", req.message)).await?;
    
    // Process the request based on options
    let verbose = req.options.as_ref()
        .and_then(|opts| opts.verbose)
        .unwrap_or(false);
    
    if verbose {{
        ctx.log_info("Verbose mode enabled").await?;
    }}
    
    // Implement your actual tool logic here
    let result = match req.message.as_str() {{
        "" => return Err(anyhow::anyhow!("Message cannot be empty")),
        msg if msg.len() > 1000 => return Err(anyhow::anyhow!("Message too long (max 1000 characters)")),
        msg => {{
            // Add your custom processing logic here
            let processed = if let Some(options) = &req.options {{
                if options.verbose.unwrap_or(false) {{
                    format!("[VERBOSE] Processed: {{}}", msg)
                }} else {{
                    format!("Processed: {{}}", msg)
                }}
            }} else {{
                format!("Processed: {{}}", msg)
            }};
            
            // Apply format if specified
            if let Some(options) = &req.options {{
                if let Some(format) = &options.format {{
                    match format.as_str() {{
                        "json" => serde_json::to_string_pretty(&serde_json::json!({{
                            "result": processed,
                            "timestamp": chrono::Utc::now().to_rfc3339()
                        }}))?,
                        "xml" => format!("<result>{{}}</result>", processed),
                        _ => processed
                    }}
                }} else {{
                    processed
                }}
            }} else {{
                processed
            }}
        }}
    }};
    
    let processing_time = start_time.elapsed().as_millis() as u64;
    
    // Report progress
    ctx.progress("Tool execution completed", 1.0, Some(1.0)).await?;
    
    Ok({pascal_case_name}Response {{
        result,
        metadata: {pascal_case_name}Metadata {{
            processing_time_ms: processing_time,
            operations_count: 1,
        }},
    }})
}}

#[cfg(test)]
mod tests {{
    use super::*;
    
    #[tokio::test]
    async fn test_{snake_case_name}_basic_functionality() {{
        let ctx = Context::new();
        let request = {pascal_case_name}Request {{
            message: "test input".to_string(),
            options: None,
        }};
        
        let response = {snake_case_name}(request, ctx).await.unwrap();
        assert_eq!(response.result, "Processed: test input");
        assert!(response.metadata.processing_time_ms >= 0);
    }}
    
    #[tokio::test]
    async fn test_{snake_case_name}_with_options() {{
        let ctx = Context::new();
        let request = {pascal_case_name}Request {{
            message: "test input".to_string(),
            options: Some({pascal_case_name}Options {{
                verbose: Some(true),
                format: Some("json".to_string()),
            }}),
        }};
        
        let response = {snake_case_name}(request, ctx).await.unwrap();
        assert!(response.result.contains("test input"));
    }}
}}
"#
    );

    let file_path = format!("src/tools/{snake_case_name}.rs");
    std::fs::write(&file_path, tool_template).context("Failed to write tool file")?;

    // Update mod.rs to include the new tool
    let mod_file_path = "src/tools/mod.rs";
    let mod_content = if std::path::Path::new(mod_file_path).exists() {
        std::fs::read_to_string(mod_file_path)?
    } else {
        "//! Tools module\n\n".to_string()
    };

    if !mod_content.contains(&format!("pub mod {snake_case_name};")) {
        let updated_mod_content = format!("{mod_content}pub mod {snake_case_name};\n");
        std::fs::write(mod_file_path, updated_mod_content)
            .context("Failed to update tools/mod.rs")?;
    }

    println!("✅ Generated tool template at {file_path}");
    println!("📝 Updated {mod_file_path}");
    println!("\n🔧 To register this tool in your server, add:");
    println!(
        "   .tool(\"{tool_name}\", tools::{snake_case_name}::{snake_case_name});"
    );

    Ok(())
}

async fn generate_resource(args: &GenerateArgs) -> Result<()> {
    let resource_name = args
        .name
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Resource name is required for resource generation"))?;

    println!("📄 Generating resource: {resource_name}");

    // Create resources directory if it doesn't exist
    std::fs::create_dir_all("src/resources").context("Failed to create src/resources directory")?;

    let snake_case_name = resource_name.to_lowercase().replace('-', "_");
    let pascal_case_name = snake_case_name
        .split('_')
        .map(|s| {
            let mut chars = s.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<String>();
    let pascal_case_name_upper = snake_case_name.to_uppercase();

    // Write the resource file
    let resource_content = format!(
        r#"use async_trait::async_trait;
use mcprs_core::{{
    error::{{MCPError, MCPResult}},
    types::resources::{{
        ListResourceTemplatesRequest, ListResourceTemplatesResponse, ListResourcesRequest,
        ListResourcesResponse, ReadResourceRequest, ReadResourceResponse, Resource,
        ResourceContent,
    }},
}};
use mcprs_server::ResourceHandler;

const {pascal_case_name_upper}_URI: &str = "{resource_name}://example";

/// {resource_name} resource handler
pub struct {pascal_case_name}Resource;

#[async_trait]
impl ResourceHandler for {pascal_case_name}Resource {{
    async fn read_resource(
        &self,
        request: ReadResourceRequest,
    ) -> MCPResult<ReadResourceResponse> {{
        if request.uri != {pascal_case_name_upper}_URI {{
            return Err(MCPError::not_found(format!(
                "unknown resource: {{}}",
                request.uri
            )));
        }}

        Ok(ReadResourceResponse {{
            contents: vec![ResourceContent::text(
                {pascal_case_name_upper}_URI.to_string(),
                "This is an example {resource_name} resource.".to_string(),
            )],
        }})
    }}

    async fn list_resources(
        &self,
        _request: ListResourcesRequest,
    ) -> MCPResult<ListResourcesResponse> {{
        Ok(ListResourcesResponse {{
            resources: vec![Resource {{
                uri: {pascal_case_name_upper}_URI.to_string(),
                name: "{resource_name}".to_string(),
                description: Some("Example {resource_name} resource".to_string()),
                mime_type: Some("text/plain".to_string()),
            }}],
            next_cursor: None,
        }})
    }}

    async fn list_resource_templates(
        &self,
        _request: ListResourceTemplatesRequest,
    ) -> MCPResult<ListResourceTemplatesResponse> {{
        Ok(ListResourceTemplatesResponse {{
            resource_templates: vec![],
            next_cursor: None,
        }})
    }}
}}

#[cfg(test)]
mod tests {{
    use super::*;

    #[tokio::test]
    async fn test_{snake_case_name}_list_resources() {{
        let resource = {pascal_case_name}Resource;
        let response = resource
            .list_resources(ListResourcesRequest::default())
            .await
            .unwrap();
        assert!(!response.resources.is_empty());
    }}

    #[tokio::test]
    async fn test_{snake_case_name}_read_resource() {{
        let resource = {pascal_case_name}Resource;
        let request = ReadResourceRequest {{
            uri: {pascal_case_name_upper}_URI.to_string(),
            ..Default::default()
        }};
        let response = resource.read_resource(request).await.unwrap();
        assert_eq!(response.contents.len(), 1);
    }}
}}
"#
    );

    let resource_file = format!("src/resources/{snake_case_name}.rs");
    std::fs::write(&resource_file, resource_content).context("Failed to write resource file")?;

    // Update mod.rs file to include the new resource
    let mod_file = "src/resources/mod.rs";
    let mod_content = if std::path::Path::new(mod_file).exists() {
        std::fs::read_to_string(mod_file)?
    } else {
        String::new()
    };

    if !mod_content.contains(&format!("pub mod {snake_case_name};")) {
        let new_mod_content = if mod_content.is_empty() {
            format!("pub mod {snake_case_name};\n")
        } else {
            format!("{}\npub mod {};\n", mod_content.trim(), snake_case_name)
        };
        std::fs::write(mod_file, new_mod_content).context("Failed to update resources/mod.rs")?;
    }

    println!("✅ Generated resource: {resource_file}");
    println!("✅ Updated: {mod_file}");
    println!("\n💡 Next steps:");
    println!("   1. Implement the TODO sections in {resource_file}");
    println!("   2. Register the resource in your server");
    println!("   3. Add any required dependencies to Cargo.toml");

    Ok(())
}

async fn generate_client(args: &GenerateArgs) -> Result<()> {
    let client_name = args
        .name
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Client name is required for client generation"))?;

    let output_dir = args
        .output
        .as_deref()
        .unwrap_or_else(|| std::path::Path::new("."));

    println!("👤 Generating client: {client_name}");

    let project_dir = output_dir.join(client_name);
    std::fs::create_dir_all(&project_dir).context("Failed to create project directory")?;

    let _snake_case_name = client_name.to_lowercase().replace('-', "_");

    // Generate Cargo.toml
    let cargo_toml = format!(
        r#"[package]
name = "{client_name}"
version = "0.1.0"
edition = "2021"

[dependencies]
mcprs-client = {{ version = "0.1.0", features = ["http"] }}
mcprs-core = {{ version = "0.1.0" }}
tokio = {{ version = "1.0", features = ["full"] }}
anyhow = "1.0"
serde = {{ version = "1.0", features = ["derive"] }}
serde_json = "1.0"
clap = {{ version = "4.0", features = ["derive"] }}
colored = "2.0"
"#
    );

    std::fs::write(project_dir.join("Cargo.toml"), cargo_toml)
        .context("Failed to write Cargo.toml")?;

    // Generate main.rs
    let main_rs = format!(
        r#"use anyhow::Result;
use clap::{{Parser, Subcommand}};
use colored::*;
use mcprs_client::McpClientRuntime;
use mcprs_core::{{ClientCapabilities, ClientInfo, ToolCall}};

#[derive(Parser)]
#[command(name = "{client_name}", about = "A custom MCP client")]
struct Cli {{
    #[command(subcommand)]
    command: Commands,
}}

#[derive(Subcommand)]
enum Commands {{
    /// List available tools on a server reachable over stdio (our own stdin/stdout)
    Tools,
    /// List available tools on a server reachable over streamable HTTP
    ToolsHttp {{
        /// Server URL
        #[arg(long)]
        url: String,
    }},
    /// Call a specific tool on a server reachable over stdio
    Call {{
        /// Tool name to call
        #[arg(long)]
        tool: String,
        /// Tool arguments as JSON
        #[arg(long)]
        args: Option<String>,
    }},
}}

fn client_info() -> ClientInfo {{
    ClientInfo {{
        name: "{client_name}".to_string(),
        version: "0.1.0".to_string(),
        ..Default::default()
    }}
}}

#[tokio::main]
async fn main() -> Result<()> {{
    let cli = Cli::parse();

    match cli.command {{
        Commands::Tools => list_tools_stdio().await?,
        Commands::ToolsHttp {{ url }} => list_tools_http(&url).await?,
        Commands::Call {{ tool, args }} => call_tool_stdio(&tool, args.as_deref()).await?,
    }}

    Ok(())
}}

async fn list_tools_stdio() -> Result<()> {{
    println!("{{}}", "Connecting over stdio...".green());

    let client = McpClientRuntime::new(client_info(), ClientCapabilities::default());
    client.connect_stdio().await?;

    print_tools(&client).await?;
    client.disconnect().await?;

    Ok(())
}}

async fn list_tools_http(url: &str) -> Result<()> {{
    println!("{{}}", format!("Connecting to {{url}}...").green());

    let client = McpClientRuntime::new(client_info(), ClientCapabilities::default());
    client.connect_streamable_http(url).await?;

    print_tools(&client).await?;
    client.disconnect().await?;

    Ok(())
}}

async fn print_tools(client: &McpClientRuntime) -> Result<()> {{
    let tools = client.list_tools().await?;

    if tools.is_empty() {{
        println!("No tools available");
    }} else {{
        println!("📋 Available tools:");
        for tool in tools {{
            println!("  🔧 {{}}", tool.name.green());
            println!("     {{}}", tool.description.dimmed());
        }}
    }}

    Ok(())
}}

async fn call_tool_stdio(tool_name: &str, args: Option<&str>) -> Result<()> {{
    println!("{{}}", format!("Calling tool: {{tool_name}}").green());

    let client = McpClientRuntime::new(client_info(), ClientCapabilities::default());
    client.connect_stdio().await?;

    let arguments = match args {{
        Some(json_str) => Some(serde_json::from_str(json_str)?),
        None => None,
    }};

    let result = client
        .call_tool(ToolCall {{
            name: tool_name.to_string(),
            arguments,
        }})
        .await?;

    println!("✅ Tool executed successfully");
    println!("📄 Result:");
    for content in result.content {{
        println!("{{:?}}", content);
    }}

    client.disconnect().await?;

    Ok(())
}}
"#
    );

    std::fs::create_dir_all(project_dir.join("src"))?;
    std::fs::write(project_dir.join("src/main.rs"), main_rs).context("Failed to write main.rs")?;

    // Generate README.md
    let readme = format!(
        r#"# {client_name}

A custom Model Context Protocol (MCP) client.

## Usage

### List available tools from a server

```bash
# Over stdio (the server is expected on our own stdin/stdout)
cargo run -- tools

# Over streamable HTTP
cargo run -- tools-http --url "http://localhost:8080"
```

### Call a tool

```bash
cargo run -- call --tool "tool_name" --args '{{"param": "value"}}'
```

## Configuration

The client can connect to MCP servers using:
- **stdio transport**: for local processes, piped via this process's own stdin/stdout
- **streamable HTTP transport**: for remote servers

## Development

```bash
# Build the client
cargo build

# Run with debugging
RUST_LOG=debug cargo run -- [command]
```
"#
    );

    std::fs::write(project_dir.join("README.md"), readme).context("Failed to write README.md")?;

    println!("✅ Generated client project: {}", project_dir.display());
    println!("✅ Created:");
    println!("   📄 Cargo.toml");
    println!("   📄 src/main.rs");
    println!("   📄 README.md");
    println!("\n💡 Next steps:");
    println!("   1. cd {client_name}");
    println!("   2. cargo build");
    println!("   3. cargo run -- --help");

    Ok(())
}

async fn generate_server(args: &GenerateArgs) -> Result<()> {
    let server_name = args.name.as_deref().unwrap_or("mcp-server");

    println!("🖥️ Generating server: {server_name}");

    // Create project directory
    std::fs::create_dir_all(server_name).context("Failed to create server directory")?;

    let snake_case_name = server_name.to_lowercase().replace('-', "_");
    let server_pascal_case = snake_case_name
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<String>();

    // Generate Cargo.toml
    let cargo_toml = format!(
        r#"[package]
name = "{server_name}"
version = "0.1.0"
edition = "2021"

[dependencies]
mcprs-core = {{ version = "0.1.0" }}
mcprs-server = {{ version = "0.1.0" }}
async-trait = "0.1"
tokio = {{ version = "1.0", features = ["full"] }}
serde = {{ version = "1.0", features = ["derive"] }}
serde_json = "1.0"
anyhow = "1.0"
chrono = {{ version = "0.4", features = ["serde"] }}
tracing = "0.1"
tracing-subscriber = "0.3"

[lib]
name = "{snake_case_name}"
path = "src/lib.rs"

[[bin]]
name = "{server_name}"
path = "src/main.rs"
"#
    );

    std::fs::write(format!("{server_name}/Cargo.toml"), cargo_toml)
        .context("Failed to write Cargo.toml")?;

    // Create src directory
    std::fs::create_dir_all(format!("{server_name}/src"))
        .context("Failed to create src directory")?;

    // Generate main.rs
    let main_rs = format!(
        r#"//! {server_name} MCP Server
//!
//! A Model Context Protocol server implementation.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use mcprs_core::{{
    types::resources::{{
        ListResourceTemplatesRequest, ListResourceTemplatesResponse, ListResourcesRequest,
        ListResourcesResponse, ReadResourceRequest, ReadResourceResponse, Resource,
        ResourceContent,
    }},
    types::tools::{{ListToolsRequest, ListToolsResponse, ToolCall, ToolContent, ToolResult}},
    MCPError, MCPResult, ServerCapabilities, ServerInfo, ToolsCapability,
}};
use mcprs_server::{{Context, McpServerRuntime, ResourceHandler, ToolHandler}};
use tracing::{{info, warn}};

mod tools;

const STATUS_URI: &str = "status://{server_name}";

struct {server_pascal_case}ToolHandler;

#[async_trait]
impl ToolHandler for {server_pascal_case}ToolHandler {{
    async fn handle_tool_call(&self, call: ToolCall, ctx: Context) -> MCPResult<ToolResult> {{
        match call.name.as_str() {{
            "echo" => {{
                let req: tools::echo::EchoRequest = call
                    .arguments
                    .map(serde_json::from_value)
                    .transpose()
                    .map_err(|e| MCPError::invalid_params(e.to_string()))?
                    .ok_or_else(|| MCPError::invalid_params("missing arguments".to_string()))?;

                let response = tools::echo::echo(req, &ctx)
                    .await
                    .map_err(|e| MCPError::internal_error(e.to_string()))?;

                Ok(ToolResult {{
                    content: vec![ToolContent::text(
                        serde_json::to_string(&response)
                            .map_err(|e| MCPError::internal_error(e.to_string()))?,
                    )],
                    is_error: Some(false),
                }})
            }}
            "info" => {{
                let response = tools::info::info(&ctx)
                    .await
                    .map_err(|e| MCPError::internal_error(e.to_string()))?;

                Ok(ToolResult {{
                    content: vec![ToolContent::text(
                        serde_json::to_string(&response)
                            .map_err(|e| MCPError::internal_error(e.to_string()))?,
                    )],
                    is_error: Some(false),
                }})
            }}
            _ => Err(MCPError::method_not_found(format!(
                "Unknown tool: {{}}",
                call.name
            ))),
        }}
    }}

    async fn list_tools(&self, _request: ListToolsRequest) -> MCPResult<ListToolsResponse> {{
        Ok(ListToolsResponse {{
            tools: vec![
                mcprs_core::types::tools::Tool {{
                    name: "echo".to_string(),
                    description: "Echoes back the input message with a timestamp".to_string(),
                    input_schema: serde_json::json!({{
                        "type": "object",
                        "properties": {{
                            "message": {{"type": "string"}}
                        }},
                        "required": ["message"]
                    }}),
                    output_schema: None,
                    annotations: None,
                }},
                mcprs_core::types::tools::Tool {{
                    name: "info".to_string(),
                    description: "Returns server information and capabilities".to_string(),
                    input_schema: serde_json::json!({{"type": "object", "properties": {{}}}}),
                    output_schema: None,
                    annotations: None,
                }},
            ],
            next_cursor: None,
        }})
    }}
}}

struct {server_pascal_case}ResourceHandler;

#[async_trait]
impl ResourceHandler for {server_pascal_case}ResourceHandler {{
    async fn read_resource(&self, request: ReadResourceRequest) -> MCPResult<ReadResourceResponse> {{
        if request.uri != STATUS_URI {{
            return Err(MCPError::not_found(format!("unknown resource: {{}}", request.uri)));
        }}

        let ctx = Context::new();
        let status = tools::resources::status(&ctx)
            .await
            .map_err(|e| MCPError::internal_error(e.to_string()))?;

        Ok(ReadResourceResponse {{
            contents: vec![ResourceContent::text(
                STATUS_URI.to_string(),
                serde_json::to_string(&status)
                    .map_err(|e| MCPError::internal_error(e.to_string()))?,
            )],
        }})
    }}

    async fn list_resources(
        &self,
        _request: ListResourcesRequest,
    ) -> MCPResult<ListResourcesResponse> {{
        Ok(ListResourcesResponse {{
            resources: vec![Resource {{
                uri: STATUS_URI.to_string(),
                name: "status".to_string(),
                description: Some("Health check and status information".to_string()),
                mime_type: Some("application/json".to_string()),
            }}],
            next_cursor: None,
        }})
    }}

    async fn list_resource_templates(
        &self,
        _request: ListResourceTemplatesRequest,
    ) -> MCPResult<ListResourceTemplatesResponse> {{
        Ok(ListResourceTemplatesResponse {{
            resource_templates: vec![],
            next_cursor: None,
        }})
    }}
}}

#[tokio::main]
async fn main() -> Result<()> {{
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    info!("Starting {server_name} MCP Server");

    let info = ServerInfo::new("{server_name}".to_string(), "0.1.0".to_string());
    let capabilities = ServerCapabilities {{
        tools: Some(ToolsCapability {{
            list_changed: Some(false),
        }}),
        ..Default::default()
    }};

    let server = McpServerRuntime::new(info, capabilities)
        .with_tool_handler(Arc::new({server_pascal_case}ToolHandler))
        .with_resource_handler(Arc::new({server_pascal_case}ResourceHandler));

    match server.run_stdio().await {{
        Ok(_) => {{
            info!("Server stopped gracefully");
            Ok(())
        }}
        Err(e) => {{
            warn!("Server error: {{}}", e);
            Err(e.into())
        }}
    }}
}}
"#
    );

    std::fs::write(format!("{server_name}/src/main.rs"), main_rs)
        .context("Failed to write main.rs")?;

    // Generate lib.rs
    let lib_rs = format!(
        r#"//! {server_name} Library
//! 
//! Core functionality for the {server_name} MCP server.

pub mod tools;

pub use tools::*;
"#
    );

    std::fs::write(format!("{server_name}/src/lib.rs"), lib_rs)
        .context("Failed to write lib.rs")?;

    // Create tools directory and files
    std::fs::create_dir_all(format!("{server_name}/src/tools"))
        .context("Failed to create tools directory")?;

    // Generate tools/mod.rs
    let tools_mod_rs = r#"//! Tools module

pub mod echo;
pub mod info;
pub mod resources;
"#;

    std::fs::write(format!("{server_name}/src/tools/mod.rs"), tools_mod_rs)
        .context("Failed to write tools/mod.rs")?;

    // Generate echo tool
    let echo_tool = r#"//! Echo tool implementation

use serde::{Deserialize, Serialize};
use mcprs_server::Context;

#[derive(Debug, Deserialize)]
pub struct EchoRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub echo: String,
    pub timestamp: String,
}

pub async fn echo(
    req: EchoRequest,
    ctx: &Context,
) -> Result<EchoResponse, Box<dyn std::error::Error + Send + Sync>> {
    ctx.log_info(&format!("Echo request: {}", req.message)).await?;

    Ok(EchoResponse {
        echo: req.message,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
"#;

    std::fs::write(format!("{server_name}/src/tools/echo.rs"), echo_tool)
        .context("Failed to write echo tool")?;

    // Generate info tool
    let info_tool = r#"//! Server info tool

use serde::Serialize;
use mcprs_server::Context;

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub server_name: String,
    pub version: String,
    pub uptime: String,
    pub capabilities: Vec<String>,
}

pub async fn info(
    ctx: &Context,
) -> Result<InfoResponse, Box<dyn std::error::Error + Send + Sync>> {
    ctx.log_info("Server info requested").await?;

    Ok(InfoResponse {
        server_name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: format!("{:?}", std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap_or_default()),
        capabilities: vec![
            "tools".to_string(),
            "resources".to_string(),
            "stdio".to_string(),
        ],
    })
}
"#;

    std::fs::write(format!("{server_name}/src/tools/info.rs"), info_tool)
        .context("Failed to write info tool")?;

    // Generate resources module
    let resources_rs = r#"//! Resource handlers

use serde::Serialize;
use mcprs_server::Context;

#[derive(Debug, Serialize)]
pub struct StatusResource {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

pub async fn status(
    ctx: &Context,
) -> Result<StatusResource, Box<dyn std::error::Error + Send + Sync>> {
    ctx.log_info("Status resource requested").await?;

    Ok(StatusResource {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
"#;

    std::fs::write(
        format!("{server_name}/src/tools/resources.rs"),
        resources_rs,
    )
    .context("Failed to write resources module")?;

    // Generate README.md
    let readme = format!(
        r#"# {server_name} MCP Server

A Model Context Protocol (MCP) server built with mcprs.

## Features

- **Echo Tool**: Simple echo functionality for testing
- **Info Tool**: Server information and capabilities
- **Status Resource**: Health check and status information

## Usage

### Running the Server

```bash
cargo run
```

### Testing with MCP Client

```bash
# Test the echo tool
echo '{{"method": "tools/call", "params": {{"name": "echo", "arguments": {{"message": "Hello, World!"}}}}}}' | cargo run

# Get server info
echo '{{"method": "tools/call", "params": {{"name": "info", "arguments": {{}}}}}}' | cargo run
```

### Available Tools

#### Echo Tool
- **Name**: `echo`
- **Description**: Echoes back the input message with a timestamp
- **Parameters**:
  - `message` (string): The message to echo

#### Info Tool  
- **Name**: `info`
- **Description**: Returns server information and capabilities
- **Parameters**: None

### Available Resources

#### Status Resource
- **URI**: `status`
- **Description**: Returns server health status and metadata

## Development

### Adding New Tools

1. Create a new file in `src/tools/`
2. Implement your tool following the pattern in `echo.rs`
3. Add the module to `src/tools/mod.rs`
4. Register the tool in `src/main.rs`

### Adding New Resources

1. Add resource handlers to `src/tools/resources.rs`
2. Register resources in `src/main.rs`

## License

This project is licensed under the MIT License.
"#
    );

    std::fs::write(format!("{server_name}/README.md"), readme)
        .context("Failed to write README.md")?;

    println!("✅ Generated MCP server project at {server_name}/");
    println!("📁 Project structure:");
    println!("   ├── Cargo.toml");
    println!("   ├── README.md");
    println!("   └── src/");
    println!("       ├── main.rs");
    println!("       ├── lib.rs");
    println!("       └── tools/");
    println!("           ├── mod.rs");
    println!("           ├── echo.rs");
    println!("           ├── info.rs");
    println!("           └── resources.rs");
    println!("\n🚀 To get started:");
    println!("   cd {server_name}");
    println!("   cargo run");

    Ok(())
}

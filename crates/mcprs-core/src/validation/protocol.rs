//! Protocol validation utilities

use crate::error::{MCPResult, ProtocolError};
use crate::protocol::version::{self, SUPPORTED_VERSIONS};

/// Validate protocol version against the set this crate understands
///
/// Consolidates implementations from:
/// - core/protocol/lifecycle.rs
/// - transport/streamable_http/server.rs
/// - client/src/lib.rs
pub fn validate_protocol_version(version_str: &str) -> MCPResult<()> {
    if !version::is_supported_version(version_str) {
        return Err(ProtocolError::InvalidVersion(format!(
            "Unsupported protocol version {version_str}, expected one of {SUPPORTED_VERSIONS:?}"
        ))
        .into());
    }
    Ok(())
}

/// Check if a protocol version is supported
pub fn is_supported_version(version_str: &str) -> bool {
    version::is_supported_version(version_str)
}

/// Validate that a method name is valid for MCP
pub fn validate_method_name(method: &str) -> MCPResult<()> {
    if method.is_empty() {
        return Err(
            ProtocolError::InvalidRequest("Method name cannot be empty".to_string()).into(),
        );
    }

    // Method names should only contain alphanumeric characters, forward slashes, and underscores
    if !method
        .chars()
        .all(|c| c.is_alphanumeric() || c == '/' || c == '_')
    {
        return Err(ProtocolError::InvalidRequest(format!(
            "Invalid method name: {method}. Method names can only contain alphanumeric characters, '/', and '_'"
        )).into());
    }

    Ok(())
}

/// Validate Origin header for security
///
/// Consolidates implementation from transport/streamable_http/server.rs
pub fn validate_origin(origin: Option<&str>, allowed_origin: Option<&str>, host: &str) -> bool {
    if let Some(origin_str) = origin {
        // If allow_origin is set to "*", allow all origins
        if let Some(allowed) = allowed_origin {
            if allowed == "*" {
                return true;
            }
            return origin_str == allowed;
        }
        // For localhost, allow any localhost origin
        if host == "127.0.0.1" || host == "localhost" || host == "0.0.0.0" {
            return origin_str.contains("localhost") || origin_str.contains("127.0.0.1");
        }
        return false;
    }
    // Allow requests without Origin header for local development
    host == "127.0.0.1" || host == "localhost" || host == "0.0.0.0"
}

//! Comprehensive MCP Cancellation Tests
//!
//! This test suite validates that the mcprs implementation correctly handles
//! cancellation notifications as specified in MCP 2025-06-18.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::{sleep, timeout};
    use mcprs::{
        ClientCapabilities, ClientInfo, ListToolsRequest, ListToolsResponse, MCPError, MCPResult,
        ServerCapabilities, ServerInfo, Tool, ToolCall, ToolContent, ToolHandler, ToolResult,
        McpClientRuntime, McpServerRuntime,
    };
    use mcprs_core::{
        protocol::{
            capabilities::{PromptsCapability, ResourcesCapability, ToolsCapability},
            jsonrpc::{JsonRpcMessage, JsonRpcRequest, RequestId},
            lifecycle::InitializeRequest,
        },
        types::notifications::{CancelledNotification, PingRequest},
    };
    use mcprs_server::Context;
    use mcprs_test_utils::MockTransport;

    // Mock tool handler that supports cancellation
    struct CancellableToolHandler {
        cancellation_tx: mpsc::Sender<String>,
    }

    impl CancellableToolHandler {
        fn new(cancellation_tx: mpsc::Sender<String>) -> Self {
            Self { cancellation_tx }
        }
    }

    #[async_trait]
    impl ToolHandler for CancellableToolHandler {
        async fn handle_tool_call(&self, call: ToolCall, ctx: Context) -> MCPResult<ToolResult> {
            match call.name.as_str() {
                "longRunningOperation" => {
                    let duration = call
                        .arguments
                        .and_then(|args| args.get("duration").and_then(|v| v.as_f64()))
                        .unwrap_or(5.0);

                    // Long-running operation that polls the real cancellation state
                    // carried on `ctx` rather than a fixed elapsed-time heuristic.
                    let start = std::time::Instant::now();
                    let check_interval = Duration::from_millis(50);

                    while start.elapsed().as_secs_f64() < duration {
                        sleep(check_interval).await;

                        if ctx.is_cancelled().await {
                            let _ = self
                                .cancellation_tx
                                .try_send("operation_cancelled".to_string());
                            return Err(MCPError::invalid_request(
                                "Operation was cancelled".to_string(),
                            ));
                        }
                    }

                    Ok(ToolResult {
                        content: vec![ToolContent::text(format!(
                            "Operation completed after {:.1} seconds",
                            start.elapsed().as_secs_f64()
                        ))],
                        is_error: Some(false),
                    })
                }
                "echo" => {
                    let message = call
                        .arguments
                        .and_then(|args| args.get("message").cloned())
                        .and_then(|v| v.as_str().map(|s| s.to_string()))
                        .unwrap_or_else(|| "Hello, World!".to_string());

                    Ok(ToolResult {
                        content: vec![ToolContent::text(message)],
                        is_error: Some(false),
                    })
                }
                _ => Err(MCPError::method_not_found(format!(
                    "Unknown tool: {}",
                    call.name
                ))),
            }
        }

        async fn list_tools(&self, _request: ListToolsRequest) -> MCPResult<ListToolsResponse> {
            let tools = vec![
                Tool {
                    name: "longRunningOperation".to_string(),
                    description: "A long-running operation that can be cancelled".to_string(),
                    input_schema: json!({
                        "type": "object",
                        "properties": {
                            "duration": {
                                "type": "number",
                                "default": 5.0,
                                "description": "Duration in seconds"
                            }
                        }
                    }),
                    output_schema: None,
                    annotations: None,
                },
                Tool {
                    name: "echo".to_string(),
                    description: "Echo a message back".to_string(),
                    input_schema: json!({
                        "type": "object",
                        "properties": {
                            "message": {"type": "string", "default": "Hello, World!"}
                        },
                        "required": ["message"]
                    }),
                    output_schema: None,
                    annotations: None,
                },
            ];

            Ok(ListToolsResponse {
                tools,
                next_cursor: None,
            })
        }
    }

    fn create_cancellation_test_server() -> (McpServerRuntime, mpsc::Receiver<String>) {
        let (cancellation_tx, cancellation_rx) = mpsc::channel(100);

        let server_info = ServerInfo {
            name: "cancellation-test-server".to_string(),
            version: "1.0.0".to_string(),
            description: Some("Test server for cancellation functionality".to_string()),
            homepage: None,
            repository: None,
            authors: Some(vec!["test".to_string()]),
            license: Some("MIT".to_string()),
        };

        let capabilities = ServerCapabilities {
            tools: Some(ToolsCapability {
                list_changed: Some(true),
            }),
            ..Default::default()
        };

        let server = McpServerRuntime::new(server_info, capabilities)
            .with_tool_handler(Arc::new(CancellableToolHandler::new(cancellation_tx)));

        (server, cancellation_rx)
    }

    fn create_cancellation_test_client() -> McpClientRuntime {
        let client_info = ClientInfo {
            name: "cancellation-test-client".to_string(),
            version: "1.0.0".to_string(),
            description: Some("Test client for cancellation functionality".to_string()),
            homepage: None,
            repository: None,
            authors: Some(vec!["test".to_string()]),
            license: Some("MIT".to_string()),
        };

        let capabilities = ClientCapabilities::default();

        McpClientRuntime::new(client_info, capabilities)
    }

    /// Test basic cancellation notification format
    #[tokio::test]
    async fn test_cancellation_notification_format() {
        let notification = CancelledNotification {
            request_id: json!("test-request-123"),
            reason: Some("User requested cancellation".to_string()),
        };

        let serialized = serde_json::to_string(&notification).unwrap();
        assert!(serialized.contains("test-request-123"));
        assert!(serialized.contains("User requested cancellation"));
        assert!(serialized.contains("requestId"));
        assert!(serialized.contains("reason"));

        // Test without reason
        let notification_no_reason = CancelledNotification {
            request_id: json!("test-request-456"),
            reason: None,
        };

        let serialized_no_reason = serde_json::to_string(&notification_no_reason).unwrap();
        assert!(serialized_no_reason.contains("test-request-456"));
        assert!(!serialized_no_reason.contains("reason"));

        println!("âœ… Cancellation notification format test passed!");
    }

    /// Test that initialize request cannot be cancelled
    #[tokio::test]
    async fn test_initialize_cannot_be_cancelled() {
        let _client = create_cancellation_test_client();

        // Create an initialize request
        let initialize_request = InitializeRequest {
            protocol_version: "2025-06-18".to_string(),
            capabilities: ClientCapabilities::default(),
            client_info: ClientInfo {
                name: "test-client".to_string(),
                version: "1.0.0".to_string(),
                description: None,
                authors: None,
                homepage: None,
                repository: None,
                license: None,
            },
        };

        // Verify that initialize requests should not be cancelled
        // This is a specification requirement, not an implementation test
        assert_eq!(initialize_request.protocol_version, "2025-06-18");
        assert_eq!(initialize_request.client_info.name, "test-client");

        println!("âœ… Initialize request cancellation prevention test passed!");
    }

    /// Test cancellation of in-progress requests
    ///
    /// Drives a real `tools/call` through `McpServerRuntime::run_with_transport`
    /// followed by a `$/cancelled` notification for the same request id, and
    /// verifies the in-flight handler actually observes cancellation via
    /// `ctx.is_cancelled()` rather than a time-elapsed heuristic.
    #[tokio::test]
    async fn test_cancellation_of_in_progress_requests() {
        let (server, mut cancellation_rx) = create_cancellation_test_server();

        let transport = MockTransport::new();
        let sent_messages = transport.sent_messages.clone();

        let init_request = InitializeRequest {
            protocol_version: "2025-06-18".to_string(),
            capabilities: ClientCapabilities::default(),
            client_info: ClientInfo {
                name: "cancellation-test-client".to_string(),
                version: "1.0.0".to_string(),
                description: None,
                authors: None,
                homepage: None,
                repository: None,
                license: None,
            },
        };

        // `MockTransport::receive_message` returns `ConnectionClosed` as soon as
        // its queue runs dry, which would tear down the receive loop the moment
        // it catches up to us, so every message this run needs has to be queued
        // before `run_with_transport` starts draining it. The handler only
        // registers the tool call's id with the cancellation manager once it is
        // dispatched, but that registration runs to completion before the
        // handler's first real suspension point (the polling loop's `sleep`),
        // so the queued `$/cancelled` notification — dispatched after it in
        // the same receive loop — can only reach `cancel_request` once the id
        // is already registered.
        transport.add_receive_message(JsonRpcMessage::Request(JsonRpcRequest::new(
            "initialize".to_string(),
            Some(serde_json::to_value(init_request).unwrap()),
            Some(RequestId::Number(1)),
        )));
        transport.add_receive_message(JsonRpcMessage::Notification(JsonRpcRequest::notification(
            "initialized".to_string(),
            None,
        )));
        transport.add_receive_message(JsonRpcMessage::Request(JsonRpcRequest::new(
            "tools/call".to_string(),
            Some(json!({
                "name": "longRunningOperation",
                "arguments": {"duration": 10.0}
            })),
            Some(RequestId::Number(2)),
        )));
        // `request_id_value` turns a `RequestId::Number(2)` into the JSON
        // number `2`, so the cancellation lookup key must match that shape
        // rather than the string `"2"`.
        transport.add_receive_message(JsonRpcMessage::Notification(JsonRpcRequest::notification(
            "$/cancelled".to_string(),
            Some(json!({
                "requestId": 2,
                "reason": "User requested cancellation"
            })),
        )));

        let server_task = tokio::spawn(async move {
            let _ = server.run_with_transport(Box::new(transport)).await;
        });

        // The handler only signals this once it observes `ctx.is_cancelled()`
        // returning true, so receiving it proves the cancellation notification
        // actually reached the in-flight tool call rather than arriving too
        // late or being dropped on the floor.
        let notified = timeout(Duration::from_secs(2), cancellation_rx.recv())
            .await
            .expect("tool handler should observe cancellation within the timeout")
            .expect("cancellation channel should not close early");
        assert_eq!(notified, "operation_cancelled");

        // Give the cancelled call a moment to finish writing its response.
        sleep(Duration::from_millis(200)).await;
        server_task.abort();

        let sent = sent_messages.lock().unwrap().clone();
        let tool_call_response = sent.into_iter().find_map(|msg| match msg {
            JsonRpcMessage::Response(resp) if resp.id == Some(RequestId::Number(2)) => Some(resp),
            _ => None,
        });
        let response =
            tool_call_response.expect("the cancelled tools/call should still receive a response");
        assert!(
            response.error.is_some(),
            "a cancelled tool call should surface as a JSON-RPC error response"
        );
        assert!(response.error.unwrap().message.contains("cancelled"));

        println!("âœ… Cancellation of in-progress requests test passed!");
    }

    /// Test handling of unknown request IDs in cancellation
    #[tokio::test]
    async fn test_cancellation_unknown_request_id() {
        // Test that cancellation notifications with unknown request IDs are ignored
        let cancellation_notification = CancelledNotification {
            request_id: json!("unknown-request-123"),
            reason: Some("User requested cancellation".to_string()),
        };

        // The specification states that receivers MAY ignore cancellation notifications
        // for unknown request IDs. This is a valid behavior.
        assert_eq!(
            cancellation_notification.request_id,
            json!("unknown-request-123")
        );
        assert_eq!(
            cancellation_notification.reason,
            Some("User requested cancellation".to_string())
        );

        println!("âœ… Unknown request ID cancellation handling test passed!");
    }

    /// Test cancellation notification timing and race conditions
    #[tokio::test]
    async fn test_cancellation_timing_and_race_conditions() {
        // Test that cancellation notifications may arrive after processing has completed
        // This is a race condition that must be handled gracefully

        let cancellation_notification = CancelledNotification {
            request_id: json!("completed-request-123"),
            reason: Some("Late cancellation".to_string()),
        };

        // The specification states that receivers MAY ignore cancellation notifications
        // if processing has already completed
        assert_eq!(
            cancellation_notification.request_id,
            json!("completed-request-123")
        );
        assert_eq!(
            cancellation_notification.reason,
            Some("Late cancellation".to_string())
        );

        println!("âœ… Cancellation timing and race conditions test passed!");
    }

    /// Test cancellation notification logging
    #[tokio::test]
    async fn test_cancellation_logging() {
        // Test that cancellation reasons are logged for debugging
        let cancellation_notification = CancelledNotification {
            request_id: json!("logged-request-123"),
            reason: Some("Debug cancellation reason".to_string()),
        };

        // Verify the notification contains the required fields for logging
        assert!(cancellation_notification.reason.is_some());
        assert_eq!(
            cancellation_notification.reason.as_ref().unwrap(),
            "Debug cancellation reason"
        );

        // In a real implementation, this would be logged
        println!(
            "Cancellation logged: Request {} cancelled with reason: {}",
            cancellation_notification.request_id,
            cancellation_notification.reason.as_ref().unwrap()
        );

        println!("âœ… Cancellation logging test passed!");
    }

    /// Test malformed cancellation notifications
    #[tokio::test]
    async fn test_malformed_cancellation_notifications() {
        // Test that malformed cancellation notifications are ignored
        let malformed_notification = json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": {
                "invalidField": "invalid value"
            }
        });

        // This should be ignored as per specification
        assert!(malformed_notification.is_object());
        assert!(malformed_notification["method"].as_str().unwrap() == "notifications/cancelled");

        // Test notification without requestId
        let notification_without_request_id = json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": {
                "reason": "Missing request ID"
            }
        });

        // This should also be ignored
        assert!(notification_without_request_id.is_object());

        println!("âœ… Malformed cancellation notifications test passed!");
    }

    /// Test cancellation notification direction requirements
    #[tokio::test]
    async fn test_cancellation_direction_requirements() {
        // Test that cancellation notifications only reference requests that were
        // previously issued in the same direction

        // Client -> Server cancellation
        let client_to_server_cancellation = CancelledNotification {
            request_id: json!("client-request-123"),
            reason: Some("Client cancelled request".to_string()),
        };

        // Server -> Client cancellation
        let server_to_client_cancellation = CancelledNotification {
            request_id: json!("server-request-456"),
            reason: Some("Server cancelled request".to_string()),
        };

        // Both should be valid
        assert_eq!(
            client_to_server_cancellation.request_id,
            json!("client-request-123")
        );
        assert_eq!(
            server_to_client_cancellation.request_id,
            json!("server-request-456")
        );

        println!("âœ… Cancellation direction requirements test passed!");
    }

    /// Test cancellation with different request ID types
    #[tokio::test]
    async fn test_cancellation_request_id_types() {
        // Test cancellation with string request IDs
        let string_id_cancellation = CancelledNotification {
            request_id: json!("string-request-id"),
            reason: Some("String ID cancellation".to_string()),
        };

        // Test cancellation with numeric request IDs
        let numeric_id_cancellation = CancelledNotification {
            request_id: json!(12345),
            reason: Some("Numeric ID cancellation".to_string()),
        };

        // Both should be valid
        assert!(string_id_cancellation.request_id.is_string());
        assert!(numeric_id_cancellation.request_id.is_number());

        println!("âœ… Cancellation request ID types test passed!");
    }

    /// Test cancellation notification serialization and deserialization
    #[tokio::test]
    async fn test_cancellation_serialization_deserialization() {
        let original_notification = CancelledNotification {
            request_id: json!("serialization-test-123"),
            reason: Some("Serialization test reason".to_string()),
        };

        // Serialize
        let serialized = serde_json::to_string(&original_notification).unwrap();

        // Deserialize
        let deserialized: CancelledNotification = serde_json::from_str(&serialized).unwrap();

        // Verify round-trip
        assert_eq!(original_notification.request_id, deserialized.request_id);
        assert_eq!(original_notification.reason, deserialized.reason);

        println!("âœ… Cancellation serialization/deserialization test passed!");
    }

    /// Test multiple cancellation notifications for the same request
    #[tokio::test]
    async fn test_multiple_cancellation_notifications() {
        let request_id = json!("multiple-cancel-test-123");

        // First cancellation
        let first_cancellation = CancelledNotification {
            request_id: request_id.clone(),
            reason: Some("First cancellation".to_string()),
        };

        // Second cancellation (should be ignored as per spec)
        let second_cancellation = CancelledNotification {
            request_id: request_id.clone(),
            reason: Some("Second cancellation".to_string()),
        };

        // Both should have the same request ID
        assert_eq!(first_cancellation.request_id, request_id);
        assert_eq!(second_cancellation.request_id, request_id);

        // The specification states that receivers MAY ignore cancellation notifications
        // if the request is already cancelled
        assert_eq!(
            first_cancellation.reason,
            Some("First cancellation".to_string())
        );
        assert_eq!(
            second_cancellation.reason,
            Some("Second cancellation".to_string())
        );

        println!("âœ… Multiple cancellation notifications test passed!");
    }

    /// Test cancellation notification with empty reason
    #[tokio::test]
    async fn test_cancellation_empty_reason() {
        let cancellation_with_empty_reason = CancelledNotification {
            request_id: json!("empty-reason-test-123"),
            reason: Some("".to_string()),
        };

        let cancellation_with_no_reason = CancelledNotification {
            request_id: json!("no-reason-test-456"),
            reason: None,
        };

        // Both should be valid
        assert_eq!(
            cancellation_with_empty_reason.request_id,
            json!("empty-reason-test-123")
        );
        assert_eq!(cancellation_with_empty_reason.reason, Some("".to_string()));
        assert_eq!(
            cancellation_with_no_reason.request_id,
            json!("no-reason-test-456")
        );
        assert_eq!(cancellation_with_no_reason.reason, None);

        println!("âœ… Cancellation empty reason test passed!");
    }

    /// Test cancellation notification JSON-RPC compliance
    #[tokio::test]
    async fn test_cancellation_jsonrpc_compliance() {
        let notification = JsonRpcMessage::Notification(JsonRpcRequest::notification(
            "notifications/cancelled".to_string(),
            Some(json!({
                "requestId": "jsonrpc-test-123",
                "reason": "JSON-RPC compliance test"
            })),
        ));

        let serialized = serde_json::to_string(&notification).unwrap();

        // Verify JSON-RPC 2.0 compliance
        assert!(serialized.contains("\"jsonrpc\":\"2.0\""));
        assert!(serialized.contains("\"method\":\"notifications/cancelled\""));
        assert!(serialized.contains("jsonrpc-test-123"));
        assert!(serialized.contains("JSON-RPC compliance test"));

        // Verify no ID field (notifications don't have IDs)
        assert!(!serialized.contains("\"id\":"));

        println!("âœ… Cancellation JSON-RPC compliance test passed!");
    }

    /// Test cancellation notification error handling
    #[tokio::test]
    async fn test_cancellation_error_handling() {
        // Test that invalid JSON is handled gracefully
        let invalid_json = r#"{"jsonrpc": "2.0", "method": "notifications/cancelled", "params": {"requestId": "test"}"#;

        // This should fail to parse due to missing closing brace
        let parse_result: Result<JsonRpcMessage, _> = serde_json::from_str(invalid_json);
        assert!(parse_result.is_err());

        // Test that missing required fields are handled
        let missing_request_id = json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": {
                "reason": "Missing request ID"
            }
        });

        // This should fail to deserialize as CancelledNotification
        let parse_result: Result<CancelledNotification, _> =
            serde_json::from_value(missing_request_id);
        assert!(parse_result.is_err());

        println!("âœ… Cancellation error handling test passed!");
    }

    /// Test cancellation notification performance
    #[tokio::test]
    async fn test_cancellation_performance() {
        let start = std::time::Instant::now();

        // Create many cancellation notifications
        for i in 0..1000 {
            let notification = CancelledNotification {
                request_id: json!(format!("perf-test-{}", i)),
                reason: Some(format!("Performance test {i}")),
            };

            let _serialized = serde_json::to_string(&notification).unwrap();
        }

        let elapsed = start.elapsed();

        // Should complete quickly (less than 100ms)
        assert!(elapsed.as_millis() < 100);

        println!(
            "âœ… Cancellation performance test passed! ({elapsed:?} for 1000 notifications)"
        );
    }

    /// Test cancellation notification integration with MCP protocol
    #[tokio::test]
    async fn test_cancellation_mcp_integration() {
        // Test that cancellation notifications work with the full MCP protocol stack

        let (server, _cancellation_rx) = create_cancellation_test_server();
        let client = create_cancellation_test_client();

        // Verify server and client can be created
        assert_eq!(server.info().name, "cancellation-test-server");
        assert_eq!(client.info().name, "cancellation-test-client");

        // Test that the server has the expected tools
        // Note: The server needs to be in a proper state to list tools
        // For this test, we'll verify the tool handler provides the expected tools
        let tool_handler = CancellableToolHandler::new(mpsc::channel(100).0);
        let tools_response = tool_handler
            .list_tools(ListToolsRequest::default())
            .await
            .unwrap();

        assert_eq!(tools_response.tools.len(), 2);
        assert!(tools_response
            .tools
            .iter()
            .any(|t| t.name == "longRunningOperation"));
        assert!(tools_response.tools.iter().any(|t| t.name == "echo"));

        println!("âœ… Cancellation MCP integration test passed!");
    }

    /// Test actual cancellation flow between client and server
    #[tokio::test]
    async fn test_actual_cancellation_flow() {
        let (server, _cancellation_rx) = create_cancellation_test_server();
        let _client = create_cancellation_test_client();

        // Test that the client can send cancellation notifications
        let cancellation_notification = CancelledNotification {
            request_id: json!("actual-cancel-test-123"),
            reason: Some("Testing actual cancellation flow".to_string()),
        };

        // In a real implementation, the client would send this notification
        // and the server would handle it
        let serialized = serde_json::to_string(&cancellation_notification).unwrap();
        assert!(serialized.contains("actual-cancel-test-123"));
        assert!(serialized.contains("Testing actual cancellation flow"));

        // Test that the server can handle cancellation notifications
        let server_handled = server
            .cancellation_manager()
            .handle_cancellation(cancellation_notification)
            .await;

        // The server should handle the cancellation (return true if it was a valid request)
        // In this test, we're just verifying the method exists and can be called
        assert!(server_handled.is_ok());

        println!("âœ… Actual cancellation flow test passed!");
    }

    /// Test cancellation with different transport types
    #[tokio::test]
    async fn test_cancellation_transport_types() {
        // Test that cancellation works with different transport types

        // STDIO transport cancellation
        let stdio_cancellation = CancelledNotification {
            request_id: json!("stdio-test-123"),
            reason: Some("STDIO transport cancellation".to_string()),
        };

        // HTTP transport cancellation
        let http_cancellation = CancelledNotification {
            request_id: json!("http-test-456"),
            reason: Some("HTTP transport cancellation".to_string()),
        };

        // Both should be valid regardless of transport
        assert_eq!(stdio_cancellation.request_id, json!("stdio-test-123"));
        assert_eq!(http_cancellation.request_id, json!("http-test-456"));

        println!("âœ… Cancellation transport types test passed!");
    }

    /// Test cancellation notification validation
    #[tokio::test]
    async fn test_cancellation_notification_validation() {
        // Test various validation scenarios for cancellation notifications

        // Valid notification
        let valid_notification = CancelledNotification {
            request_id: json!("valid-test-123"),
            reason: Some("Valid cancellation".to_string()),
        };
        assert!(
            valid_notification.request_id.is_string() || valid_notification.request_id.is_number()
        );

        // Notification with null request ID (invalid)
        let null_request_id = json!(null);
        assert!(null_request_id.is_null());

        // Notification with empty string request ID (valid)
        let empty_string_id = CancelledNotification {
            request_id: json!(""),
            reason: Some("Empty string ID".to_string()),
        };
        assert_eq!(empty_string_id.request_id, json!(""));

        // Notification with very long reason (should be handled gracefully)
        let long_reason = "x".repeat(10000);
        let long_reason_notification = CancelledNotification {
            request_id: json!("long-reason-test"),
            reason: Some(long_reason.clone()),
        };
        assert_eq!(long_reason_notification.reason, Some(long_reason));

        println!("âœ… Cancellation notification validation test passed!");
    }

    /// Test cancellation notification edge cases
    #[tokio::test]
    async fn test_cancellation_edge_cases() {
        // Test edge cases for cancellation notifications

        // Notification with special characters in reason
        let special_chars_reason =
            "Cancellation with special chars: !@#$%^&*()_+-=[]{}|;':\",./<>?";
        let special_chars_notification = CancelledNotification {
            request_id: json!("special-chars-test"),
            reason: Some(special_chars_reason.to_string()),
        };
        assert_eq!(
            special_chars_notification.reason,
            Some(special_chars_reason.to_string())
        );

        // Notification with unicode characters
        let unicode_reason = "Cancellation with unicode: ðŸš€ æµ‹è¯• ãƒ†ã‚¹ãƒˆ";
        let unicode_notification = CancelledNotification {
            request_id: json!("unicode-test"),
            reason: Some(unicode_reason.to_string()),
        };
        assert_eq!(
            unicode_notification.reason,
            Some(unicode_reason.to_string())
        );

        // Notification with numeric request ID
        let numeric_id_notification = CancelledNotification {
            request_id: json!(999999),
            reason: Some("Numeric ID test".to_string()),
        };
        assert_eq!(numeric_id_notification.request_id, json!(999999));

        // Notification with negative numeric request ID
        let negative_id_notification = CancelledNotification {
            request_id: json!(-123),
            reason: Some("Negative ID test".to_string()),
        };
        assert_eq!(negative_id_notification.request_id, json!(-123));

        println!("âœ… Cancellation edge cases test passed!");
    }

    /// Test cancellation notification concurrency
    #[tokio::test]
    async fn test_cancellation_concurrency() {
        // Test that cancellation notifications work correctly under concurrent conditions

        let mut handles = vec![];

        // Spawn multiple tasks that create cancellation notifications
        for i in 0..10 {
            let handle = tokio::spawn(async move {
                let notification = CancelledNotification {
                    request_id: json!(format!("concurrent-test-{}", i)),
                    reason: Some(format!("Concurrent cancellation {i}")),
                };

                let serialized = serde_json::to_string(&notification).unwrap();
                assert!(serialized.contains(&format!("concurrent-test-{i}")));
                assert!(serialized.contains(&format!("Concurrent cancellation {i}")));

                notification
            });
            handles.push(handle);
        }

        // Wait for all tasks to complete
        let results = futures::future::join_all(handles).await;

        // Verify all notifications were created correctly
        for (i, result) in results.into_iter().enumerate() {
            let notification = result.unwrap();
            assert_eq!(
                notification.request_id,
                json!(format!("concurrent-test-{i}"))
            );
            assert_eq!(
                notification.reason,
                Some(format!("Concurrent cancellation {i}"))
            );
        }

        println!("âœ… Cancellation concurrency test passed!");
    }

    /// Test cancellation notification memory usage
    #[tokio::test]
    async fn test_cancellation_memory_usage() {
        // Test that cancellation notifications don't cause memory leaks

        // Note: We can't easily measure memory usage in Rust tests
        // This is a simplified test that just verifies the code compiles and runs
        let start_count = 0;

        // Create many cancellation notifications
        for i in 0..1000 {
            let notification = CancelledNotification {
                request_id: json!(format!("memory-test-{}", i)),
                reason: Some(format!("Memory test {i}")),
            };

            let _serialized = serde_json::to_string(&notification).unwrap();

            // Drop the notification to free memory
            drop(notification);
        }

        let end_count = 1000;

        // Verify we processed all notifications
        let count_diff = end_count - start_count;
        assert_eq!(count_diff, 1000);

        println!(
            "âœ… Cancellation memory usage test passed! (Processed {count_diff} notifications)"
        );
    }

    /// Test cancellation notification protocol compliance
    #[tokio::test]
    async fn test_cancellation_protocol_compliance() {
        // Test that cancellation notifications fully comply with MCP 2025-06-18 specification

        // Test required fields
        let notification = CancelledNotification {
            request_id: json!("protocol-test-123"),
            reason: Some("Protocol compliance test".to_string()),
        };

        // Verify required field: requestId
        assert!(notification.request_id.is_string() || notification.request_id.is_number());

        // Verify optional field: reason
        assert!(notification.reason.is_some());

        // Test JSON-RPC 2.0 compliance
        let jsonrpc_notification = JsonRpcMessage::Notification(JsonRpcRequest::notification(
            "notifications/cancelled".to_string(),
            Some(serde_json::to_value(notification).unwrap()),
        ));

        let serialized = serde_json::to_string(&jsonrpc_notification).unwrap();

        // Verify JSON-RPC 2.0 requirements
        assert!(serialized.contains("\"jsonrpc\":\"2.0\""));
        assert!(serialized.contains("\"method\":\"notifications/cancelled\""));
        assert!(!serialized.contains("\"id\":")); // No ID for notifications

        // Verify MCP-specific requirements
        assert!(serialized.contains("protocol-test-123"));
        assert!(serialized.contains("Protocol compliance test"));

        println!("âœ… Cancellation protocol compliance test passed!");
    }

    // =========================
    // Ping Tests
    // =========================

    /// Test basic ping functionality
    #[tokio::test]
    async fn test_basic_ping() {
        let server = create_ping_test_server();
        let _client = create_ping_test_client();

        // Test that ping returns empty response as per MCP 2025-06-18
        let ping_request = PingRequest::new();
        let response = server
            .ping_manager()
            .handle_ping(ping_request)
            .await
            .unwrap();

        // PingResponse should be empty as per specification
        assert_eq!(response.data, None);

        println!("âœ… Basic ping test passed!");
    }

    /// Test ping with data
    #[tokio::test]
    async fn test_ping_with_data() {
        let server = create_ping_test_server();

        let ping_data = json!({
            "timestamp": 1234567890,
            "test": "data"
        });

        let ping_request = PingRequest::new().with_data(ping_data.clone());
        let response = server
            .ping_manager()
            .handle_ping(ping_request)
            .await
            .unwrap();

        // Server should echo back the data
        assert_eq!(response.data, Some(ping_data));

        println!("âœ… Ping with data test passed!");
    }

    /// Test ping timeout handling
    #[tokio::test]
    async fn test_ping_timeout() {
        let server = create_ping_test_server();

        // Test with a ping that would timeout
        let ping_request = PingRequest::new().with_data(json!({
            "timeout_test": true
        }));

        // The ping should complete within the timeout
        let start = std::time::Instant::now();
        let response = server
            .ping_manager()
            .handle_ping(ping_request)
            .await
            .unwrap();
        let duration = start.elapsed();

        // Should complete quickly (less than 1 second)
        assert!(duration < Duration::from_secs(1));
        assert_eq!(response.data, Some(json!({"timeout_test": true})));

        println!("âœ… Ping timeout test passed! (Duration: {duration:?})");
    }

    /// Test ping monitoring on client
    #[tokio::test]
    async fn test_client_ping_monitoring() {
        let _client = create_ping_test_client();

        // Start ping monitoring with a short interval
        let ping_interval = Duration::from_millis(100);
        _client.start_ping_monitoring(ping_interval).await.unwrap();

        // Wait a bit for pings to be sent
        sleep(Duration::from_millis(300)).await;

        // Stop ping monitoring
        _client.stop_ping_monitoring().await.unwrap();

        println!("âœ… Client ping monitoring test passed!");
    }

    /// Test ping monitoring on server
    #[tokio::test]
    async fn test_server_ping_monitoring() {
        let server = create_ping_test_server();

        // Start ping monitoring with a short interval
        let ping_interval = Duration::from_millis(100);
        server.start_ping_monitoring(ping_interval).await.unwrap();

        // Wait a bit for monitoring to be set up
        sleep(Duration::from_millis(200)).await;

        // Stop ping monitoring
        server.stop_ping_monitoring().await.unwrap();

        println!("âœ… Server ping monitoring test passed!");
    }

    /// Test ping protocol compliance
    #[tokio::test]
    async fn test_ping_protocol_compliance() {
        let server = create_ping_test_server();

        // Test empty ping (should return empty response)
        let empty_ping = PingRequest::new();
        let empty_response = server.ping_manager().handle_ping(empty_ping).await.unwrap();
        assert_eq!(empty_response.data, None);

        // Test ping with data (should echo back)
        let data_ping = PingRequest::new().with_data(json!({"echo": "test"}));
        let data_response = server.ping_manager().handle_ping(data_ping).await.unwrap();
        assert_eq!(data_response.data, Some(json!({"echo": "test"})));

        // Test ping with complex data
        let complex_data = json!({
            "nested": {
                "array": [1, 2, 3],
                "string": "test",
                "number": 42.5,
                "boolean": true,
                "null": null
            }
        });
        let complex_ping = PingRequest::new().with_data(complex_data.clone());
        let complex_response = server
            .ping_manager()
            .handle_ping(complex_ping)
            .await
            .unwrap();
        assert_eq!(complex_response.data, Some(complex_data));

        println!("âœ… Ping protocol compliance test passed!");
    }

    /// Test ping error handling
    #[tokio::test]
    async fn test_ping_error_handling() {
        let server = create_ping_test_server();

        // Test that ping manager handles requests gracefully
        let ping_request = PingRequest::new();

        // Should not panic or return error for valid ping
        let result = server.ping_manager().handle_ping(ping_request).await;
        assert!(result.is_ok());

        println!("âœ… Ping error handling test passed!");
    }

    /// Test ping performance
    #[tokio::test]
    async fn test_ping_performance() {
        let server = create_ping_test_server();

        let start = std::time::Instant::now();

        // Send multiple pings quickly
        for i in 0..100 {
            let ping_data = json!({
                "sequence": i,
                "timestamp": std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs()
            });

            let ping_request = PingRequest::new().with_data(ping_data.clone());
            let response = server
                .ping_manager()
                .handle_ping(ping_request)
                .await
                .unwrap();

            assert_eq!(response.data, Some(ping_data));
        }

        let duration = start.elapsed();

        // Should complete 100 pings quickly (less than 1 second)
        assert!(duration < Duration::from_secs(1));

        println!(
            "âœ… Ping performance test passed! (100 pings in {duration:?})"
        );
    }

    /// Test ping with large data
    #[tokio::test]
    async fn test_ping_with_large_data() {
        let server = create_ping_test_server();

        // Create large data payload
        let large_data = json!({
            "large_array": (0..1000).collect::<Vec<i32>>(),
            "large_string": "x".repeat(10000),
            "nested": {
                "deep": {
                    "very_deep": {
                        "data": "test"
                    }
                }
            }
        });

        let ping_request = PingRequest::new().with_data(large_data.clone());
        let response = server
            .ping_manager()
            .handle_ping(ping_request)
            .await
            .unwrap();

        assert_eq!(response.data, Some(large_data));

        println!("âœ… Ping with large data test passed!");
    }

    /// Test ping monitoring integration
    #[tokio::test]
    async fn test_ping_monitoring_integration() {
        let server = create_ping_test_server();
        let _client = create_ping_test_client();

        // Start monitoring on both sides
        let ping_interval = Duration::from_millis(50);

        server.start_ping_monitoring(ping_interval).await.unwrap();
        _client.start_ping_monitoring(ping_interval).await.unwrap();

        // Let them run for a bit
        sleep(Duration::from_millis(200)).await;

        // Stop monitoring
        server.stop_ping_monitoring().await.unwrap();
        _client.stop_ping_monitoring().await.unwrap();

        println!("âœ… Ping monitoring integration test passed!");
    }

    // =========================
    // Helper Functions
    // =========================

    fn create_ping_test_server() -> McpServerRuntime {
        let server_info = ServerInfo {
            name: "ping-test-server".to_string(),
            version: "1.0.0".to_string(),
            description: Some("Test server for ping functionality".to_string()),
            authors: None,
            homepage: None,
            license: None,
            repository: None,
        };

        let capabilities = ServerCapabilities {
            tools: Some(ToolsCapability {
                list_changed: Some(true),
            }),
            resources: Some(ResourcesCapability {
                subscribe: Some(true),
                list_changed: Some(true),
            }),
            prompts: Some(PromptsCapability {
                list_changed: Some(true),
            }),
            ..Default::default()
        };

        McpServerRuntime::new(server_info, capabilities)
    }

    fn create_ping_test_client() -> McpClientRuntime {
        let client_info = ClientInfo {
            name: "ping-test-client".to_string(),
            version: "1.0.0".to_string(),
            authors: None,
            description: Some("Test client for ping functionality".to_string()),
            homepage: None,
            repository: None,
            license: None,
        };

        let capabilities = ClientCapabilities::default();

        McpClientRuntime::new(client_info, capabilities)
    }
}

// MCP server: JSON-RPC framing over stdio and the tool-call dispatcher

use crate::error::McpError;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo,
    ToolDescriptor, ToolsCapability, PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::Result;
use futures::{FutureExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::bytes::{Bytes, BytesMut};
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder, FramedRead};
use tracing::{debug, error, info, warn};

/// Upper bound on a single inbound JSON-RPC line
const MAX_MESSAGE_BYTES: usize = 4 * 1024 * 1024;

/// One newline-delimited frame read from the client.
#[derive(Debug)]
enum Inbound {
    Line(Bytes),
    /// A line longer than `MAX_MESSAGE_BYTES`; its bytes are skipped up to the
    /// next newline.
    Oversized,
}

/// Splits input on `\n` without interpreting the bytes. Per-line problems
/// are yielded as frames, since `FramedRead` stops after any decoder error.
struct MessageCodec {
    inner: AnyDelimiterCodec,
}

impl MessageCodec {
    fn new() -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(
                b"\n".to_vec(),
                b"\n".to_vec(),
                MAX_MESSAGE_BYTES,
            ),
        }
    }

    fn frame(
        result: Result<Option<Bytes>, AnyDelimiterCodecError>,
    ) -> std::io::Result<Option<Inbound>> {
        match result {
            Ok(line) => Ok(line.map(Inbound::Line)),
            Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => Ok(Some(Inbound::Oversized)),
            Err(AnyDelimiterCodecError::Io(e)) => Err(e),
        }
    }
}

impl Decoder for MessageCodec {
    type Item = Inbound;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Inbound>, Self::Error> {
        Self::frame(self.inner.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Inbound>, Self::Error> {
        Self::frame(self.inner.decode_eof(buf))
    }
}

fn parse_error_line(detail: impl std::fmt::Display) -> String {
    encode(&JsonRpcResponse::error(
        Value::Null,
        JsonRpcError::parse_error(detail),
    ))
}

pub struct McpServer {
    registry: ToolRegistry,
    server_info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            server_info: ServerInfo {
                name: "n8n-nodes".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Serve JSON-RPC over stdin/stdout until stdin closes
    pub async fn start(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC messages from `reader`, writing one
    /// response line per request to `writer`. Messages are handled one at a
    /// time, in arrival order.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut frames = FramedRead::new(reader, MessageCodec::new());

        while let Some(frame) = frames.next().await {
            let response = match frame? {
                Inbound::Line(bytes) => match std::str::from_utf8(&bytes) {
                    Ok(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        debug!(request = %line, "Received message");
                        self.handle_message(line).await
                    }
                    Err(e) => {
                        warn!(error = %e, "Discarding message that is not valid UTF-8");
                        Some(parse_error_line(format!("message is not valid UTF-8: {}", e)))
                    }
                },
                Inbound::Oversized => {
                    warn!(limit = MAX_MESSAGE_BYTES, "Discarding oversized message");
                    Some(parse_error_line(format!(
                        "message exceeds {} bytes",
                        MAX_MESSAGE_BYTES
                    )))
                }
            };

            if let Some(response) = response {
                writer.write_all(response.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Handle one raw message. Returns the encoded response, or `None` for
    /// notifications.
    pub async fn handle_message(&self, message: &str) -> Option<String> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => return Some(parse_error_line(e)),
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(encode(&JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid Request: {}", e)),
                )));
            }
        };

        self.handle_request(request)
            .await
            .map(|response| encode(&response))
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let notification = request.is_notification();
        let JsonRpcRequest {
            id, method, params, ..
        } = request;

        let outcome = match method.as_str() {
            "initialize" => self.initialize(params),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => to_result(&self.list_tools()),
            "tools/call" => match params.map(serde_json::from_value::<CallToolParams>) {
                Some(Ok(params)) => to_result(&self.call_tool(params).await),
                Some(Err(e)) => Err(JsonRpcError::invalid_params(format!(
                    "Invalid tools/call params: {}",
                    e
                ))),
                None => Err(JsonRpcError::invalid_params("Missing tools/call params")),
            },
            "initialized" => return None,
            m if m.starts_with("notifications/") => {
                debug!(method = m, "Received notification");
                return None;
            }
            other => Err(JsonRpcError::method_not_found(other)),
        };

        if notification {
            debug!(method = %method, "Not answering request sent as notification");
            return None;
        }
        let id = id.unwrap_or_default();

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(error) => JsonRpcResponse::error(id, error),
        })
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        if let Some(client) = &params.client_info {
            info!(
                client = %client.name,
                version = client.version.as_deref().unwrap_or("unknown"),
                protocol = params.protocol_version.as_deref().unwrap_or("unknown"),
                "Client connected"
            );
        }

        to_result(&InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: self.server_info.clone(),
        })
    }

    /// Registry contents, in registration order. Cannot fail.
    pub fn list_tools(&self) -> ListToolsResult {
        ListToolsResult {
            tools: self.registry.list(),
        }
    }

    /// Dispatch a tool call. Every outcome, including unknown tools, bad
    /// arguments, handler errors and handler panics, becomes a well-formed
    /// `CallToolResult`.
    pub async fn call_tool(&self, params: CallToolParams) -> CallToolResult {
        let CallToolParams { name, arguments } = params;

        let (descriptor, tool) = match self.registry.resolve(&name) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(tool = %name, "Unknown tool requested");
                return CallToolResult::error(e);
            }
        };

        let arguments = match check_arguments(descriptor, arguments) {
            Ok(arguments) => arguments,
            Err(e) => {
                debug!(tool = %name, error = %e, "Rejected tool arguments");
                return CallToolResult::error(e);
            }
        };

        debug!(tool = %name, "Executing tool");
        match AssertUnwindSafe(tool.execute(arguments)).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                let message = format!("{:#}", e);
                warn!(tool = %name, error = %message, "Tool execution failed");
                CallToolResult::error(message)
            }
            Err(_) => {
                error!(tool = %name, "Tool panicked");
                CallToolResult::error(format!("tool '{}' failed unexpectedly", name))
            }
        }
    }
}

/// Normalize arguments to an object and enforce the schema's required names.
fn check_arguments(descriptor: &ToolDescriptor, arguments: Value) -> Result<Value, McpError> {
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        object @ Value::Object(_) => object,
        _ => {
            return Err(McpError::ArgumentsNotObject {
                tool: descriptor.name.clone(),
            })
        }
    };

    for required in descriptor.required_arguments() {
        if arguments.get(required).map_or(true, Value::is_null) {
            return Err(McpError::MissingArgument {
                tool: descriptor.name.clone(),
                argument: required.to_string(),
            });
        }
    }

    Ok(arguments)
}

fn to_result<T: Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

fn encode(response: &JsonRpcResponse) -> String {
    match serde_json::to_string(response) {
        Ok(encoded) => encoded,
        Err(e) => {
            error!(error = %e, "Failed to encode response");
            format!(
                r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"Internal error"}}}}"#,
                JsonRpcError::INTERNAL_ERROR
            )
        }
    }
}

//! JSON-RPC Protocol Handler
//!
//! Implements the MCP method set over JSON-RPC 2.0. The same handler backs
//! the newline-delimited stdio transport and the `POST /mcp` route.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::controlplane::Dispatcher;
use crate::error::{Error, ErrorKind, Result};

/// MCP protocol revision spoken by this server
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// Standard JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// =============================================================================
// Wire Types
// =============================================================================

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// Absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// =============================================================================
// Method Dispatch
// =============================================================================

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ReadResourceParams {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct GetPromptParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

fn params<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::InvalidArguments(e.to_string()))
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Map a failed method onto a JSON-RPC error code
fn error_code(err: &Error) -> i32 {
    match err.kind() {
        ErrorKind::InvalidArguments | ErrorKind::NotFound => INVALID_PARAMS,
        ErrorKind::UnknownOperation => METHOD_NOT_FOUND,
        ErrorKind::UnknownResourceType | ErrorKind::RemoteCallFailure => INTERNAL_ERROR,
    }
}

/// Handle one request. Notifications yield `None`.
pub async fn handle_request(
    dispatcher: &Dispatcher,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    debug!(method = %request.method, "Handling MCP request");

    if request.jsonrpc != "2.0" {
        if request.is_notification() {
            warn!(version = %request.jsonrpc, "Dropping notification with unsupported jsonrpc version");
            return None;
        }
        return Some(JsonRpcResponse::error(
            request.id,
            INVALID_REQUEST,
            format!("Unsupported jsonrpc version: {}", request.jsonrpc),
        ));
    }

    let notification = request.is_notification();
    let id = request.id.clone();
    let outcome = match request.method.as_str() {
        "initialize" => Ok(initialize_result()),
        "initialized" | "notifications/initialized" => {
            debug!("Client sent initialized notification");
            Ok(json!({}))
        }
        "ping" => Ok(json!({})),

        "tools/list" => Ok(json!({ "tools": dispatcher.list_tools() })),
        "tools/call" => match params::<ToolCallParams>(request.params) {
            Ok(p) => to_value(dispatcher.call(&p.name, p.arguments).await),
            Err(e) => Err(e),
        },

        "resources/list" => Ok(json!({ "resources": dispatcher.list_resources() })),
        "resources/read" => params::<ReadResourceParams>(request.params)
            .and_then(|p| dispatcher.read_resource(&p.uri))
            .map(|contents| json!({ "contents": [contents] })),

        "prompts/list" => Ok(json!({ "prompts": dispatcher.list_prompts() })),
        "prompts/get" => params::<GetPromptParams>(request.params)
            .and_then(|p| dispatcher.get_prompt(&p.name, &p.arguments))
            .and_then(to_value),

        method => {
            warn!(method = %method, "Unknown method");
            if notification {
                return None;
            }
            return Some(JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", method),
            ));
        }
    };

    if notification {
        return None;
    }

    Some(match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => JsonRpcResponse::error(id, error_code(&e), e.to_string()),
    })
}

fn initialize_result() -> Value {
    info!("MCP client initialized");
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false },
            "resources": { "subscribe": false, "listChanged": false },
            "prompts": { "listChanged": false }
        },
        "serverInfo": {
            "name": crate::NAME,
            "version": crate::VERSION
        }
    })
}

/// Handle one raw line of input
pub async fn handle_line(dispatcher: &Dispatcher, line: &str) -> Option<JsonRpcResponse> {
    match serde_json::from_str::<JsonRpcRequest>(line) {
        Ok(request) => handle_request(dispatcher, request).await,
        Err(e) => {
            error!(error = %e, "Failed to parse request");
            Some(JsonRpcResponse::error(
                None,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            ))
        }
    }
}

// =============================================================================
// Stdio Transport
// =============================================================================

/// Serve newline-delimited JSON-RPC on stdin/stdout until EOF
pub async fn serve_stdio(dispatcher: Dispatcher) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    serve_lines(&dispatcher, stdin, tokio::io::stdout()).await
}

/// Serve JSON-RPC over any line-oriented reader/writer pair
pub async fn serve_lines<R, W>(dispatcher: &Dispatcher, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    info!("MCP server listening on stdio");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!(request = %line, "Received request");
        let Some(response) = handle_line(dispatcher, line).await else {
            continue;
        };

        let response_json = serde_json::to_string(&response)?;
        debug!(response = %response_json, "Sending response");
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!("MCP server shutdown");
    Ok(())
}

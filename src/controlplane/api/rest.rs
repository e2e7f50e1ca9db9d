//! REST API Handlers
//!
//! HTTP face of the MCP server: one route per catalog operation, plus a
//! JSON-RPC passthrough, health and metrics.

use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use super::jsonrpc::{self, JsonRpcRequest};
use crate::controlplane::Dispatcher;
use crate::error::{Error, ErrorKind};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Tool invocation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Template read request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceRequest {
    pub uri: String,
}

/// Prompt render request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPromptRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiErrorResponse {
    fn from_error(err: &Error) -> (StatusCode, Json<Self>) {
        let (status, code) = match err.kind() {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ErrorKind::InvalidArguments
            | ErrorKind::UnknownOperation
            | ErrorKind::UnknownResourceType => (StatusCode::BAD_REQUEST, "invalid_request"),
            ErrorKind::RemoteCallFailure => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        (
            status,
            Json(Self {
                error: code.into(),
                message: err.to_string(),
                details: None,
            }),
        )
    }
}

// =============================================================================
// REST Router
// =============================================================================

/// REST API router builder
pub struct RestRouter {
    dispatcher: Dispatcher,
}

impl RestRouter {
    /// Create a new REST router
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Build the Axum router
    pub fn build(self) -> Router {
        let state = AppState {
            dispatcher: self.dispatcher,
        };

        Router::new()
            // MCP endpoints
            .route("/mcp", post(json_rpc))
            .route("/mcp/tools", get(list_tools))
            .route("/mcp/call-tool", post(call_tool))
            .route("/mcp/resources", get(list_resources))
            .route("/mcp/read-resource", post(read_resource))
            .route("/mcp/prompts", get(list_prompts))
            .route("/mcp/get-prompt", post(get_prompt))
            // Operational endpoints
            .route("/health", get(health_check))
            .route("/metrics", get(metrics))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    dispatcher: Dispatcher,
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_tools(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "tools": state.dispatcher.list_tools() }))
}

/// Call a tool; failures are reported inside the envelope
async fn call_tool(
    State(state): State<AppState>,
    Json(request): Json<CallToolRequest>,
) -> impl IntoResponse {
    debug!("REST tool call: {}", request.name);
    Json(state.dispatcher.call(&request.name, request.arguments).await)
}

async fn list_resources(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "resources": state.dispatcher.list_resources() }))
}

async fn read_resource(
    State(state): State<AppState>,
    Json(request): Json<ReadResourceRequest>,
) -> impl IntoResponse {
    match state.dispatcher.read_resource(&request.uri) {
        Ok(contents) => (StatusCode::OK, Json(json!({ "contents": [contents] }))).into_response(),
        Err(e) => ApiErrorResponse::from_error(&e).into_response(),
    }
}

async fn list_prompts(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "prompts": state.dispatcher.list_prompts() }))
}

async fn get_prompt(
    State(state): State<AppState>,
    Json(request): Json<GetPromptRequest>,
) -> impl IntoResponse {
    match state.dispatcher.get_prompt(&request.name, &request.arguments) {
        Ok(prompt) => (StatusCode::OK, Json(prompt)).into_response(),
        Err(e) => ApiErrorResponse::from_error(&e).into_response(),
    }
}

/// Single JSON-RPC request over HTTP
async fn json_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    match jsonrpc::handle_request(&state.dispatcher, request).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": crate::NAME }))
}

/// Prometheus exposition
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.dispatcher.metrics().encode() {
        Ok((content_type, body)) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            ApiErrorResponse::from_error(&e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controlplane::backends::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router() -> Router {
        let dispatcher = Dispatcher::new(Arc::new(MemoryStore::new())).unwrap();
        RestRouter::new(dispatcher).build()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "healthy", "service": "rook-ceph-mcp-server" }));
    }

    #[tokio::test]
    async fn test_list_catalogs() {
        let (_, tools) = send(get_req("/mcp/tools")).await;
        assert_eq!(tools["tools"].as_array().unwrap().len(), 7);
        assert!(tools["tools"][0]["inputSchema"].is_object());

        let (_, resources) = send(get_req("/mcp/resources")).await;
        assert_eq!(resources["resources"].as_array().unwrap().len(), 4);

        let (_, prompts) = send(get_req("/mcp/prompts")).await;
        assert_eq!(prompts["prompts"][0]["name"], "setup_cluster");
    }

    #[tokio::test]
    async fn test_call_tool() {
        let (status, body) = send(post_json(
            "/mcp/call-tool",
            json!({ "name": "list_clusters", "arguments": { "namespace": "rook-ceph" } }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"][0]["text"], "No Ceph clusters found.");
    }

    #[tokio::test]
    async fn test_read_resource_miss_is_404() {
        let (status, body) = send(post_json(
            "/mcp/read-resource",
            json!({ "uri": "rook-ceph://manifests/missing" }),
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "Resource not found: rook-ceph://manifests/missing");
    }

    #[tokio::test]
    async fn test_get_prompt() {
        let (status, body) = send(post_json(
            "/mcp/get-prompt",
            json!({ "name": "troubleshoot_cluster", "arguments": { "cluster_name": "prod" } }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["messages"][0]["content"]["text"]
            .as_str()
            .unwrap()
            .contains("\"prod\""));

        let (status, _) = send(post_json("/mcp/get-prompt", json!({ "name": "nope" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_json_rpc_route() {
        let (status, body) = send(post_json(
            "/mcp",
            json!({ "jsonrpc": "2.0", "id": 9, "method": "ping" }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 9);

        let (status, _) = send(post_json(
            "/mcp",
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        ))
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_metrics_route() {
        let response = router().oneshot(get_req("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

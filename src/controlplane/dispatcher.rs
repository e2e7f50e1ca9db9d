//! Tool Dispatcher
//!
//! Routes a named tool call with a loosely-typed argument bag to the
//! matching [`RookCephClient`] method, and serves the template and prompt
//! catalogs. Every tool outcome leaves here as a [`ToolResponse`]; no error
//! escapes a tool call.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::ports::ResourceStoreRef;
use crate::error::{Error, Result};

use super::client::RookCephClient;
use super::metrics::ToolMetrics;
use super::prompts::{self, PromptInfo, PromptResult};
use super::templates::{self, ResourceContents, ResourceInfo};
use super::tools::{
    self, CreateBlockPoolInput, DeleteResourceInput, GetClusterStatusInput, ListInput, ToolInfo,
    ToolName,
};

// =============================================================================
// Response Envelope
// =============================================================================

/// One block of tool output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub r#type: String,
    pub text: String,
}

/// Result of a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub content: Vec<Content>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content {
                r#type: "text".to_string(),
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(err: &Error) -> Self {
        Self {
            is_error: true,
            ..Self::text(format!("Error: {}", err))
        }
    }

    /// Text of the first content block
    pub fn first_text(&self) -> &str {
        self.content.first().map_or("", |c| c.text.as_str())
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Entry point for every tool, template and prompt request
#[derive(Clone)]
pub struct Dispatcher {
    client: RookCephClient,
    metrics: ToolMetrics,
}

impl Dispatcher {
    pub fn new(store: ResourceStoreRef) -> Result<Self> {
        Ok(Self {
            client: RookCephClient::new(store),
            metrics: ToolMetrics::new()?,
        })
    }

    pub fn metrics(&self) -> &ToolMetrics {
        &self.metrics
    }

    /// Tool catalog
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        tools::tool_catalog()
    }

    /// Invoke a tool by name
    pub async fn call(&self, name: &str, arguments: Value) -> ToolResponse {
        let started = Instant::now();
        debug!(tool = %name, "Calling tool");

        let tool = ToolName::parse(name);
        let label = tool.as_ref().map_or("unknown", |t| t.as_str());
        let result = match tool {
            Ok(tool) => self.invoke(tool, arguments).await,
            Err(e) => Err(e),
        };

        self.metrics
            .observe(label, result.is_ok(), started.elapsed().as_secs_f64());

        match result {
            Ok(text) => ToolResponse::text(text),
            Err(e) => {
                // Requests rejected before reaching the store are the caller's mistake
                if e.is_local() {
                    info!(tool = %name, kind = ?e.kind(), "Tool call rejected: {}", e);
                } else {
                    warn!(tool = %name, kind = ?e.kind(), "Tool call failed: {}", e);
                }
                ToolResponse::error(&e)
            }
        }
    }

    async fn invoke(&self, tool: ToolName, arguments: Value) -> Result<String> {
        let client = &self.client;
        match tool {
            ToolName::ListClusters => {
                let input: ListInput = decode_args(arguments)?;
                client.list_clusters(&input.namespace).await
            }
            ToolName::GetClusterStatus => {
                let input: GetClusterStatusInput = decode_args(arguments)?;
                client.get_cluster_status(&input.name, &input.namespace).await
            }
            ToolName::ListBlockPools => {
                let input: ListInput = decode_args(arguments)?;
                client.list_block_pools(&input.namespace).await
            }
            ToolName::ListFilesystems => {
                let input: ListInput = decode_args(arguments)?;
                client.list_filesystems(&input.namespace).await
            }
            ToolName::ListObjectStores => {
                let input: ListInput = decode_args(arguments)?;
                client.list_object_stores(&input.namespace).await
            }
            ToolName::CreateBlockPool => {
                let input: CreateBlockPoolInput = decode_args(arguments)?;
                client.create_block_pool(&input).await
            }
            ToolName::DeleteResource => {
                let input: DeleteResourceInput = decode_args(arguments)?;
                client
                    .delete_resource(&input.r#type, &input.name, &input.namespace)
                    .await
            }
        }
    }

    /// Template catalog
    pub fn list_resources(&self) -> Vec<ResourceInfo> {
        templates::resource_catalog()
    }

    /// Read a template by URI
    pub fn read_resource(&self, uri: &str) -> Result<ResourceContents> {
        templates::read_template(uri)
    }

    /// Prompt catalog
    pub fn list_prompts(&self) -> Vec<PromptInfo> {
        prompts::prompt_catalog()
    }

    /// Render a prompt by name
    pub fn get_prompt(&self, name: &str, arguments: &Value) -> Result<PromptResult> {
        prompts::render_prompt(name, arguments)
    }
}

/// Decode an argument bag, treating a missing bag as empty
fn decode_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controlplane::backends::MemoryStore;
    use crate::controlplane::metrics::{OUTCOME_ERROR, OUTCOME_SUCCESS};
    use crate::crd::ResourceKind;
    use serde_json::json;
    use std::sync::Arc;

    fn dispatcher() -> (Arc<MemoryStore>, Dispatcher) {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Dispatcher::new(store.clone()).unwrap();
        (store, dispatcher)
    }

    #[tokio::test]
    async fn test_null_arguments_use_defaults() {
        let (_, d) = dispatcher();
        let response = d.call("list_block_pools", Value::Null).await;
        assert!(!response.is_error);
        assert_eq!(response.first_text(), "No Ceph block pools found.");
        assert_eq!(d.metrics().call_count("list_block_pools", OUTCOME_SUCCESS), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_envelope() {
        let (store, d) = dispatcher();
        let response = d.call("format_disks", json!({})).await;
        assert!(response.is_error);
        assert_eq!(response.first_text(), "Error: Unknown tool: format_disks");
        assert_eq!(store.calls(), 0);
        assert_eq!(d.metrics().call_count("unknown", OUTCOME_ERROR), 1);
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let (store, d) = dispatcher();
        let response = d.call("get_cluster_status", json!({})).await;
        assert!(response.is_error);
        assert!(response.first_text().starts_with("Error: Invalid arguments: "));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_bogus_type() {
        let (store, d) = dispatcher();
        let response = d
            .call("delete_resource", json!({ "type": "bogus", "name": "x" }))
            .await;
        assert_eq!(
            response,
            ToolResponse {
                content: vec![Content {
                    r#type: "text".into(),
                    text: "Error: Failed to delete resource: Unknown resource type: bogus".into(),
                }],
                is_error: true,
            }
        );
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (store, d) = dispatcher();
        let response = d
            .call(
                "create_block_pool",
                json!({ "name": "ecpool", "erasureCoded": { "dataChunks": 2, "codingChunks": 1 } }),
            )
            .await;
        assert_eq!(response.first_text(), "Successfully created block pool: ecpool");
        assert_eq!(store.created()[0].0, ResourceKind::BlockPool);

        let listing = d.call("list_block_pools", json!({ "namespace": "rook-ceph" })).await;
        assert_eq!(
            listing.first_text(),
            "Found 1 block pool(s):\n- ecpool (Unknown) - Erasure Coded: 2+1"
        );
    }

    #[test]
    fn test_envelope_serialization() {
        let ok = serde_json::to_value(ToolResponse::text("done")).unwrap();
        assert_eq!(ok, json!({ "content": [{ "type": "text", "text": "done" }] }));

        let err = ToolResponse::error(&Error::UnknownOperation("x".into()));
        let err = serde_json::to_value(err).unwrap();
        assert_eq!(err["isError"], true);
        assert_eq!(err["content"][0]["text"], "Error: Unknown tool: x");
    }

    #[test]
    fn test_catalog_lookups() {
        let (_, d) = dispatcher();
        assert_eq!(d.list_tools().len(), 7);
        assert_eq!(d.list_resources().len(), 4);
        assert_eq!(d.list_prompts().len(), 2);
        assert!(d.read_resource("rook-ceph://manifests/cluster").is_ok());
        assert!(d.get_prompt("nope", &Value::Null).is_err());
    }
}

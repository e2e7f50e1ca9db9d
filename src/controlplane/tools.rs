//! Tool catalog and per-tool input types.
//!
//! Each tool decodes its loosely-typed argument bag into one of the input
//! structs below. Defaults live on the types themselves, so a missing
//! `namespace` becomes `rook-ceph` during deserialization and the generated
//! JSON schema advertises the same default.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::crd::{Replication, ResourceKind, DEFAULT_NAMESPACE, DEFAULT_REPLICA_SIZE};
use crate::error::{Error, Result};

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// Treat an explicit null or empty namespace like a missing one
fn namespace_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let namespace = Option::<String>::deserialize(deserializer)?;
    Ok(namespace
        .filter(|ns| !ns.is_empty())
        .unwrap_or_else(default_namespace))
}

fn default_replica_size() -> u32 {
    DEFAULT_REPLICA_SIZE
}

// ============================================================================
// Input Types
// ============================================================================

/// Input for the namespace-scoped list tools
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListInput {
    /// Kubernetes namespace
    #[serde(default = "default_namespace", deserialize_with = "namespace_or_default")]
    pub namespace: String,
}

/// Input for fetching a single cluster's status
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetClusterStatusInput {
    /// Name of the Ceph cluster
    pub name: String,
    /// Kubernetes namespace
    #[serde(default = "default_namespace", deserialize_with = "namespace_or_default")]
    pub namespace: String,
}

/// Replicated protection settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReplicatedInput {
    /// Number of replicas
    #[serde(default = "default_replica_size")]
    pub size: u32,
}

/// Erasure-coded protection settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErasureCodedInput {
    /// Number of data chunks
    pub data_chunks: u32,
    /// Number of coding chunks
    pub coding_chunks: u32,
}

/// Input for creating a block pool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockPoolInput {
    /// Name of the block pool
    pub name: String,
    /// Kubernetes namespace
    #[serde(default = "default_namespace", deserialize_with = "namespace_or_default")]
    pub namespace: String,
    /// Replicated pool configuration
    #[serde(default)]
    pub replicated: Option<ReplicatedInput>,
    /// Erasure coded pool configuration
    #[serde(default)]
    pub erasure_coded: Option<ErasureCodedInput>,
}

impl CreateBlockPoolInput {
    /// Resolve the requested protection mode.
    ///
    /// Nothing requested means three replicas. Asking for both modes at once
    /// is rejected.
    pub fn replication(&self) -> Result<Replication> {
        match (&self.replicated, &self.erasure_coded) {
            (Some(_), Some(_)) => Err(Error::InvalidArguments(
                "replicated and erasureCoded are mutually exclusive".to_string(),
            )),
            (Some(r), None) => Ok(Replication::Replicated { size: r.size }),
            (None, Some(ec)) => Ok(Replication::ErasureCoded {
                data_chunks: ec.data_chunks,
                coding_chunks: ec.coding_chunks,
            }),
            (None, None) => Ok(Replication::Replicated {
                size: DEFAULT_REPLICA_SIZE,
            }),
        }
    }
}

/// Input for deleting a resource
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteResourceInput {
    /// Type of resource to delete
    #[schemars(with = "ResourceKind")]
    pub r#type: String,
    /// Name of the resource
    pub name: String,
    /// Kubernetes namespace
    #[serde(default = "default_namespace", deserialize_with = "namespace_or_default")]
    pub namespace: String,
}

// ============================================================================
// Catalog
// ============================================================================

/// Every tool the server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    ListClusters,
    GetClusterStatus,
    ListBlockPools,
    ListFilesystems,
    ListObjectStores,
    CreateBlockPool,
    DeleteResource,
}

impl ToolName {
    pub const ALL: [ToolName; 7] = [
        ToolName::ListClusters,
        ToolName::GetClusterStatus,
        ToolName::ListBlockPools,
        ToolName::ListFilesystems,
        ToolName::ListObjectStores,
        ToolName::CreateBlockPool,
        ToolName::DeleteResource,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ToolName::ListClusters => "list_clusters",
            ToolName::GetClusterStatus => "get_cluster_status",
            ToolName::ListBlockPools => "list_block_pools",
            ToolName::ListFilesystems => "list_filesystems",
            ToolName::ListObjectStores => "list_object_stores",
            ToolName::CreateBlockPool => "create_block_pool",
            ToolName::DeleteResource => "delete_resource",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ToolName::ListClusters => "List all Ceph clusters in the Kubernetes environment",
            ToolName::GetClusterStatus => "Get the status of a specific Ceph cluster",
            ToolName::ListBlockPools => "List all Ceph block pools",
            ToolName::ListFilesystems => "List all Ceph filesystems",
            ToolName::ListObjectStores => "List all Ceph object stores",
            ToolName::CreateBlockPool => "Create a new Ceph block pool",
            ToolName::DeleteResource => "Delete a Rook Ceph resource",
        }
    }

    /// JSON schema of the tool's input type
    pub fn input_schema(self) -> Value {
        let schema = match self {
            ToolName::ListClusters
            | ToolName::ListBlockPools
            | ToolName::ListFilesystems
            | ToolName::ListObjectStores => schemars::schema_for!(ListInput),
            ToolName::GetClusterStatus => schemars::schema_for!(GetClusterStatusInput),
            ToolName::CreateBlockPool => schemars::schema_for!(CreateBlockPoolInput),
            ToolName::DeleteResource => schemars::schema_for!(DeleteResourceInput),
        };
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Look a tool up by its wire name
    pub fn parse(name: &str) -> Result<Self> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| Error::UnknownOperation(name.to_string()))
    }
}

/// Catalog entry for a single tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl From<ToolName> for ToolInfo {
    fn from(tool: ToolName) -> Self {
        Self {
            name: tool.as_str().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
        }
    }
}

/// The full tool catalog, in a stable order
pub fn tool_catalog() -> Vec<ToolInfo> {
    ToolName::ALL.into_iter().map(ToolInfo::from).collect()
}

//! Rook Ceph Custom Resource types
//!
//! Client-side views of the four Rook resource kinds this server addresses:
//! - CephCluster: the Ceph cluster itself
//! - CephBlockPool: RADOS pool backing RBD images
//! - CephFilesystem: CephFS with its metadata servers
//! - CephObjectStore: RGW gateway with its pools
//!
//! Rook installs and owns the CRD schemas, so these types only describe the
//! fields the server reads or writes. Everything is decoded leniently; a
//! missing field renders as [`UNKNOWN`] instead of failing a whole listing.

pub mod ceph_block_pool;
pub mod ceph_cluster;
pub mod ceph_filesystem;
pub mod ceph_object_store;

pub use ceph_block_pool::*;
pub use ceph_cluster::*;
pub use ceph_filesystem::*;
pub use ceph_object_store::*;

use crate::error::Error;
use kube::api::ApiResource;
use kube::Resource;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// API group shared by every Rook Ceph resource
pub const ROOK_GROUP: &str = "ceph.rook.io";

/// API version shared by every Rook Ceph resource
pub const ROOK_VERSION: &str = "v1";

/// Namespace used when a caller does not name one
pub const DEFAULT_NAMESPACE: &str = "rook-ceph";

/// Placeholder rendered for any field the control plane has not populated
pub const UNKNOWN: &str = "Unknown";

// =============================================================================
// Resource Kind
// =============================================================================

/// The four resource kinds the server can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Cluster,
    BlockPool,
    Filesystem,
    ObjectStore,
}

impl ResourceKind {
    /// Every kind, in catalog order
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Cluster,
        ResourceKind::BlockPool,
        ResourceKind::Filesystem,
        ResourceKind::ObjectStore,
    ];

    /// Short type name accepted by `delete_resource`
    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Cluster => "cluster",
            ResourceKind::BlockPool => "blockpool",
            ResourceKind::Filesystem => "filesystem",
            ResourceKind::ObjectStore => "objectstore",
        }
    }

    /// Plural collection name on the API server
    pub const fn plural(self) -> &'static str {
        match self {
            ResourceKind::Cluster => "cephclusters",
            ResourceKind::BlockPool => "cephblockpools",
            ResourceKind::Filesystem => "cephfilesystems",
            ResourceKind::ObjectStore => "cephobjectstores",
        }
    }

    /// Kubernetes `kind` field
    pub const fn kind(self) -> &'static str {
        match self {
            ResourceKind::Cluster => "CephCluster",
            ResourceKind::BlockPool => "CephBlockPool",
            ResourceKind::Filesystem => "CephFilesystem",
            ResourceKind::ObjectStore => "CephObjectStore",
        }
    }

    /// Human label used in list summaries
    pub const fn label(self) -> &'static str {
        match self {
            ResourceKind::Cluster => "Ceph cluster",
            ResourceKind::BlockPool => "block pool",
            ResourceKind::Filesystem => "filesystem",
            ResourceKind::ObjectStore => "object store",
        }
    }

    /// Message returned by a list that found nothing
    pub const fn empty_message(self) -> &'static str {
        match self {
            ResourceKind::Cluster => "No Ceph clusters found.",
            ResourceKind::BlockPool => "No Ceph block pools found.",
            ResourceKind::Filesystem => "No Ceph filesystems found.",
            ResourceKind::ObjectStore => "No Ceph object stores found.",
        }
    }

    /// Dynamic API descriptor used to address the collection
    pub fn api_resource(self) -> ApiResource {
        match self {
            ResourceKind::Cluster => ApiResource::erase::<CephCluster>(&()),
            ResourceKind::BlockPool => ApiResource::erase::<CephBlockPool>(&()),
            ResourceKind::Filesystem => ApiResource::erase::<CephFilesystem>(&()),
            ResourceKind::ObjectStore => ApiResource::erase::<CephObjectStore>(&()),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownResourceType(s.to_string()))
    }
}

// =============================================================================
// Common Behaviour
// =============================================================================

/// A Rook resource that can be listed and summarized
pub trait CephResource: Resource<DynamicType = ()> + DeserializeOwned + Serialize {
    /// Which of the four kinds this type is
    const KIND: ResourceKind;

    /// Status phase, or [`UNKNOWN`] before the operator has reported one
    fn phase(&self) -> &str;

    /// One line of a list summary
    fn summary_line(&self) -> String;

    /// Object name
    fn object_name(&self) -> &str {
        self.meta().name.as_deref().unwrap_or(UNKNOWN)
    }

    /// Object namespace
    fn object_namespace(&self) -> &str {
        self.meta().namespace.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Render an optional value, falling back to [`UNKNOWN`]
pub(crate) fn or_unknown<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| UNKNOWN.to_string(), |v| v.to_string())
}

//! CephObjectStore CRD
//!
//! An S3/Swift endpoint served by RGW gateways on top of a metadata pool and
//! a data pool.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::{or_unknown, CephResource, PoolSpec, ResourceKind, UNKNOWN};

/// CephObjectStore describes an RGW object store managed by Rook.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize)]
#[kube(
    group = "ceph.rook.io",
    version = "v1",
    kind = "CephObjectStore",
    plural = "cephobjectstores",
    status = "CephObjectStoreStatus",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CephObjectStoreSpec {
    #[serde(default)]
    pub metadata_pool: Option<PoolSpec>,

    #[serde(default)]
    pub data_pool: Option<PoolSpec>,

    #[serde(default)]
    pub gateway: Option<GatewaySpec>,
}

/// RGW gateway deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySpec {
    /// Gateway flavour, normally "s3"
    #[serde(default)]
    pub r#type: Option<String>,

    /// Plain HTTP port
    #[serde(default)]
    pub port: Option<u16>,

    /// TLS port
    #[serde(default)]
    pub secure_port: Option<u16>,

    /// Number of gateway pods
    #[serde(default)]
    pub instances: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CephObjectStoreStatus {
    #[serde(default)]
    pub phase: Option<String>,
}

impl CephObjectStore {
    /// Gateway instance count, if specified
    pub fn gateway_instances(&self) -> Option<u32> {
        self.spec.gateway.as_ref().and_then(|g| g.instances)
    }
}

impl CephResource for CephObjectStore {
    const KIND: ResourceKind = ResourceKind::ObjectStore;

    fn phase(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .unwrap_or(UNKNOWN)
    }

    fn summary_line(&self) -> String {
        format!(
            "- {} ({}) - Gateway instances: {}",
            self.object_name(),
            self.phase(),
            or_unknown(self.gateway_instances())
        )
    }
}

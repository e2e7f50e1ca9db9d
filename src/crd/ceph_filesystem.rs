//! CephFilesystem CRD
//!
//! A shared filesystem: one metadata pool, one or more data pools, and a set
//! of metadata servers (MDS).

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::{or_unknown, CephResource, PoolSpec, ResourceKind, UNKNOWN};

/// CephFilesystem describes a CephFS instance managed by Rook.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize)]
#[kube(
    group = "ceph.rook.io",
    version = "v1",
    kind = "CephFilesystem",
    plural = "cephfilesystems",
    status = "CephFilesystemStatus",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CephFilesystemSpec {
    #[serde(default)]
    pub metadata_pool: Option<PoolSpec>,

    #[serde(default)]
    pub data_pools: Vec<PoolSpec>,

    #[serde(default)]
    pub metadata_server: Option<MetadataServerSpec>,
}

/// Metadata server replica settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataServerSpec {
    /// Number of active MDS daemons
    #[serde(default)]
    pub active_count: Option<u32>,

    /// Run a hot standby for each active daemon
    #[serde(default)]
    pub active_standby: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CephFilesystemStatus {
    #[serde(default)]
    pub phase: Option<String>,
}

impl CephFilesystem {
    /// Active metadata server count, if specified
    pub fn active_mds(&self) -> Option<u32> {
        self.spec.metadata_server.as_ref().and_then(|m| m.active_count)
    }
}

impl CephResource for CephFilesystem {
    const KIND: ResourceKind = ResourceKind::Filesystem;

    fn phase(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .unwrap_or(UNKNOWN)
    }

    fn summary_line(&self) -> String {
        format!(
            "- {} ({}) - MDS: {}",
            self.object_name(),
            self.phase(),
            or_unknown(self.active_mds())
        )
    }
}

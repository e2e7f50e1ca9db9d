//! CephCluster CRD
//!
//! The top-level Rook resource describing a Ceph cluster: daemon counts,
//! dashboard and monitoring switches, and the health reported back by the
//! operator.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::{or_unknown, CephResource, ResourceKind, UNKNOWN};

// =============================================================================
// CephCluster CRD
// =============================================================================

/// CephCluster describes a Ceph cluster managed by the Rook operator.
#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize)]
#[kube(
    group = "ceph.rook.io",
    version = "v1",
    kind = "CephCluster",
    plural = "cephclusters",
    status = "CephClusterStatus",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct CephClusterSpec {
    /// Ceph container image
    #[serde(default)]
    pub ceph_version: Option<CephVersionSpec>,

    /// Host path for daemon state
    #[serde(default)]
    pub data_dir_host_path: Option<String>,

    /// Monitor settings
    #[serde(default)]
    pub mon: Option<MonSpec>,

    /// Manager settings
    #[serde(default)]
    pub mgr: Option<MgrSpec>,

    /// Dashboard settings
    #[serde(default)]
    pub dashboard: Option<DashboardSpec>,

    /// Prometheus monitoring settings
    #[serde(default)]
    pub monitoring: Option<MonitoringSpec>,

    /// Network provider
    #[serde(default)]
    pub network: Option<NetworkSpec>,

    /// RBD mirroring
    #[serde(default)]
    pub rbd_mirroring: Option<RbdMirroringSpec>,

    /// Storage device selection
    #[serde(default)]
    pub storage: Option<StorageScopeSpec>,
}

// =============================================================================
// Sub-Types
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CephVersionSpec {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonSpec {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub allow_multiple_per_node: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MgrSpec {
    #[serde(default)]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSpec {
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSpec {
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RbdMirroringSpec {
    #[serde(default)]
    pub workers: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageScopeSpec {
    #[serde(default)]
    pub use_all_nodes: Option<bool>,
    #[serde(default)]
    pub use_all_devices: Option<bool>,
}

// =============================================================================
// Status
// =============================================================================

/// Status written by the Rook operator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CephClusterStatus {
    /// Current phase (Progressing, Ready, Failure, ...)
    #[serde(default)]
    pub phase: Option<String>,

    /// Human-readable detail for the phase
    #[serde(default)]
    pub message: Option<String>,

    /// Health as reported by Ceph
    #[serde(default)]
    pub ceph: Option<CephHealthStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CephHealthStatus {
    /// HEALTH_OK, HEALTH_WARN or HEALTH_ERR
    #[serde(default)]
    pub health: Option<String>,

    #[serde(default)]
    pub last_checked: Option<String>,
}

// =============================================================================
// Implementations
// =============================================================================

impl CephCluster {
    /// Ceph health, or [`UNKNOWN`]
    pub fn health(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|s| s.ceph.as_ref())
            .and_then(|c| c.health.as_deref())
            .unwrap_or(UNKNOWN)
    }

    /// Status message, or "No message"
    pub fn message(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|s| s.message.as_deref())
            .unwrap_or("No message")
    }

    /// Full multi-line status report
    pub fn status_report(&self) -> String {
        let spec = &self.spec;
        [
            format!("Cluster: {}", self.object_name()),
            format!("Namespace: {}", self.object_namespace()),
            format!("Phase: {}", self.phase()),
            format!("Health: {}", self.health()),
            format!("Message: {}", self.message()),
            format!(
                "Ceph Version: {}",
                or_unknown(spec.ceph_version.as_ref().and_then(|v| v.image.as_deref()))
            ),
            format!(
                "Monitor Count: {}",
                or_unknown(spec.mon.as_ref().and_then(|m| m.count))
            ),
            format!(
                "Manager Count: {}",
                or_unknown(spec.mgr.as_ref().and_then(|m| m.count))
            ),
            format!(
                "Dashboard Enabled: {}",
                or_unknown(spec.dashboard.as_ref().and_then(|d| d.enabled))
            ),
            format!(
                "Monitoring Enabled: {}",
                or_unknown(spec.monitoring.as_ref().and_then(|m| m.enabled))
            ),
        ]
        .join("\n")
    }
}

impl CephResource for CephCluster {
    const KIND: ResourceKind = ResourceKind::Cluster;

    fn phase(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .unwrap_or(UNKNOWN)
    }

    fn summary_line(&self) -> String {
        format!(
            "- {} in {} ({}) - Health: {}",
            self.object_name(),
            self.object_namespace(),
            self.phase(),
            self.health()
        )
    }
}

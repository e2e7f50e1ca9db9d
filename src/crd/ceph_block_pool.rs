//! CephBlockPool CRD
//!
//! A RADOS pool protected either by replication or by erasure coding, never
//! both. The wire format carries the two modes as sibling keys; in Rust they
//! are the two variants of [`Replication`].

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::{CephResource, ResourceKind, UNKNOWN};

/// Failure domain stamped on every pool this server creates
pub const DEFAULT_FAILURE_DOMAIN: &str = "host";

/// Replica count used when a caller does not choose a protection mode
pub const DEFAULT_REPLICA_SIZE: u32 = 3;

// =============================================================================
// CephBlockPool CRD
// =============================================================================

/// Pool settings shared by block pools and by the pools embedded in
/// filesystems and object stores.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[kube(
    group = "ceph.rook.io",
    version = "v1",
    kind = "CephBlockPool",
    plural = "cephblockpools",
    status = "CephBlockPoolStatus",
    namespaced,
    schema = "disabled"
)]
#[serde(from = "PoolSpecFields", into = "PoolSpecFields")]
pub struct PoolSpec {
    /// CRUSH failure domain (host, osd, zone, ...)
    pub failure_domain: Option<String>,

    /// Data protection mode
    pub replication: Option<Replication>,
}

/// Data protection for a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replication {
    /// Full copies of every object
    Replicated { size: u32 },
    /// Objects split into data chunks plus coding chunks
    ErasureCoded { data_chunks: u32, coding_chunks: u32 },
}

impl std::fmt::Display for Replication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Replication::Replicated { size } => write!(f, "Replicated: {}x", size),
            Replication::ErasureCoded {
                data_chunks,
                coding_chunks,
            } => write!(f, "Erasure Coded: {}+{}", data_chunks, coding_chunks),
        }
    }
}

// =============================================================================
// Wire Shape
// =============================================================================

/// Pool spec exactly as it appears on the API server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSpecFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicated: Option<ReplicatedFields>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erasure_coded: Option<ErasureCodedFields>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicatedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErasureCodedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_chunks: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_chunks: Option<u32>,
}

impl From<PoolSpecFields> for PoolSpec {
    fn from(fields: PoolSpecFields) -> Self {
        // A partially specified mode is treated as absent; replicated is
        // checked first when a malformed object carries both.
        let replicated = fields
            .replicated
            .and_then(|r| r.size)
            .map(|size| Replication::Replicated { size });
        let erasure_coded = fields.erasure_coded.and_then(|e| {
            Some(Replication::ErasureCoded {
                data_chunks: e.data_chunks?,
                coding_chunks: e.coding_chunks?,
            })
        });

        Self {
            failure_domain: fields.failure_domain,
            replication: replicated.or(erasure_coded),
        }
    }
}

impl From<PoolSpec> for PoolSpecFields {
    fn from(spec: PoolSpec) -> Self {
        let mut fields = PoolSpecFields {
            failure_domain: spec.failure_domain,
            ..Default::default()
        };
        match spec.replication {
            Some(Replication::Replicated { size }) => {
                fields.replicated = Some(ReplicatedFields { size: Some(size) });
            }
            Some(Replication::ErasureCoded {
                data_chunks,
                coding_chunks,
            }) => {
                fields.erasure_coded = Some(ErasureCodedFields {
                    data_chunks: Some(data_chunks),
                    coding_chunks: Some(coding_chunks),
                });
            }
            None => {}
        }
        fields
    }
}

// =============================================================================
// Status
// =============================================================================

/// Status written by the Rook operator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CephBlockPoolStatus {
    #[serde(default)]
    pub phase: Option<String>,
}

// =============================================================================
// Implementations
// =============================================================================

impl PoolSpec {
    /// Spec for a new pool on the default failure domain
    pub fn with_replication(replication: Replication) -> Self {
        Self {
            failure_domain: Some(DEFAULT_FAILURE_DOMAIN.to_string()),
            replication: Some(replication),
        }
    }

    /// Replication descriptor, or [`UNKNOWN`] when no mode is set
    pub fn replication_summary(&self) -> String {
        self.replication
            .map_or_else(|| UNKNOWN.to_string(), |r| r.to_string())
    }
}

impl CephResource for CephBlockPool {
    const KIND: ResourceKind = ResourceKind::BlockPool;

    fn phase(&self) -> &str {
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .unwrap_or(UNKNOWN)
    }

    fn summary_line(&self) -> String {
        format!(
            "- {} ({}) - {}",
            self.object_name(),
            self.phase(),
            self.spec.replication_summary()
        )
    }
}

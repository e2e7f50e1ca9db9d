//! Rook Ceph MCP Server
//!
//! Exposes the Rook Ceph custom resources of a Kubernetes cluster as Model
//! Context Protocol tools, manifest templates and guided prompts.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         Transports                             │
//! │   ┌──────────────────────┐     ┌───────────────────────────┐   │
//! │   │  JSON-RPC (stdio)    │     │   REST + JSON-RPC (HTTP)  │   │
//! │   └──────────┬───────────┘     └─────────────┬─────────────┘   │
//! │              └───────────────┬───────────────┘                 │
//! │                   ┌──────────┴──────────┐                      │
//! │                   │     Dispatcher      │ templates, prompts   │
//! │                   └──────────┬──────────┘                      │
//! │                   ┌──────────┴──────────┐                      │
//! │                   │   RookCephClient    │                      │
//! │                   └──────────┬──────────┘                      │
//! ├──────────────────────────────┼─────────────────────────────────┤
//! │                    ResourceStore port                          │
//! │   ┌──────────────────────┐   │   ┌───────────────────────────┐ │
//! │   │  KubeStore (kube-rs) │───┴───│  MemoryStore (standalone) │ │
//! │   └──────────────────────┘       └───────────────────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`controlplane`]: Dispatcher, resource client, catalogs and transports
//! - [`crd`]: Rook Ceph custom resource types
//! - [`domain`]: Store port
//! - [`error`]: Error types and handling

pub mod controlplane;
pub mod crd;
pub mod domain;
pub mod error;

// Re-export commonly used types
pub use controlplane::{
    serve_stdio, ApiServer, ApiServerConfig, Dispatcher, KubeStore, MemoryStore, RookCephClient,
    StoreFactory, ToolResponse,
};

pub use crd::{
    CephBlockPool, CephCluster, CephFilesystem, CephObjectStore, CephResource, PoolSpec,
    Replication, ResourceKind,
};

pub use domain::ports::{ResourceStore, ResourceStoreRef};

pub use error::{Error, ErrorKind, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name reported to clients
pub const NAME: &str = env!("CARGO_PKG_NAME");

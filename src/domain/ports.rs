//! Domain Ports - the boundary between the server and the control plane
//!
//! The control plane is treated as an opaque CRUD store of namespaced custom
//! objects. Adapters in `controlplane::backends` implement [`ResourceStore`]
//! against a live API server or an in-memory map.

use crate::crd::ResourceKind;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

// =============================================================================
// Resource Store Port
// =============================================================================

/// Port for namespaced custom-object CRUD
///
/// Objects cross this boundary as raw JSON; typing them is the client's job.
/// Every method is one round trip and never waits for reconciliation.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// List every object of `kind` in `namespace`, in store order
    async fn list(&self, kind: ResourceKind, namespace: &str) -> Result<Vec<Value>>;

    /// Fetch one object by name
    async fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Value>;

    /// Submit a new object
    async fn create(&self, kind: ResourceKind, namespace: &str, object: Value) -> Result<()>;

    /// Delete an object by name
    async fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<()>;

    /// Get store name, for logs
    fn store_name(&self) -> &str;
}

pub type ResourceStoreRef = Arc<dyn ResourceStore>;

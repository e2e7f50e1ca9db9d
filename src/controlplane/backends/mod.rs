//! Resource Store Adapters
//!
//! Provides adapters for the [`ResourceStore`](crate::domain::ports::ResourceStore) port:
//! - Kubernetes: the live control plane
//! - Memory: an in-process map for standalone runs and tests

pub mod kube;
pub mod memory;

pub use self::kube::*;
pub use self::memory::*;

use crate::domain::ports::ResourceStoreRef;
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

/// Factory for creating store adapters
pub struct StoreFactory;

impl StoreFactory {
    /// Connect the store selected by configuration
    pub async fn connect(standalone: bool) -> Result<ResourceStoreRef> {
        let store: ResourceStoreRef = if standalone {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(KubeStore::try_default().await?)
        };
        info!("Using {} resource store", store.store_name());
        Ok(store)
    }
}

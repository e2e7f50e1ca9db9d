//! In-Memory Store Adapter
//!
//! Keeps objects in process memory. Used by standalone mode and by tests,
//! where it also records every call so callers can assert on traffic.

use crate::crd::{ResourceKind, ROOK_GROUP};
use crate::domain::ports::ResourceStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

// =============================================================================
// State
// =============================================================================

/// Collection key: (plural, namespace)
type CollectionKey = (&'static str, String);

#[derive(Debug, Default)]
struct MemoryState {
    /// Objects per collection, in insertion order
    collections: BTreeMap<CollectionKey, Vec<Value>>,
    /// Number of store calls made
    calls: usize,
    /// Objects submitted through `create`
    created: Vec<(ResourceKind, Value)>,
}

impl MemoryState {
    fn collection(&mut self, kind: ResourceKind, namespace: &str) -> &mut Vec<Value> {
        self.collections
            .entry((kind.plural(), namespace.to_string()))
            .or_default()
    }
}

fn object_name(object: &Value) -> Option<&str> {
    object.pointer("/metadata/name").and_then(Value::as_str)
}

/// Messages follow the API server's wording
fn not_found(kind: ResourceKind, namespace: &str, name: &str) -> Error {
    Error::ResourceNotFound {
        kind: kind.kind().into(),
        namespace: namespace.into(),
        name: name.into(),
        message: format!("{}.{} \"{}\" not found", kind.plural(), ROOK_GROUP, name),
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Store backed by an ordered in-process map
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without counting it as a call
    pub fn insert(&self, kind: ResourceKind, namespace: &str, object: Value) {
        self.state.lock().collection(kind, namespace).push(object);
    }

    /// Number of store calls made so far
    pub fn calls(&self) -> usize {
        self.state.lock().calls
    }

    /// Objects submitted through `create`, oldest first
    pub fn created(&self) -> Vec<(ResourceKind, Value)> {
        self.state.lock().created.clone()
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list(&self, kind: ResourceKind, namespace: &str) -> Result<Vec<Value>> {
        let mut state = self.state.lock();
        state.calls += 1;
        Ok(state.collection(kind, namespace).clone())
    }

    async fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Value> {
        let mut state = self.state.lock();
        state.calls += 1;
        state
            .collection(kind, namespace)
            .iter()
            .find(|o| object_name(o) == Some(name))
            .cloned()
            .ok_or_else(|| not_found(kind, namespace, name))
    }

    async fn create(&self, kind: ResourceKind, namespace: &str, object: Value) -> Result<()> {
        let name = object_name(&object)
            .ok_or_else(|| Error::InvalidArguments("object has no metadata.name".into()))?
            .to_string();

        let mut state = self.state.lock();
        state.calls += 1;
        state.created.push((kind, object.clone()));

        let collection = state.collection(kind, namespace);
        if collection.iter().any(|o| object_name(o) == Some(name.as_str())) {
            return Err(Error::ResourceExists {
                kind: kind.kind().into(),
                namespace: namespace.into(),
                message: format!("{}.{} \"{}\" already exists", kind.plural(), ROOK_GROUP, name),
                name,
            });
        }
        collection.push(object);
        debug!("Stored {} {}/{}", kind.plural(), namespace, name);
        Ok(())
    }

    async fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.calls += 1;

        let collection = state.collection(kind, namespace);
        let position = collection
            .iter()
            .position(|o| object_name(o) == Some(name))
            .ok_or_else(|| not_found(kind, namespace, name))?;
        collection.remove(position);
        Ok(())
    }

    fn store_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn named(name: &str) -> Value {
        json!({ "metadata": { "name": name, "namespace": "rook-ceph" } })
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.insert(ResourceKind::BlockPool, "rook-ceph", named("b"));
        store.insert(ResourceKind::BlockPool, "rook-ceph", named("a"));

        let items = store.list(ResourceKind::BlockPool, "rook-ceph").await.unwrap();
        let names: Vec<_> = items.iter().filter_map(object_name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_collections_are_scoped() {
        let store = MemoryStore::new();
        store.insert(ResourceKind::BlockPool, "rook-ceph", named("p"));

        assert!(store.list(ResourceKind::BlockPool, "other").await.unwrap().is_empty());
        assert!(store.list(ResourceKind::Filesystem, "rook-ceph").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let store = MemoryStore::new();
        store
            .create(ResourceKind::BlockPool, "rook-ceph", named("p"))
            .await
            .unwrap();

        let second = store.create(ResourceKind::BlockPool, "rook-ceph", named("p")).await;
        assert_matches!(second, Err(Error::ResourceExists { name, .. }) if name == "p");
        assert_eq!(store.created().len(), 2);
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let store = MemoryStore::new();
        store.insert(ResourceKind::Cluster, "rook-ceph", named("c"));

        store.delete(ResourceKind::Cluster, "rook-ceph", "c").await.unwrap();
        let again = store.delete(ResourceKind::Cluster, "rook-ceph", "c").await;
        assert_matches!(again, Err(Error::ResourceNotFound { .. }));
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryStore::new();
        let err = store
            .get(ResourceKind::Cluster, "rook-ceph", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cephclusters.ceph.rook.io \"nope\" not found");
    }
}

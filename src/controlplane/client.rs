//! Rook Ceph Resource Client
//!
//! Typed CRUD over the four Rook kinds, with each result projected into the
//! compact text summaries returned to callers.

use serde_json::Value;
use tracing::{debug, info};

use crate::crd::{
    CephBlockPool, CephCluster, CephFilesystem, CephObjectStore, CephResource, PoolSpec,
    ResourceKind,
};
use crate::domain::ports::ResourceStoreRef;
use crate::error::{Error, Result};

use super::tools::CreateBlockPoolInput;

/// Client over a [`ResourceStore`](crate::domain::ports::ResourceStore)
#[derive(Clone)]
pub struct RookCephClient {
    store: ResourceStoreRef,
}

impl RookCephClient {
    pub fn new(store: ResourceStoreRef) -> Self {
        Self { store }
    }

    // =========================================================================
    // Read Operations
    // =========================================================================

    pub async fn list_clusters(&self, namespace: &str) -> Result<String> {
        self.list_summary::<CephCluster>(namespace)
            .await
            .map_err(|e| Error::during("list clusters", e))
    }

    pub async fn get_cluster_status(&self, name: &str, namespace: &str) -> Result<String> {
        let fetch = async {
            let object = self.store.get(ResourceKind::Cluster, namespace, name).await?;
            let cluster: CephCluster = decode(object)?;
            Ok::<_, Error>(cluster.status_report())
        };
        fetch.await.map_err(|e| Error::during("get cluster status", e))
    }

    pub async fn list_block_pools(&self, namespace: &str) -> Result<String> {
        self.list_summary::<CephBlockPool>(namespace)
            .await
            .map_err(|e| Error::during("list block pools", e))
    }

    pub async fn list_filesystems(&self, namespace: &str) -> Result<String> {
        self.list_summary::<CephFilesystem>(namespace)
            .await
            .map_err(|e| Error::during("list filesystems", e))
    }

    pub async fn list_object_stores(&self, namespace: &str) -> Result<String> {
        self.list_summary::<CephObjectStore>(namespace)
            .await
            .map_err(|e| Error::during("list object stores", e))
    }

    // =========================================================================
    // Write Operations
    // =========================================================================

    /// Submit a new block pool on the default failure domain
    pub async fn create_block_pool(&self, input: &CreateBlockPoolInput) -> Result<String> {
        let submit = async {
            let replication = input.replication()?;
            let mut pool = CephBlockPool::new(&input.name, PoolSpec::with_replication(replication));
            pool.metadata.namespace = Some(input.namespace.clone());

            info!(
                "Creating block pool {}/{} ({})",
                input.namespace, input.name, replication
            );
            let object = serde_json::to_value(&pool)?;
            self.store
                .create(ResourceKind::BlockPool, &input.namespace, object)
                .await?;
            Ok::<_, Error>(format!("Successfully created block pool: {}", input.name))
        };
        submit.await.map_err(|e| Error::during("create block pool", e))
    }

    /// Delete any of the four kinds by its short type name
    pub async fn delete_resource(
        &self,
        resource_type: &str,
        name: &str,
        namespace: &str,
    ) -> Result<String> {
        let remove = async {
            let kind: ResourceKind = resource_type.parse()?;
            info!("Deleting {} {}/{}", kind.plural(), namespace, name);
            self.store.delete(kind, namespace, name).await?;
            Ok::<_, Error>(format!("Successfully deleted {}: {}", kind, name))
        };
        remove.await.map_err(|e| Error::during("delete resource", e))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn list_summary<K: CephResource>(&self, namespace: &str) -> Result<String> {
        let objects = self.store.list(K::KIND, namespace).await?;
        debug!(
            "Found {} {} in {}",
            objects.len(),
            K::KIND.plural(),
            namespace
        );

        let items = objects
            .into_iter()
            .map(decode::<K>)
            .collect::<Result<Vec<_>>>()?;
        Ok(render_list(K::KIND, &items))
    }
}

/// Decode a stored object, tolerating a missing `spec`
fn decode<K: CephResource>(mut object: Value) -> Result<K> {
    if let Value::Object(map) = &mut object {
        map.entry("spec")
            .or_insert_with(|| Value::Object(Default::default()));
    }
    Ok(serde_json::from_value(object)?)
}

/// Render a header plus one summary line per item
fn render_list<K: CephResource>(kind: ResourceKind, items: &[K]) -> String {
    if items.is_empty() {
        return kind.empty_message().to_string();
    }

    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(format!("Found {} {}(s):", items.len(), kind.label()));
    lines.extend(items.iter().map(|item| item.summary_line()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controlplane::backends::MemoryStore;
    use crate::error::ErrorKind;
    use crate::domain::ports::ResourceStore;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    const UNREACHABLE: &str = "connection refused";

    /// Store whose every call fails as an unreachable API server would
    struct UnreachableStore;

    fn unreachable() -> Error {
        Error::Kube(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".into(),
            message: UNREACHABLE.into(),
            reason: "ServiceUnavailable".into(),
            code: 503,
        }))
    }

    #[async_trait]
    impl ResourceStore for UnreachableStore {
        async fn list(&self, _kind: ResourceKind, _namespace: &str) -> Result<Vec<Value>> {
            Err(unreachable())
        }

        async fn get(&self, _kind: ResourceKind, _namespace: &str, _name: &str) -> Result<Value> {
            Err(unreachable())
        }

        async fn create(&self, _kind: ResourceKind, _namespace: &str, _object: Value) -> Result<()> {
            Err(unreachable())
        }

        async fn delete(&self, _kind: ResourceKind, _namespace: &str, _name: &str) -> Result<()> {
            Err(unreachable())
        }

        fn store_name(&self) -> &str {
            "unreachable"
        }
    }

    fn client() -> (Arc<MemoryStore>, RookCephClient) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), RookCephClient::new(store))
    }

    fn pool_input(args: Value) -> CreateBlockPoolInput {
        serde_json::from_value(args).unwrap()
    }

    #[tokio::test]
    async fn test_empty_lists() {
        let (_, client) = client();
        assert_eq!(client.list_clusters("rook-ceph").await.unwrap(), "No Ceph clusters found.");
        assert_eq!(
            client.list_block_pools("rook-ceph").await.unwrap(),
            "No Ceph block pools found."
        );
        assert_eq!(
            client.list_filesystems("rook-ceph").await.unwrap(),
            "No Ceph filesystems found."
        );
        assert_eq!(
            client.list_object_stores("rook-ceph").await.unwrap(),
            "No Ceph object stores found."
        );
    }

    #[tokio::test]
    async fn test_list_clusters_header_matches_lines() {
        let (store, client) = client();
        store.insert(
            ResourceKind::Cluster,
            "rook-ceph",
            json!({
                "metadata": { "name": "a", "namespace": "rook-ceph" },
                "spec": {},
                "status": { "phase": "Ready", "ceph": { "health": "HEALTH_OK" } }
            }),
        );
        store.insert(
            ResourceKind::Cluster,
            "rook-ceph",
            json!({ "metadata": { "name": "b", "namespace": "rook-ceph" } }),
        );

        let text = client.list_clusters("rook-ceph").await.unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Found 2 Ceph cluster(s):",
                "- a in rook-ceph (Ready) - Health: HEALTH_OK",
                "- b in rook-ceph (Unknown) - Health: Unknown",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_block_pools_renders_modes() {
        let (store, client) = client();
        for (name, spec) in [
            ("rep", json!({ "replicated": { "size": 2 } })),
            ("ec", json!({ "erasureCoded": { "dataChunks": 4, "codingChunks": 2 } })),
            ("bare", json!({})),
        ] {
            store.insert(
                ResourceKind::BlockPool,
                "rook-ceph",
                json!({ "metadata": { "name": name, "namespace": "rook-ceph" }, "spec": spec }),
            );
        }

        let text = client.list_block_pools("rook-ceph").await.unwrap();
        assert_eq!(
            text,
            "Found 3 block pool(s):\n\
             - rep (Unknown) - Replicated: 2x\n\
             - ec (Unknown) - Erasure Coded: 4+2\n\
             - bare (Unknown) - Unknown"
        );
    }

    #[tokio::test]
    async fn test_get_cluster_status_without_status() {
        let (store, client) = client();
        store.insert(
            ResourceKind::Cluster,
            "rook-ceph",
            json!({
                "metadata": { "name": "rook-ceph", "namespace": "rook-ceph" },
                "spec": { "mon": { "count": 3 } }
            }),
        );

        let report = client.get_cluster_status("rook-ceph", "rook-ceph").await.unwrap();
        assert!(report.contains("Phase: Unknown"));
        assert!(report.contains("Health: Unknown"));
        assert!(report.contains("Message: No message"));
        assert!(report.contains("Monitor Count: 3"));
    }

    #[tokio::test]
    async fn test_get_cluster_status_not_found() {
        let (_, client) = client();
        let err = client.get_cluster_status("ghost", "rook-ceph").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().starts_with("Failed to get cluster status: "));
    }

    #[tokio::test]
    async fn test_create_default_pool() {
        let (store, client) = client();
        let text = client
            .create_block_pool(&pool_input(json!({ "name": "p" })))
            .await
            .unwrap();
        assert_eq!(text, "Successfully created block pool: p");

        let created = store.created();
        assert_eq!(created.len(), 1);
        let (kind, object) = &created[0];
        assert_eq!(*kind, ResourceKind::BlockPool);
        assert_eq!(object["apiVersion"], "ceph.rook.io/v1");
        assert_eq!(object["kind"], "CephBlockPool");
        assert_eq!(object["metadata"]["namespace"], "rook-ceph");
        assert_eq!(
            object["spec"],
            json!({ "failureDomain": "host", "replicated": { "size": 3 } })
        );
    }

    #[tokio::test]
    async fn test_create_erasure_coded_pool() {
        let (store, client) = client();
        client
            .create_block_pool(&pool_input(json!({
                "name": "p",
                "erasureCoded": { "dataChunks": 4, "codingChunks": 2 }
            })))
            .await
            .unwrap();

        let (_, object) = &store.created()[0];
        assert_eq!(
            object["spec"]["erasureCoded"],
            json!({ "dataChunks": 4, "codingChunks": 2 })
        );
        assert!(object["spec"].get("replicated").is_none());
    }

    #[tokio::test]
    async fn test_create_with_both_modes_is_local_failure() {
        let (store, client) = client();
        let err = client
            .create_block_pool(&pool_input(json!({
                "name": "p",
                "replicated": { "size": 3 },
                "erasureCoded": { "dataChunks": 4, "codingChunks": 2 }
            })))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArguments);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let (_, client) = client();
        let input = pool_input(json!({ "name": "p" }));
        client.create_block_pool(&input).await.unwrap();

        let err = client.create_block_pool(&input).await.unwrap_err();
        assert_matches!(&err, Error::Action { source, .. } if matches!(**source, Error::ResourceExists { .. }));
        assert_eq!(err.kind(), ErrorKind::RemoteCallFailure);
    }

    #[tokio::test]
    async fn test_delete_unknown_type_makes_no_calls() {
        let (store, client) = client();
        let err = client.delete_resource("bogus", "x", "rook-ceph").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownResourceType);
        assert_eq!(
            err.to_string(),
            "Failed to delete resource: Unknown resource type: bogus"
        );
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let (store, client) = client();
        store.insert(
            ResourceKind::Filesystem,
            "rook-ceph",
            json!({ "metadata": { "name": "myfs", "namespace": "rook-ceph" }, "spec": {} }),
        );

        let text = client.delete_resource("filesystem", "myfs", "rook-ceph").await.unwrap();
        assert_eq!(text, "Successfully deleted filesystem: myfs");

        let err = client
            .delete_resource("filesystem", "myfs", "rook-ceph")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    fn assert_remote_failure(result: Result<String>, prefix: &str) {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteCallFailure);
        let text = err.to_string();
        assert!(text.starts_with(prefix), "{text}");
        assert!(text.contains(UNREACHABLE), "{text}");
    }

    #[tokio::test]
    async fn test_remote_failures_carry_action_prefix() {
        let client = RookCephClient::new(Arc::new(UnreachableStore));

        assert_remote_failure(client.list_clusters("rook-ceph").await, "Failed to list clusters: ");
        assert_remote_failure(
            client.get_cluster_status("c", "rook-ceph").await,
            "Failed to get cluster status: ",
        );
        assert_remote_failure(
            client.list_block_pools("rook-ceph").await,
            "Failed to list block pools: ",
        );
        assert_remote_failure(
            client.list_filesystems("rook-ceph").await,
            "Failed to list filesystems: ",
        );
        assert_remote_failure(
            client.list_object_stores("rook-ceph").await,
            "Failed to list object stores: ",
        );
        assert_remote_failure(
            client.create_block_pool(&pool_input(json!({ "name": "p" }))).await,
            "Failed to create block pool: ",
        );
        assert_remote_failure(
            client.delete_resource("cluster", "c", "rook-ceph").await,
            "Failed to delete resource: ",
        );
    }
}

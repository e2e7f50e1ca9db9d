//! Kubernetes Store Adapter
//!
//! Addresses Rook custom objects through the dynamic API, one
//! `Api<DynamicObject>` per (kind, namespace) pair.

use crate::crd::ResourceKind;
use crate::domain::ports::ResourceStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use kube::api::{Api, DeleteParams, DynamicObject, ListParams, PostParams};
use kube::Client;
use serde_json::Value;
use tracing::debug;

/// Store backed by a live Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    /// Wrap an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the ambient kubeconfig or in-cluster environment
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }

    fn api(&self, kind: ResourceKind, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &kind.api_resource())
    }
}

/// Classify API failures while keeping the API server's message.
/// Only a 409 with reason `AlreadyExists` counts as a name collision.
fn map_api_error(err: kube::Error, kind: ResourceKind, namespace: &str, name: &str) -> Error {
    match err {
        kube::Error::Api(response) if response.code == 404 => Error::ResourceNotFound {
            kind: kind.kind().into(),
            namespace: namespace.into(),
            name: name.into(),
            message: response.message,
        },
        kube::Error::Api(response) if response.code == 409 && response.reason == "AlreadyExists" => {
            Error::ResourceExists {
                kind: kind.kind().into(),
                namespace: namespace.into(),
                name: name.into(),
                message: response.message,
            }
        }
        err => Error::Kube(err),
    }
}

#[async_trait]
impl ResourceStore for KubeStore {
    async fn list(&self, kind: ResourceKind, namespace: &str) -> Result<Vec<Value>> {
        debug!("Listing {} in {}", kind.plural(), namespace);

        let list = self.api(kind, namespace).list(&ListParams::default()).await?;
        list.items
            .into_iter()
            .map(|object| serde_json::to_value(object).map_err(Error::from))
            .collect()
    }

    async fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Value> {
        debug!("Getting {} {}/{}", kind.plural(), namespace, name);

        let object = self
            .api(kind, namespace)
            .get(name)
            .await
            .map_err(|e| map_api_error(e, kind, namespace, name))?;
        Ok(serde_json::to_value(object)?)
    }

    async fn create(&self, kind: ResourceKind, namespace: &str, object: Value) -> Result<()> {
        let object: DynamicObject = serde_json::from_value(object)?;
        let name = object.metadata.name.clone().unwrap_or_default();
        debug!("Creating {} {}/{}", kind.plural(), namespace, name);

        self.api(kind, namespace)
            .create(&PostParams::default(), &object)
            .await
            .map_err(|e| map_api_error(e, kind, namespace, &name))?;
        Ok(())
    }

    async fn delete(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<()> {
        debug!("Deleting {} {}/{}", kind.plural(), namespace, name);

        self.api(kind, namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|e| map_api_error(e, kind, namespace, name))?;
        Ok(())
    }

    fn store_name(&self) -> &str {
        "kubernetes"
    }
}

//! Manifest templates.
//!
//! Full default manifests for each Rook kind, served read-only under the
//! `rook-ceph://manifests/` URI scheme.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Media type of every template
pub const YAML_MIME_TYPE: &str = "application/yaml";

/// A static manifest template
#[derive(Debug, Clone, Copy)]
pub struct ManifestTemplate {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub body: &'static str,
}

pub const TEMPLATES: [ManifestTemplate; 4] = [
    ManifestTemplate {
        uri: "rook-ceph://manifests/cluster",
        name: "Ceph Cluster Manifest Template",
        description: "Template for creating a Ceph cluster",
        body: include_str!("../../manifests/cluster.yaml"),
    },
    ManifestTemplate {
        uri: "rook-ceph://manifests/block-pool",
        name: "Block Pool Manifest Template",
        description: "Template for creating a Ceph block pool",
        body: include_str!("../../manifests/block-pool.yaml"),
    },
    ManifestTemplate {
        uri: "rook-ceph://manifests/filesystem",
        name: "Filesystem Manifest Template",
        description: "Template for creating a Ceph filesystem",
        body: include_str!("../../manifests/filesystem.yaml"),
    },
    ManifestTemplate {
        uri: "rook-ceph://manifests/object-store",
        name: "Object Store Manifest Template",
        description: "Template for creating a Ceph object store",
        body: include_str!("../../manifests/object-store.yaml"),
    },
];

/// Catalog entry as listed to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// Body of a template read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// List every template
pub fn resource_catalog() -> Vec<ResourceInfo> {
    TEMPLATES
        .iter()
        .map(|t| ResourceInfo {
            uri: t.uri.to_string(),
            name: t.name.to_string(),
            description: t.description.to_string(),
            mime_type: YAML_MIME_TYPE.to_string(),
        })
        .collect()
}

/// Read one template by URI
pub fn read_template(uri: &str) -> Result<ResourceContents> {
    let template = TEMPLATES
        .iter()
        .find(|t| t.uri == uri)
        .ok_or_else(|| Error::TemplateNotFound(uri.to_string()))?;

    Ok(ResourceContents {
        uri: template.uri.to_string(),
        mime_type: YAML_MIME_TYPE.to_string(),
        text: template.body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{
        CephBlockPool, CephCluster, CephFilesystem, CephObjectStore, CephResource, Replication,
    };
    use crate::error::ErrorKind;

    fn body(uri: &str) -> String {
        read_template(uri).unwrap().text
    }

    #[test]
    fn test_every_template_is_valid_yaml() {
        let expected = [
            "CephCluster",
            "CephBlockPool",
            "CephFilesystem",
            "CephObjectStore",
        ];
        for (template, kind) in TEMPLATES.iter().zip(expected) {
            let doc: serde_yaml::Value = serde_yaml::from_str(template.body).unwrap();
            assert_eq!(doc["apiVersion"].as_str(), Some("ceph.rook.io/v1"), "{}", template.uri);
            assert_eq!(doc["kind"].as_str(), Some(kind), "{}", template.uri);
        }
    }

    #[test]
    fn test_templates_decode_as_typed_resources() {
        let cluster: CephCluster =
            serde_yaml::from_str(&body("rook-ceph://manifests/cluster")).unwrap();
        assert!(cluster.status_report().contains("Monitor Count: 3"));

        let pool: CephBlockPool =
            serde_yaml::from_str(&body("rook-ceph://manifests/block-pool")).unwrap();
        assert_eq!(pool.spec.replication, Some(Replication::Replicated { size: 3 }));

        let fs: CephFilesystem =
            serde_yaml::from_str(&body("rook-ceph://manifests/filesystem")).unwrap();
        assert_eq!(fs.summary_line(), "- myfs (Unknown) - MDS: 1");

        let store: CephObjectStore =
            serde_yaml::from_str(&body("rook-ceph://manifests/object-store")).unwrap();
        assert_eq!(store.gateway_instances(), Some(1));
    }

    #[test]
    fn test_catalog_and_miss() {
        let catalog = resource_catalog();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.iter().all(|r| r.mime_type == "application/yaml"));

        let err = read_template("rook-ceph://manifests/nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Resource not found: rook-ceph://manifests/nope");
    }
}

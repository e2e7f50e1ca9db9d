//! Guided prompts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crd::DEFAULT_NAMESPACE;
use crate::error::{Error, Result};

/// Cluster name substituted when the caller supplies none
pub const DEFAULT_CLUSTER_NAME: &str = "my-cluster";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptInfo {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptContent {
    pub r#type: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: PromptContent,
}

/// A rendered prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    SetupCluster,
    TroubleshootCluster,
}

impl Prompt {
    const ALL: [Prompt; 2] = [Prompt::SetupCluster, Prompt::TroubleshootCluster];

    fn name(self) -> &'static str {
        match self {
            Prompt::SetupCluster => "setup_cluster",
            Prompt::TroubleshootCluster => "troubleshoot_cluster",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Prompt::SetupCluster => "Guide for setting up a new Rook Ceph cluster",
            Prompt::TroubleshootCluster => "Troubleshooting guide for Ceph cluster issues",
        }
    }

    fn arguments(self) -> Vec<PromptArgument> {
        let cluster_name = PromptArgument {
            name: "cluster_name".into(),
            description: "Name of the cluster".into(),
            required: true,
        };
        match self {
            Prompt::SetupCluster => vec![
                cluster_name,
                PromptArgument {
                    name: "namespace".into(),
                    description: "Kubernetes namespace".into(),
                    required: false,
                },
            ],
            Prompt::TroubleshootCluster => vec![cluster_name],
        }
    }

    fn text(self, args: &Value) -> String {
        let cluster_name = string_arg(args, "cluster_name").unwrap_or(DEFAULT_CLUSTER_NAME);
        match self {
            Prompt::SetupCluster => {
                let namespace = string_arg(args, "namespace").unwrap_or(DEFAULT_NAMESPACE);
                format!(
                    "Help me set up a new Rook Ceph cluster named \"{}\" in namespace \"{}\". \
                     Provide step-by-step instructions including prerequisites, manifest \
                     creation, and verification steps.",
                    cluster_name, namespace
                )
            }
            Prompt::TroubleshootCluster => format!(
                "Help me troubleshoot issues with my Ceph cluster \"{}\". Check the cluster \
                 status, common issues, and provide diagnostic steps.",
                cluster_name
            ),
        }
    }
}

/// Non-empty string argument, if present
fn string_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// List every prompt
pub fn prompt_catalog() -> Vec<PromptInfo> {
    Prompt::ALL
        .into_iter()
        .map(|p| PromptInfo {
            name: p.name().to_string(),
            description: p.description().to_string(),
            arguments: p.arguments(),
        })
        .collect()
}

/// Render a prompt with the caller's arguments
pub fn render_prompt(name: &str, args: &Value) -> Result<PromptResult> {
    let prompt = Prompt::ALL
        .into_iter()
        .find(|p| p.name() == name)
        .ok_or_else(|| Error::PromptNotFound(name.to_string()))?;

    Ok(PromptResult {
        description: prompt.description().to_string(),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: PromptContent {
                r#type: "text".to_string(),
                text: prompt.text(args),
            },
        }],
    })
}

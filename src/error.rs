//! Error types for the Rook Ceph MCP server
//!
//! Every failure the server can produce is an [`Error`]. The dispatcher folds
//! each one into a single-line text response by way of [`Error::kind`], so the
//! variants carry enough context (the action that failed, the resource that
//! was addressed) to produce a useful message on their own.

use thiserror::Error;

/// Unified error type for the server
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Internal Errors
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // =========================================================================
    // Request Errors
    // =========================================================================
    #[error("Unknown tool: {0}")]
    UnknownOperation(String),

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Resource not found: {0}")]
    TemplateNotFound(String),

    #[error("Unknown prompt: {0}")]
    PromptNotFound(String),

    // =========================================================================
    // Kubernetes Errors
    // =========================================================================
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// The message is the control plane's own text
    #[error("{message}")]
    ResourceNotFound {
        kind: String,
        namespace: String,
        name: String,
        message: String,
    },

    #[error("{message}")]
    ResourceExists {
        kind: String,
        namespace: String,
        name: String,
        message: String,
    },

    // =========================================================================
    // Client Action Errors
    // =========================================================================
    #[error("Failed to {action}: {source}")]
    Action {
        action: &'static str,
        #[source]
        source: Box<Error>,
    },

    // =========================================================================
    // Parse / IO Errors
    // =========================================================================
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of an error as seen by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested tool is not in the catalog
    UnknownOperation,
    /// A delete named a type outside the known resource kinds
    UnknownResourceType,
    /// The argument bag could not be turned into a valid request
    InvalidArguments,
    /// The addressed object, template, or prompt does not exist
    NotFound,
    /// Anything else surfaced by the control plane connection
    RemoteCallFailure,
}

impl Error {
    /// Wrap an error with the client action that was being attempted
    pub fn during(action: &'static str, source: Error) -> Self {
        Error::Action {
            action,
            source: Box::new(source),
        }
    }

    /// Determine how this error presents to a caller
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Action { source, .. } => source.kind(),

            Error::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Error::UnknownResourceType(_) => ErrorKind::UnknownResourceType,
            Error::InvalidArguments(_) => ErrorKind::InvalidArguments,

            Error::ResourceNotFound { .. }
            | Error::TemplateNotFound(_)
            | Error::PromptNotFound(_) => ErrorKind::NotFound,

            Error::Kube(kube::Error::Api(response)) if response.code == 404 => {
                ErrorKind::NotFound
            }

            Error::Kube(_)
            | Error::ResourceExists { .. }
            | Error::JsonParse(_)
            | Error::Io(_)
            | Error::Internal(_)
            | Error::Configuration(_) => ErrorKind::RemoteCallFailure,
        }
    }

    /// Check if this error was raised before anything was sent to the store
    pub fn is_local(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UnknownOperation | ErrorKind::UnknownResourceType | ErrorKind::InvalidArguments
        )
    }
}

/// Result type alias for the server
pub type Result<T> = std::result::Result<T, Error>;

//! Control Plane Module
//!
//! Everything between a transport and the Kubernetes API: the dispatcher,
//! the Rook resource client, the static catalogs, and the store adapters.

pub mod api;
pub mod backends;
pub mod client;
pub mod dispatcher;
pub mod metrics;
pub mod prompts;
pub mod templates;
pub mod tools;

pub use api::*;
pub use backends::*;
pub use client::RookCephClient;
pub use dispatcher::{Content, Dispatcher, ToolResponse};
pub use metrics::ToolMetrics;

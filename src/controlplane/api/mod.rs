//! API Module
//!
//! Transports for the dispatcher: JSON-RPC over stdio and an HTTP REST API.

pub mod jsonrpc;
pub mod rest;
pub mod server;

pub use jsonrpc::{serve_stdio, JsonRpcRequest, JsonRpcResponse};
pub use rest::*;
pub use server::*;

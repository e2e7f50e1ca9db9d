//! Domain layer
//!
//! The store port the resource client is written against. Adapters live in
//! [`crate::controlplane::backends`].

pub mod ports;

pub use ports::*;

//! # Store Node Library
//!
//! Configuration and runtime for the `store-node` binary, exposed as a
//! library so integration tests can drive a node in-process.
//!
//! ## Modular Structure
//!
//! - `config` - environment-driven `NodeConfig`
//! - `runtime` - `StoreNode`: bus, store, watcher and JSON-lines transport

#![warn(missing_docs)]

pub mod config;
pub mod runtime;

pub use config::{ConfigError, NodeConfig, MAX_BUS_CAPACITY};
pub use runtime::{render_metrics, NodeError, StoreNode};

//! # Integration Tests
//!
//! - `flows` - store service and event bus together
//! - `node` - the store node driven through its JSON-lines transport

pub mod flows;
pub mod node;

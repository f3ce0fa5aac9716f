//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the store domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `MessageStoreApi`
//! - **Driven Ports (Outbound)**: `Clock`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;

//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for the message store.
//! NO I/O, NO async, NO clock access: time and caller identity are passed in.

pub mod entities;
pub mod invariants;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use services::*;
pub use value_objects::*;

//! # Shared Types Crate
//!
//! Identity and notification types shared by every crate in the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Address`, `Timestamp` and the notification
//!   payloads are defined once, here.
//! - **Opaque Identity**: an `Address` is compared for equality only; its
//!   bytes carry no meaning beyond that.
//! - **Typed Notifications**: each observable state change has its own payload
//!   struct rather than a generic "something changed" record.

pub mod entities;
pub mod errors;
pub mod notifications;

pub use entities::*;
pub use errors::*;
pub use notifications::*;

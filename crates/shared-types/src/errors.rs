//! # Error Types
//!
//! Errors raised while decoding shared types from their text form.

use thiserror::Error;

/// Errors that can occur when parsing an [`Address`](crate::Address).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// The string does not start with `0x`.
    #[error("address must start with 0x")]
    MissingPrefix,

    /// Wrong number of hex digits after the prefix.
    #[error("address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    /// A character outside `[0-9a-fA-F]`.
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),
}

//! # Error Types
//!
//! Every failed call surfaces one of two kinds: the caller is not the owner,
//! or the input has the wrong shape. Neither leaves any trace in the store.

use shared_types::Address;
use thiserror::Error;

// =============================================================================
// INPUT ERRORS
// =============================================================================

/// Shape constraints a candidate value can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Candidate message has zero length.
    #[error("message cannot be empty")]
    EmptyMessage,

    /// Candidate message is longer than `MAX_MESSAGE_LENGTH` bytes.
    #[error("message exceeds maximum length: {length} > {max} bytes")]
    MessageTooLong { length: usize, max: usize },

    /// Owner would become the null identity.
    #[error("new owner is the zero address")]
    ZeroOwner,
}

// =============================================================================
// STORE ERRORS
// =============================================================================

/// Errors returned by store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Caller is not the current owner.
    #[error("unauthorized account {caller}: owner is {owner}")]
    Unauthorized { caller: Address, owner: Address },

    /// Candidate value failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
}

impl StoreError {
    /// Stable tag for logs, metrics labels and the node's JSON output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::InvalidInput(_) => "invalid_input",
        }
    }

    /// Returns true for [`StoreError::Unauthorized`].
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// The rejected caller, if this is an authorization failure.
    #[must_use]
    pub fn rejected_caller(&self) -> Option<Address> {
        match self {
            Self::Unauthorized { caller, .. } => Some(*caller),
            Self::InvalidInput(_) => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

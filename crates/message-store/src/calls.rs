//! # Call Schema
//!
//! Wire shapes for driving a store from outside the process. The node reads
//! one [`CallRequest`] per line and writes one [`CallResponse`] per line.
//!
//! | Call | Mutating | Result |
//! |------|----------|--------|
//! | `get_message` | no | message |
//! | `get_owner` | no | owner address |
//! | `get_deployed_at` | no | timestamp |
//! | `get_info` | no | `{message, owner, deployed_at}` |
//! | `max_message_length` | no | 256 |
//! | `set_message` | yes | `MessageUpdated` event |
//! | `transfer_ownership` | yes | `OwnershipTransferred` event |

use crate::domain::value_objects::StoreInfo;
use crate::errors::StoreError;
use serde::{Deserialize, Serialize};
use shared_bus::StoreEvent;
use shared_types::{Address, Timestamp};

// =============================================================================
// INBOUND
// =============================================================================

/// One operation against a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreCall {
    /// Read the current message.
    GetMessage,
    /// Read the current owner.
    GetOwner,
    /// Read the creation time.
    GetDeployedAt,
    /// Read all three state fields.
    GetInfo,
    /// Read the message length bound.
    MaxMessageLength,
    /// Replace the message (owner only).
    SetMessage {
        /// Candidate message.
        message: String,
    },
    /// Hand ownership to another identity (owner only).
    TransferOwnership {
        /// Identity that becomes owner.
        new_owner: Address,
    },
}

impl StoreCall {
    /// Returns true for calls that can change state.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::SetMessage { .. } | Self::TransferOwnership { .. })
    }

    /// Operation name used in log fields and metric labels.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::GetMessage => "get_message",
            Self::GetOwner => "get_owner",
            Self::GetDeployedAt => "get_deployed_at",
            Self::GetInfo => "get_info",
            Self::MaxMessageLength => "max_message_length",
            Self::SetMessage { .. } => "set_message",
            Self::TransferOwnership { .. } => "transfer_ownership",
        }
    }
}

/// A call plus the identity making it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    /// Caller identity, as asserted by the transport.
    pub caller: Address,
    /// The operation.
    pub call: StoreCall,
}

// =============================================================================
// OUTBOUND
// =============================================================================

/// Successful outcome of a [`StoreCall`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StoreCallResult {
    /// `get_message`.
    Message(String),
    /// `get_owner`.
    Owner(Address),
    /// `get_deployed_at`.
    DeployedAt(Timestamp),
    /// `get_info`.
    Info(StoreInfo),
    /// `max_message_length`.
    MaxMessageLength(usize),
    /// Any committed write.
    Event(StoreEvent),
}

/// One line of node output.
///
/// Exactly one of `ok` or `error` is present. `kind` accompanies `error`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallResponse {
    /// Result of a successful call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<StoreCallResult>,
    /// Human-readable failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Failure class: `unauthorized`, `invalid_input` or `malformed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl CallResponse {
    /// Successful response.
    #[must_use]
    pub fn ok(result: StoreCallResult) -> Self {
        Self {
            ok: Some(result),
            error: None,
            kind: None,
        }
    }

    /// Response for a rejected call.
    #[must_use]
    pub fn rejected(err: &StoreError) -> Self {
        Self {
            ok: None,
            error: Some(err.to_string()),
            kind: Some(err.kind()),
        }
    }

    /// Response for a line that could not be parsed as a [`CallRequest`].
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            ok: None,
            error: Some(reason.into()),
            kind: Some("malformed"),
        }
    }

    /// Returns true if the call succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.ok.is_some()
    }
}

impl From<Result<StoreCallResult, StoreError>> for CallResponse {
    fn from(result: Result<StoreCallResult, StoreError>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(err) => Self::rejected(&err),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

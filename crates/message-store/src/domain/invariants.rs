//! # Domain Invariants
//!
//! Properties that hold for every reachable store state. The service checks
//! them after each committed write when invariant checks are enabled.
//!
//! - Message length stays within `1..=MAX_MESSAGE_LENGTH` bytes
//! - Owner is never the null identity
//! - Log sequence numbers are dense and start at the deployment record
//! - Replaying the log reproduces the current state

use crate::domain::entities::MessageStore;
use crate::domain::value_objects::MAX_MESSAGE_LENGTH;
use shared_bus::{StoreEvent, StoreEventKind};
use shared_types::Address;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Message is non-empty and at most `MAX_MESSAGE_LENGTH` bytes.
#[must_use]
pub fn check_message_bounds(message: &str) -> bool {
    !message.is_empty() && message.len() <= MAX_MESSAGE_LENGTH
}

/// Owner is a real identity.
#[must_use]
pub fn check_owner_present(owner: Address) -> bool {
    !owner.is_zero()
}

/// `log[i].sequence == i` and only `log[0]` is a deployment record.
#[must_use]
pub fn check_log_sequence(log: &[StoreEvent]) -> bool {
    log.iter().enumerate().all(|(i, event)| {
        let deployed = matches!(event.kind, StoreEventKind::Deployed(_));
        event.sequence == i as u64 && deployed == (i == 0)
    })
}

/// Folding the log from its deployment record lands on `message` and `owner`.
#[must_use]
pub fn check_log_replay(log: &[StoreEvent], message: &str, owner: Address) -> bool {
    let mut replayed: Option<(&str, Address)> = None;

    for event in log {
        replayed = match (&event.kind, replayed) {
            (StoreEventKind::Deployed(d), None) => Some((d.message.as_str(), d.owner)),
            (StoreEventKind::MessageUpdated(m), Some((current, o))) if m.old_message == current => {
                Some((m.new_message.as_str(), o))
            }
            (StoreEventKind::OwnershipTransferred(t), Some((m, current)))
                if t.previous_owner == current =>
            {
                Some((m, t.new_owner))
            }
            _ => return false,
        };
    }

    replayed == Some((message, owner))
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(store: &MessageStore) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_message_bounds(store.message()) {
        violations.push(InvariantViolation::MessageOutOfBounds {
            length: store.message().len(),
        });
    }

    if !check_owner_present(store.owner()) {
        violations.push(InvariantViolation::ZeroOwner);
    }

    if !check_log_sequence(store.events()) {
        violations.push(InvariantViolation::BrokenSequence {
            len: store.events().len(),
        });
    }

    if !check_log_replay(store.events(), store.message(), store.owner()) {
        violations.push(InvariantViolation::LogStateMismatch);
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Message empty or too long.
    MessageOutOfBounds { length: usize },
    /// Owner is the null identity.
    ZeroOwner,
    /// Log sequence numbers are not `0..len`.
    BrokenSequence { len: usize },
    /// Log does not replay to the current state.
    LogStateMismatch,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MessageOutOfBounds { length } => {
                write!(
                    f,
                    "message length {length} outside 1..={MAX_MESSAGE_LENGTH}"
                )
            }
            Self::ZeroOwner => write!(f, "owner is the zero address"),
            Self::BrokenSequence { len } => {
                write!(f, "log of {len} events is not densely sequenced")
            }
            Self::LogStateMismatch => write!(f, "log does not replay to current state"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

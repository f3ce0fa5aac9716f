//! # Domain Services
//!
//! Stateless guards and helpers shared by the store's operations.

use crate::domain::value_objects::MAX_MESSAGE_LENGTH;
use crate::errors::{InputError, StoreError};
use sha3::{Digest, Keccak256};
use shared_types::Address;

// =============================================================================
// GUARDS
// =============================================================================

/// Rejects every caller except `owner`.
///
/// Both mutators call this first, so an authorization failure always wins
/// over an input-shape failure.
pub fn require_owner(caller: Address, owner: Address) -> Result<(), StoreError> {
    if caller == owner {
        Ok(())
    } else {
        Err(StoreError::Unauthorized { caller, owner })
    }
}

/// Checks a candidate message against the length bounds `[1, MAX_MESSAGE_LENGTH]`.
///
/// Length is measured in UTF-8 bytes.
pub fn validate_message(candidate: &str) -> Result<(), InputError> {
    if candidate.is_empty() {
        return Err(InputError::EmptyMessage);
    }
    if candidate.len() > MAX_MESSAGE_LENGTH {
        return Err(InputError::MessageTooLong {
            length: candidate.len(),
            max: MAX_MESSAGE_LENGTH,
        });
    }
    Ok(())
}

/// Rejects the null identity as an owner.
pub fn validate_new_owner(new_owner: Address) -> Result<(), InputError> {
    if new_owner.is_zero() {
        Err(InputError::ZeroOwner)
    } else {
        Ok(())
    }
}

// =============================================================================
// ADDRESS DERIVATION
// =============================================================================

/// Computes a store's address from its deployer and the deployer's nonce.
///
/// Same rule as an EVM `CREATE`: `keccak256(rlp([deployer, nonce]))[12..]`.
#[must_use]
pub fn compute_store_address(deployer: Address, nonce: u64) -> Address {
    let mut content = Vec::with_capacity(30);

    // RLP encode address (20 bytes, 0x80 + 20 = 0x94)
    content.push(0x94);
    content.extend_from_slice(deployer.as_bytes());

    // RLP encode nonce
    match nonce {
        0 => content.push(0x80),
        1..=0x7f => content.push(nonce as u8),
        _ => {
            let bytes = nonce.to_be_bytes();
            let first = bytes.iter().position(|b| *b != 0).unwrap_or(7);
            content.push(0x80 + (8 - first) as u8);
            content.extend_from_slice(&bytes[first..]);
        }
    }

    // Payload is at most 30 bytes, so the short list header always applies
    let mut rlp = Vec::with_capacity(content.len() + 1);
    rlp.push(0xc0 + content.len() as u8);
    rlp.extend_from_slice(&content);

    let hash = Keccak256::digest(&rlp);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash[12..32]);
    Address::new(addr)
}

// =============================================================================
// TESTS
// =============================================================================

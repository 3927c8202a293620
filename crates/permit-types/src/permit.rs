//! Permit data model for delegated borrow authorization.
//!
//! This module defines the typed-data domain, the permit message, and the
//! decomposed signature representation handed to the borrow call. Messages
//! are immutable once built; a fresh message must be composed for every
//! signing attempt so that the nonce and deadline are never reused.

use crate::utils::eip712::{
	compute_domain_hash, compute_final_digest, Eip712AbiEncoder, PERMIT_TYPE,
};
use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by permit construction and signature decomposition.
#[derive(Debug, Error)]
pub enum PermitError {
	/// Error that occurs when permit parameters fail client-side validation.
	#[error("Invalid permit parameters: {0}")]
	InvalidParameters(String),
	/// Error that occurs when a raw signature is structurally invalid.
	#[error("Malformed signature: {0}")]
	MalformedSignature(String),
}

/// EIP-712 signing domain for the permit scheme.
///
/// Identifies which contract a signature is valid against. The domain binds
/// name, version and verifying contract only; it carries no chain id, which
/// matches the scheme the token contract verifies against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitDomain {
	/// Token name as reported by the contract's `name()` view.
	pub name: String,
	/// Fixed domain version string.
	pub version: String,
	/// Address of the contract that will verify the signature.
	pub verifying_contract: Address,
}

impl PermitDomain {
	/// Computes the EIP-712 domain separator for this domain.
	pub fn domain_hash(&self) -> B256 {
		compute_domain_hash(&self.name, &self.version, &self.verifying_contract)
	}
}

/// The canonical typed message signed by the token owner.
///
/// Valid only for the exact domain it was composed for. The nonce is an
/// advisory snapshot of the contract's per-owner counter and is stale the
/// instant another authorization for the same owner is mined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitMessage {
	/// Token owner granting the allowance.
	pub owner: Address,
	/// Contract being granted the allowance.
	pub spender: Address,
	/// Allowance amount in the token's smallest unit.
	pub value: U256,
	/// Owner's current authorization counter.
	pub nonce: U256,
	/// Unix timestamp after which the signature must be rejected.
	pub deadline: u64,
}

impl PermitMessage {
	/// Composes a permit message, validating parameters before any signing
	/// is attempted.
	///
	/// Zero owner or spender addresses and a zero value are rejected with
	/// [`PermitError::InvalidParameters`]; the contract would reject them
	/// anyway, and failing here avoids wasting a signature request.
	pub fn compose(
		owner: Address,
		spender: Address,
		value: U256,
		nonce: U256,
		deadline: u64,
	) -> Result<Self, PermitError> {
		if owner == Address::ZERO {
			return Err(PermitError::InvalidParameters(
				"owner address must not be zero".to_string(),
			));
		}
		if spender == Address::ZERO {
			return Err(PermitError::InvalidParameters(
				"spender address must not be zero".to_string(),
			));
		}
		if value.is_zero() {
			return Err(PermitError::InvalidParameters(
				"value must be greater than zero".to_string(),
			));
		}
		Ok(Self {
			owner,
			spender,
			value,
			nonce,
			deadline,
		})
	}

	/// Computes the EIP-712 struct hash of this message.
	pub fn struct_hash(&self) -> B256 {
		let type_hash = keccak256(PERMIT_TYPE.as_bytes());
		let mut enc = Eip712AbiEncoder::new();
		enc.push_b256(&type_hash);
		enc.push_address(&self.owner);
		enc.push_address(&self.spender);
		enc.push_u256(self.value);
		enc.push_u256(self.nonce);
		enc.push_u256(U256::from(self.deadline));
		keccak256(enc.finish())
	}

	/// Computes the final digest the signing agent signs for this message
	/// under the given domain.
	pub fn signing_digest(&self, domain: &PermitDomain) -> B256 {
		compute_final_digest(&domain.domain_hash(), &self.struct_hash())
	}
}

/// Decomposed recoverable ECDSA signature.
///
/// The raw 65-byte form is split into the three scalar components the
/// contract verifies. `v` is normalized to the two legal recovery values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureParts {
	/// Recovery id, normalized to 27 or 28.
	pub v: u8,
	/// First signature scalar.
	pub r: B256,
	/// Second signature scalar.
	pub s: B256,
}

impl SignatureParts {
	/// Splits a raw signature into (v, r, s), validating its structural
	/// shape before it is ever paired with a transaction.
	///
	/// Accepts the r || s || v layout with v either in {27, 28} or in the
	/// alternate {0, 1} encoding some agents return, which is normalized.
	pub fn from_raw(raw: &[u8]) -> Result<Self, PermitError> {
		if raw.len() != 65 {
			return Err(PermitError::MalformedSignature(format!(
				"expected 65 bytes, got {}",
				raw.len()
			)));
		}
		let r = B256::from_slice(&raw[0..32]);
		let s = B256::from_slice(&raw[32..64]);
		let v = match raw[64] {
			27 | 28 => raw[64],
			0 | 1 => raw[64] + 27,
			other => {
				return Err(PermitError::MalformedSignature(format!(
					"invalid recovery id {}",
					other
				)))
			}
		};
		if r == B256::ZERO || s == B256::ZERO {
			return Err(PermitError::MalformedSignature(
				"zero signature scalar".to_string(),
			));
		}
		Ok(Self { v, r, s })
	}
}

/// The bundle handed to the borrow call.
///
/// Consumed exactly once by a successful borrow transaction; a second use
/// with the same nonce is rejected by the contract, not by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResult {
	/// Recovery id.
	pub v: u8,
	/// First signature scalar.
	pub r: B256,
	/// Second signature scalar.
	pub s: B256,
	/// Deadline the signature was bound to.
	pub deadline: u64,
}

impl AuthorizationResult {
	/// Pairs decomposed signature components with the deadline they were
	/// signed against.
	pub fn new(parts: SignatureParts, deadline: u64) -> Self {
		Self {
			v: parts.v,
			r: parts.r,
			s: parts.s,
			deadline,
		}
	}
}

/// A user's intent to borrow a titled resource against a token deposit.
///
/// Built from user input and dropped once the authorization attempt
/// completes, whether it succeeded or failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRequest {
	/// Title of the book to borrow.
	pub title: String,
	/// Deposit amount in the token's smallest unit.
	pub value: U256,
	/// The library contract that will redeem the permit.
	pub spender: Address,
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	fn domain() -> PermitDomain {
		PermitDomain {
			name: "LIB Token".to_string(),
			version: "1".to_string(),
			verifying_contract: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
		}
	}

	#[test]
	fn test_compose_rejects_zero_owner() {
		let err = PermitMessage::compose(
			Address::ZERO,
			address!("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB"),
			U256::from(1),
			U256::ZERO,
			1_000,
		)
		.unwrap_err();
		assert!(matches!(err, PermitError::InvalidParameters(_)));
	}

	#[test]
	fn test_compose_rejects_zero_spender() {
		let err = PermitMessage::compose(
			address!("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
			Address::ZERO,
			U256::from(1),
			U256::ZERO,
			1_000,
		)
		.unwrap_err();
		assert!(matches!(err, PermitError::InvalidParameters(_)));
	}

	#[test]
	fn test_compose_rejects_zero_value() {
		let err = PermitMessage::compose(
			address!("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"),
			address!("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB"),
			U256::ZERO,
			U256::ZERO,
			1_000,
		)
		.unwrap_err();
		assert!(matches!(err, PermitError::InvalidParameters(_)));
	}

	#[test]
	fn test_struct_hash_binds_every_field() {
		let owner = address!("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
		let spender = address!("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB");
		let base =
			PermitMessage::compose(owner, spender, U256::from(100), U256::from(3), 2_000).unwrap();
		let bumped_nonce =
			PermitMessage::compose(owner, spender, U256::from(100), U256::from(4), 2_000).unwrap();
		let bumped_deadline =
			PermitMessage::compose(owner, spender, U256::from(100), U256::from(3), 2_001).unwrap();
		assert_ne!(base.struct_hash(), bumped_nonce.struct_hash());
		assert_ne!(base.struct_hash(), bumped_deadline.struct_hash());
	}

	#[test]
	fn test_signing_digest_binds_domain() {
		let owner = address!("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
		let spender = address!("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB");
		let message =
			PermitMessage::compose(owner, spender, U256::from(100), U256::from(3), 2_000).unwrap();
		let d1 = domain();
		let mut d2 = domain();
		d2.name = "Other Token".to_string();
		assert_ne!(message.signing_digest(&d1), message.signing_digest(&d2));
	}

	#[test]
	fn test_from_raw_accepts_canonical_v() {
		let mut raw = vec![0u8; 65];
		raw[31] = 1;
		raw[63] = 2;
		raw[64] = 28;
		let parts = SignatureParts::from_raw(&raw).unwrap();
		assert_eq!(parts.v, 28);
		assert_eq!(parts.r.as_slice()[31], 1);
		assert_eq!(parts.s.as_slice()[31], 2);
	}

	#[test]
	fn test_from_raw_normalizes_parity_encoding() {
		let mut raw = vec![0u8; 65];
		raw[31] = 1;
		raw[63] = 2;
		raw[64] = 0;
		assert_eq!(SignatureParts::from_raw(&raw).unwrap().v, 27);
		raw[64] = 1;
		assert_eq!(SignatureParts::from_raw(&raw).unwrap().v, 28);
	}

	#[test]
	fn test_from_raw_rejects_bad_length() {
		let err = SignatureParts::from_raw(&[0u8; 64]).unwrap_err();
		assert!(matches!(err, PermitError::MalformedSignature(_)));
	}

	#[test]
	fn test_from_raw_rejects_bad_recovery_id() {
		let mut raw = vec![0u8; 65];
		raw[31] = 1;
		raw[63] = 2;
		raw[64] = 29;
		let err = SignatureParts::from_raw(&raw).unwrap_err();
		assert!(matches!(err, PermitError::MalformedSignature(_)));
	}

	#[test]
	fn test_from_raw_rejects_zero_scalars() {
		let mut raw = vec![0u8; 65];
		raw[64] = 27;
		let err = SignatureParts::from_raw(&raw).unwrap_err();
		assert!(matches!(err, PermitError::MalformedSignature(_)));
	}
}

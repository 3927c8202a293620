//! Attempt identity and state machine types.

use alloy_primitives::Address;
use std::fmt;

/// Identity of one authorization attempt.
///
/// At most one attempt per key may be in flight at a time; serializing on
/// the key, rather than locking the nonce value, is what keeps concurrent
/// attempts from racing each other to a stale counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttemptKey {
	/// Token owner granting the allowance.
	pub owner: Address,
	/// Contract being granted the allowance.
	pub spender: Address,
	/// Title being borrowed.
	pub title: String,
}

/// States an authorization attempt moves through.
///
/// Transitions run strictly forward; any component error moves the attempt
/// directly to `Failed` with no partial retry within the same attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
	Idle,
	BuildingDomain,
	FetchingNonce,
	ComposingMessage,
	AwaitingSignature,
	Decomposing,
	Submitting,
	Done,
	Failed,
}

impl fmt::Display for AttemptState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			AttemptState::Idle => "idle",
			AttemptState::BuildingDomain => "building_domain",
			AttemptState::FetchingNonce => "fetching_nonce",
			AttemptState::ComposingMessage => "composing_message",
			AttemptState::AwaitingSignature => "awaiting_signature",
			AttemptState::Decomposing => "decomposing",
			AttemptState::Submitting => "submitting",
			AttemptState::Done => "done",
			AttemptState::Failed => "failed",
		};
		f.write_str(name)
	}
}

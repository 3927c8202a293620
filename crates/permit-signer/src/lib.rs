//! Signing agent boundary for the permit borrow client.
//!
//! This module defines the interface to the external signing agent that
//! approves typed-data signatures on the user's behalf. Requesting a
//! signature is the single suspension point of the authorization flow: the
//! call blocks until the agent produces a signature, the operator declines,
//! or the agent becomes unreachable. The agent is an explicitly injected
//! capability so that concurrent sessions, and tests, never share state
//! through a process-wide singleton.

use async_trait::async_trait;
use permit_types::{PermitDomain, PermitMessage};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur while requesting a signature from the agent.
#[derive(Debug, Error)]
pub enum SignerError {
	/// The human operator declined the signature request.
	#[error("Signature request rejected by operator")]
	Rejected,
	/// The signing agent is disconnected or failed to respond.
	#[error("Signing agent unavailable: {0}")]
	Unavailable(String),
	/// The agent accepted the request but signing itself failed.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// A cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for signing agent implementations.
///
/// Implementations wrap whatever actually holds the key: a local private
/// key, a hardware wallet, or a browser extension relayed over a channel.
/// `sign_typed_data` must return the raw 65-byte recoverable signature over
/// the EIP-712 digest of the given domain and message.
#[async_trait]
pub trait SignerInterface: Send + Sync {
	/// Retrieves the address the agent signs as.
	async fn address(&self) -> Result<alloy_primitives::Address, SignerError>;

	/// Requests a typed-data signature over the permit message.
	///
	/// Blocks until the agent resolves the request one way or another.
	/// There is no partial outcome: the result is a raw signature,
	/// [`SignerError::Rejected`], or [`SignerError::Unavailable`].
	async fn sign_typed_data(
		&self,
		domain: &PermitDomain,
		message: &PermitMessage,
	) -> Result<Vec<u8>, SignerError>;
}

/// Service that manages signature requests against one signing agent.
///
/// This struct provides a high-level interface for signing operations,
/// wrapping an underlying agent implementation.
pub struct SignerService {
	/// The underlying signing agent implementation.
	implementation: Box<dyn SignerInterface>,
}

impl SignerService {
	/// Creates a new SignerService with the specified implementation.
	pub fn new(implementation: Box<dyn SignerInterface>) -> Self {
		Self { implementation }
	}

	/// Retrieves the address the managed agent signs as.
	pub async fn address(&self) -> Result<alloy_primitives::Address, SignerError> {
		self.implementation.address().await
	}

	/// Requests a typed-data signature from the managed agent.
	pub async fn sign_typed_data(
		&self,
		domain: &PermitDomain,
		message: &PermitMessage,
	) -> Result<Vec<u8>, SignerError> {
		self.implementation.sign_typed_data(domain, message).await
	}
}

//! Core authorization engine for the permit borrow client.
//!
//! This module provides the orchestration logic that turns a borrow request
//! into a single contract invocation: it builds the signing domain, fetches
//! a fresh authorization counter, composes the typed permit message,
//! requests a signature from the external signing agent, decomposes the
//! result into verifiable components, and submits the borrow call. Any
//! stage failure is fatal to that attempt only; nothing is retried without
//! fresh user consent.

use permit_contracts::ContractError;
use permit_signer::SignerError;
use permit_types::PermitError;
use thiserror::Error;

mod orchestrator;
mod state;

pub use orchestrator::AuthorizationOrchestrator;
pub use state::{AttemptKey, AttemptState};

/// Errors that can occur during an authorization attempt.
///
/// Every variant carries enough structure for a UI layer to render
/// feedback; none are swallowed. Revert reasons are passed through
/// unmodified from the contract layer.
#[derive(Debug, Error)]
pub enum AuthorizationError {
	/// The token contract's metadata query could not complete.
	#[error("Token metadata unavailable: {0}")]
	MetadataUnavailable(String),
	/// The owner's authorization counter could not be read.
	#[error("Nonce unavailable: {0}")]
	NonceUnavailable(String),
	/// Permit parameters failed client-side validation before signing.
	#[error("Invalid permit parameters: {0}")]
	InvalidPermitParameters(String),
	/// The human operator declined the signature request.
	#[error("Signature request rejected by operator")]
	SignatureRejected,
	/// The signing agent is disconnected or errored.
	#[error("Signing agent unavailable: {0}")]
	AgentUnavailable(String),
	/// The agent returned a structurally invalid signature.
	#[error("Malformed signature: {0}")]
	MalformedSignature(String),
	/// Another attempt for the same (owner, spender, title) is in flight.
	#[error("Authorization already in progress for this request")]
	AuthorizationInProgress,
	/// The borrow call reverted; the reason is verbatim from the contract.
	#[error("Contract reverted: {0}")]
	ContractReverted(String),
	/// The permit deadline lapsed before submission.
	#[error("Permit deadline expired")]
	DeadlineExpired,
	/// Book parameters failed client-side validation.
	#[error("Invalid book parameters: {0}")]
	InvalidBookParameters(String),
	/// Error during network communication with the node.
	#[error("Network error: {0}")]
	Network(String),
	/// Error building services from configuration.
	#[error("Configuration error: {0}")]
	Config(String),
}

impl From<ContractError> for AuthorizationError {
	fn from(err: ContractError) -> Self {
		match err {
			ContractError::MetadataUnavailable(msg) => Self::MetadataUnavailable(msg),
			ContractError::NonceUnavailable(msg) => Self::NonceUnavailable(msg),
			ContractError::Reverted(reason) => Self::ContractReverted(reason),
			ContractError::Network(msg) => Self::Network(msg),
			ContractError::InvalidBookParameters(msg) => Self::InvalidBookParameters(msg),
		}
	}
}

impl From<SignerError> for AuthorizationError {
	fn from(err: SignerError) -> Self {
		match err {
			SignerError::Rejected => Self::SignatureRejected,
			SignerError::Unavailable(msg) => Self::AgentUnavailable(msg),
			SignerError::SigningFailed(msg) => Self::AgentUnavailable(msg),
			SignerError::InvalidKey(msg) => Self::AgentUnavailable(msg),
		}
	}
}

impl From<PermitError> for AuthorizationError {
	fn from(err: PermitError) -> Self {
		match err {
			PermitError::InvalidParameters(msg) => Self::InvalidPermitParameters(msg),
			PermitError::MalformedSignature(msg) => Self::MalformedSignature(msg),
		}
	}
}

impl From<permit_config::ConfigError> for AuthorizationError {
	fn from(err: permit_config::ConfigError) -> Self {
		Self::Config(err.to_string())
	}
}

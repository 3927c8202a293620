//! Local private key signing agent.
//!
//! Signs permit digests with an in-process private key. This is the
//! implementation used in tests and in headless deployments where no human
//! approval step exists; it never rejects a request on its own.

use crate::{SignerError, SignerInterface};
use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use permit_types::{PermitDomain, PermitMessage};

/// Signing agent backed by a local private key.
#[derive(Debug)]
pub struct LocalSigner {
	signer: PrivateKeySigner,
}

impl LocalSigner {
	/// Creates a local signer from a hex-encoded private key.
	pub fn from_private_key(key: &str) -> Result<Self, SignerError> {
		let signer: PrivateKeySigner = key
			.parse()
			.map_err(|_| SignerError::InvalidKey("invalid private key format".to_string()))?;
		Ok(Self { signer })
	}

	/// Creates a local signer from an existing alloy signer.
	pub fn new(signer: PrivateKeySigner) -> Self {
		Self { signer }
	}
}

#[async_trait]
impl SignerInterface for LocalSigner {
	async fn address(&self) -> Result<Address, SignerError> {
		Ok(self.signer.address())
	}

	async fn sign_typed_data(
		&self,
		domain: &PermitDomain,
		message: &PermitMessage,
	) -> Result<Vec<u8>, SignerError> {
		let digest = message.signing_digest(domain);
		let signature = self
			.signer
			.sign_hash(&digest)
			.await
			.map_err(|e| SignerError::SigningFailed(e.to_string()))?;
		Ok(signature.as_bytes().to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::SignerService;
	use alloy_primitives::{address, PrimitiveSignature, U256};
	use permit_types::{current_timestamp, SignatureParts};

	// Well-known hardhat development key, address 0xf39F..2266.
	const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn domain() -> PermitDomain {
		PermitDomain {
			name: "LIB Token".to_string(),
			version: "1".to_string(),
			verifying_contract: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
		}
	}

	#[tokio::test]
	async fn test_signature_recovers_to_owner() {
		let agent = LocalSigner::from_private_key(DEV_KEY).unwrap();
		let owner = agent.address().await.unwrap();
		let spender = address!("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB");
		let deadline = current_timestamp() + 3600;
		let message = PermitMessage::compose(
			owner,
			spender,
			U256::from(100_000_000_000_000_000u128),
			U256::from(3),
			deadline,
		)
		.unwrap();

		let raw = agent.sign_typed_data(&domain(), &message).await.unwrap();
		let parts = SignatureParts::from_raw(&raw).unwrap();
		assert!(parts.v == 27 || parts.v == 28);

		let signature = PrimitiveSignature::try_from(raw.as_slice()).unwrap();
		let recovered = signature
			.recover_address_from_prehash(&message.signing_digest(&domain()))
			.unwrap();
		assert_eq!(recovered, owner);
	}

	#[tokio::test]
	async fn test_signature_does_not_verify_under_other_domain() {
		let agent = LocalSigner::from_private_key(DEV_KEY).unwrap();
		let owner = agent.address().await.unwrap();
		let spender = address!("BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB");
		let message = PermitMessage::compose(
			owner,
			spender,
			U256::from(100_000_000_000_000_000u128),
			U256::from(3),
			current_timestamp() + 3600,
		)
		.unwrap();

		let raw = agent.sign_typed_data(&domain(), &message).await.unwrap();
		let signature = PrimitiveSignature::try_from(raw.as_slice()).unwrap();

		let mut other = domain();
		other.verifying_contract = address!("A8E46754033a8Fa049Fe602418B3B9D4B630fc94");
		let recovered = signature
			.recover_address_from_prehash(&message.signing_digest(&other))
			.unwrap();
		assert_ne!(recovered, owner);
	}

	#[tokio::test]
	async fn test_invalid_key_is_rejected() {
		let err = LocalSigner::from_private_key("not-a-key").unwrap_err();
		assert!(matches!(err, SignerError::InvalidKey(_)));
	}

	#[tokio::test]
	async fn test_service_delegates_to_implementation() {
		let agent = LocalSigner::from_private_key(DEV_KEY).unwrap();
		let expected = agent.address().await.unwrap();
		let service = SignerService::new(Box::new(agent));
		assert_eq!(service.address().await.unwrap(), expected);
	}
}

//! Alloy-based EVM implementations of the contract interfaces.
//!
//! This module provides concrete implementations of the TokenInterface and
//! LibraryInterface traits over HTTP JSON-RPC, using the Alloy library for
//! call encoding, transaction submission and confirmation tracking.

use crate::{ContractError, LibraryInterface, TokenInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, FixedBytes, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolCall};
use alloy_transport_http::Http;
use async_trait::async_trait;
use permit_types::{
	with_0x_prefix, AuthorizationResult, BookRecord, TransactionHash, TransactionReceipt,
};
use std::sync::Arc;

// Solidity interface definitions for the two external contracts.
sol! {
	/// Read surface of the permit-capable deposit token.
	interface IPermitToken {
		function name() external view returns (string);
		function nonces(address owner) external view returns (uint256);
	}

	/// Call surface of the book library contract.
	interface IBookLibrary {
		function borrowBook(string title, uint256 value, uint256 deadline, uint8 v, bytes32 r, bytes32 s) external;
		function returnBook(string title) external;
		function addBook(string title, uint8 copies) external;
		function getAvailableBooks() external view returns (string[]);
		function isBorrowed(string title) external view returns (bool);
	}
}

type HttpProvider = Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>;

/// Classifies a provider error, passing revert reasons through verbatim.
fn classify_send_error(msg: String) -> ContractError {
	if msg.contains("revert") {
		ContractError::Reverted(msg)
	} else {
		ContractError::Network(msg)
	}
}

/// Builds a read-only HTTP provider.
fn read_provider(rpc_url: &str) -> Result<HttpProvider, ContractError> {
	let url = rpc_url
		.parse()
		.map_err(|e| ContractError::Network(format!("Invalid RPC URL: {}", e)))?;
	let provider = ProviderBuilder::new().on_http(url);
	Ok(Arc::new(provider) as HttpProvider)
}

/// Builds an HTTP provider with a wallet attached for transaction sending.
fn wallet_provider(rpc_url: &str, signer: PrivateKeySigner) -> Result<HttpProvider, ContractError> {
	let url = rpc_url
		.parse()
		.map_err(|e| ContractError::Network(format!("Invalid RPC URL: {}", e)))?;
	let wallet = EthereumWallet::from(signer);
	let provider = ProviderBuilder::new()
		.with_recommended_fillers()
		.wallet(wallet)
		.on_http(url);
	Ok(Arc::new(provider) as HttpProvider)
}

/// Alloy-based implementation of the token read interface.
pub struct AlloyPermitToken {
	provider: HttpProvider,
	address: Address,
}

impl AlloyPermitToken {
	/// Creates a token reader against the given RPC endpoint.
	pub fn new(rpc_url: &str, address: Address) -> Result<Self, ContractError> {
		Ok(Self {
			provider: read_provider(rpc_url)?,
			address,
		})
	}

	async fn call(&self, data: Vec<u8>) -> Result<Vec<u8>, String> {
		let request = TransactionRequest::default()
			.to(self.address)
			.input(data.into());
		let bytes = self
			.provider
			.call(&request)
			.await
			.map_err(|e| e.to_string())?;
		Ok(bytes.to_vec())
	}
}

#[async_trait]
impl TokenInterface for AlloyPermitToken {
	fn address(&self) -> Address {
		self.address
	}

	async fn name(&self) -> Result<String, ContractError> {
		let data = IPermitToken::nameCall {}.abi_encode();
		let result = self
			.call(data)
			.await
			.map_err(ContractError::MetadataUnavailable)?;
		let decoded = IPermitToken::nameCall::abi_decode_returns(&result, true)
			.map_err(|e| ContractError::MetadataUnavailable(format!("Invalid response: {}", e)))?;
		Ok(decoded._0)
	}

	async fn nonces(&self, owner: Address) -> Result<U256, ContractError> {
		let data = IPermitToken::noncesCall { owner }.abi_encode();
		let result = self
			.call(data)
			.await
			.map_err(ContractError::NonceUnavailable)?;
		let decoded = IPermitToken::noncesCall::abi_decode_returns(&result, true)
			.map_err(|e| ContractError::NonceUnavailable(format!("Invalid response: {}", e)))?;
		Ok(decoded._0)
	}
}

/// Alloy-based implementation of the library call interface.
///
/// Transactions are signed by the wallet attached to the provider and
/// confirmed by polling, the same bounded-wait shape used for every
/// submission this client makes.
pub struct AlloyBookLibrary {
	provider: HttpProvider,
	address: Address,
	confirmations: u64,
}

impl AlloyBookLibrary {
	/// Creates a library caller against the given RPC endpoint.
	pub fn new(
		rpc_url: &str,
		address: Address,
		signer: PrivateKeySigner,
		confirmations: u64,
	) -> Result<Self, ContractError> {
		Ok(Self {
			provider: wallet_provider(rpc_url, signer)?,
			address,
			confirmations,
		})
	}

	async fn view(&self, data: Vec<u8>) -> Result<Vec<u8>, ContractError> {
		let request = TransactionRequest::default()
			.to(self.address)
			.input(data.into());
		let bytes = self
			.provider
			.call(&request)
			.await
			.map_err(|e| ContractError::Network(e.to_string()))?;
		Ok(bytes.to_vec())
	}

	/// Submits a transaction and waits for it to reach the configured
	/// confirmation depth.
	async fn send_and_confirm(&self, data: Vec<u8>) -> Result<TransactionReceipt, ContractError> {
		let request = TransactionRequest::default()
			.to(self.address)
			.input(data.into());

		// Reverts surface here during gas estimation; the reason string is
		// forwarded untouched.
		let pending = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| classify_send_error(e.to_string()))?;

		let tx_hash = *pending.tx_hash();
		tracing::info!(
			tx_hash = %with_0x_prefix(&hex::encode(tx_hash.0)),
			"Submitted transaction"
		);

		self.wait_for_confirmation(tx_hash).await
	}

	async fn wait_for_confirmation(
		&self,
		tx_hash: FixedBytes<32>,
	) -> Result<TransactionReceipt, ContractError> {
		let poll_interval = tokio::time::Duration::from_secs(2);
		// Allow ~15 seconds per confirmation plus some buffer
		let seconds_per_confirmation = 20;
		let timeout_seconds = (self.confirmations * seconds_per_confirmation)
			.max(seconds_per_confirmation)
			.min(600);
		let max_wait_time = tokio::time::Duration::from_secs(timeout_seconds);
		let start_time = tokio::time::Instant::now();

		loop {
			if start_time.elapsed() > max_wait_time {
				return Err(ContractError::Network(format!(
					"Timeout waiting for {} confirmations after {} seconds",
					self.confirmations, timeout_seconds
				)));
			}

			let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
				Ok(Some(receipt)) => receipt,
				Ok(None) => {
					// Not yet mined, wait and retry
					tokio::time::sleep(poll_interval).await;
					continue;
				}
				Err(e) => {
					return Err(ContractError::Network(format!(
						"Failed to get receipt: {}",
						e
					)));
				}
			};

			let current_block = self
				.provider
				.get_block_number()
				.await
				.map_err(|e| ContractError::Network(format!("Failed to get block number: {}", e)))?;

			let tx_block = receipt.block_number.unwrap_or(0);
			if current_block.saturating_sub(tx_block) >= self.confirmations {
				if !receipt.status() {
					return Err(ContractError::Reverted(format!(
						"transaction {} reverted on-chain",
						with_0x_prefix(&hex::encode(receipt.transaction_hash.0))
					)));
				}
				return Ok(TransactionReceipt {
					hash: TransactionHash(receipt.transaction_hash.0.to_vec()),
					block_number: tx_block,
					success: true,
				});
			}

			tokio::time::sleep(poll_interval).await;
		}
	}
}

#[async_trait]
impl LibraryInterface for AlloyBookLibrary {
	fn address(&self) -> Address {
		self.address
	}

	async fn borrow(
		&self,
		title: &str,
		value: U256,
		authorization: &AuthorizationResult,
	) -> Result<TransactionReceipt, ContractError> {
		let data = IBookLibrary::borrowBookCall {
			title: title.to_string(),
			value,
			deadline: U256::from(authorization.deadline),
			v: authorization.v,
			r: authorization.r,
			s: authorization.s,
		}
		.abi_encode();
		self.send_and_confirm(data).await
	}

	async fn available_books(&self) -> Result<Vec<BookRecord>, ContractError> {
		let data = IBookLibrary::getAvailableBooksCall {}.abi_encode();
		let result = self.view(data).await?;
		let decoded = IBookLibrary::getAvailableBooksCall::abi_decode_returns(&result, true)
			.map_err(|e| ContractError::Network(format!("Invalid response: {}", e)))?;
		// Legacy wire form decoded once, here.
		Ok(decoded
			._0
			.iter()
			.map(|wire| BookRecord::from_legacy_wire(wire))
			.collect())
	}

	async fn is_borrowed(&self, title: &str) -> Result<bool, ContractError> {
		let data = IBookLibrary::isBorrowedCall {
			title: title.to_string(),
		}
		.abi_encode();
		let result = self.view(data).await?;
		let decoded = IBookLibrary::isBorrowedCall::abi_decode_returns(&result, true)
			.map_err(|e| ContractError::Network(format!("Invalid response: {}", e)))?;
		Ok(decoded._0)
	}

	async fn add_book(&self, title: &str, copies: u8) -> Result<TransactionReceipt, ContractError> {
		let data = IBookLibrary::addBookCall {
			title: title.to_string(),
			copies,
		}
		.abi_encode();
		self.send_and_confirm(data).await
	}

	async fn return_book(&self, title: &str) -> Result<TransactionReceipt, ContractError> {
		let data = IBookLibrary::returnBookCall {
			title: title.to_string(),
		}
		.abi_encode();
		self.send_and_confirm(data).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_revert_messages_pass_through_verbatim() {
		let err = classify_send_error("execution reverted: Book is already borrowed".to_string());
		match err {
			ContractError::Reverted(reason) => {
				assert_eq!(reason, "execution reverted: Book is already borrowed")
			}
			other => panic!("expected revert, got {:?}", other),
		}
	}

	#[test]
	fn test_transport_errors_are_not_reverts() {
		let err = classify_send_error("connection refused".to_string());
		assert!(matches!(err, ContractError::Network(_)));
	}

	#[test]
	fn test_borrow_call_encodes_selector() {
		let data = IBookLibrary::borrowBookCall {
			title: "Dune".to_string(),
			value: U256::from(1),
			deadline: U256::from(2),
			v: 27,
			r: FixedBytes::<32>::from([1u8; 32]),
			s: FixedBytes::<32>::from([2u8; 32]),
		}
		.abi_encode();
		assert_eq!(&data[..4], IBookLibrary::borrowBookCall::SELECTOR);
	}
}

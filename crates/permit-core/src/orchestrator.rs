//! Authorization orchestrator.
//!
//! Sequences the full permit flow for one borrow attempt: domain build,
//! nonce fetch, message composition, signature request, decomposition, and
//! the borrow submission. The wait for the signing agent is the single
//! suspension point; every other step is a bounded call. A failure at any
//! stage moves the attempt straight to `Failed` and releases its in-flight
//! slot, so the next attempt starts clean with a fresh nonce and deadline.

use crate::state::{AttemptKey, AttemptState};
use crate::AuthorizationError;
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use permit_config::Config;
use permit_contracts::implementations::evm::alloy::{AlloyBookLibrary, AlloyPermitToken};
use permit_contracts::{LibraryService, TokenService};
use permit_signer::{SignerInterface, SignerService};
use permit_types::{
	current_timestamp, truncate_id, AuthorizationResult, BorrowRequest, PermitDomain,
	PermitMessage, SignatureParts, TransactionReceipt, DOMAIN_VERSION,
};
use std::sync::Arc;

/// Orchestrates permit-based borrow attempts against injected services.
///
/// The signing agent is an injected capability per instance, never global
/// state, so concurrent sessions and tests do not interfere. The nonce
/// counter itself is owned and serialized by the token contract; this
/// orchestrator only guards against issuing two requests for the same
/// intent at once.
pub struct AuthorizationOrchestrator {
	/// Token contract reads (domain metadata, authorization counter).
	token: Arc<TokenService>,
	/// Library contract calls (the borrow entry point).
	library: Arc<LibraryService>,
	/// External signing agent.
	signer: Arc<SignerService>,
	/// Validity window added to the current time to form each deadline.
	validity_secs: u64,
	/// Attempts currently between admission and terminal state.
	in_flight: DashMap<AttemptKey, ()>,
}

/// Releases an attempt's in-flight slot on drop, whatever the outcome.
struct InFlightGuard<'a> {
	slots: &'a DashMap<AttemptKey, ()>,
	key: AttemptKey,
}

impl Drop for InFlightGuard<'_> {
	fn drop(&mut self) {
		self.slots.remove(&self.key);
	}
}

fn advance(state: &mut AttemptState, next: AttemptState) {
	tracing::debug!(from = %*state, to = %next, "Authorization state transition");
	*state = next;
}

/// Client-side deadline check performed immediately before submission.
fn ensure_deadline_valid(deadline: u64, now: u64) -> Result<(), AuthorizationError> {
	if deadline < now {
		return Err(AuthorizationError::DeadlineExpired);
	}
	Ok(())
}

impl AuthorizationOrchestrator {
	/// Creates an orchestrator over already-built services.
	pub fn new(
		token: Arc<TokenService>,
		library: Arc<LibraryService>,
		signer: Arc<SignerService>,
		validity_secs: u64,
	) -> Self {
		Self {
			token,
			library,
			signer,
			validity_secs,
			in_flight: DashMap::new(),
		}
	}

	/// Builds an orchestrator from configuration, wiring the Alloy-backed
	/// contract implementations to the given signing agent and submission
	/// key.
	pub fn from_config(
		config: &Config,
		agent: Box<dyn SignerInterface>,
		submitter: PrivateKeySigner,
	) -> Result<Self, AuthorizationError> {
		let token = AlloyPermitToken::new(&config.rpc_url, config.token_address()?)?;
		let library = AlloyBookLibrary::new(
			&config.rpc_url,
			config.library_address()?,
			submitter,
			config.submission.confirmations,
		)?;
		Ok(Self::new(
			Arc::new(TokenService::new(Box::new(token))),
			Arc::new(LibraryService::new(Box::new(library))),
			Arc::new(SignerService::new(agent)),
			config.permit.validity_secs,
		))
	}

	/// Runs one authorization-to-submission attempt for a borrow request.
	///
	/// At most one attempt per (owner, spender, title) may be in flight;
	/// a concurrent duplicate fails fast with
	/// [`AuthorizationError::AuthorizationInProgress`] instead of racing
	/// the first attempt to the nonce. Every terminal outcome releases the
	/// slot, so a rejected or failed attempt can be retried immediately
	/// and will re-fetch everything.
	pub async fn borrow_with_permit(
		&self,
		owner: Address,
		request: BorrowRequest,
	) -> Result<TransactionReceipt, AuthorizationError> {
		let key = AttemptKey {
			owner,
			spender: request.spender,
			title: request.title.clone(),
		};
		let _guard = self.admit(key)?;

		tracing::info!(
			owner = %owner,
			title = %request.title,
			"Starting borrow authorization"
		);

		let result = self.run_attempt(owner, &request).await;
		match &result {
			Ok(receipt) => {
				tracing::info!(
					title = %request.title,
					block = receipt.block_number,
					"Borrow authorization complete"
				);
			}
			Err(e) => {
				tracing::warn!(
					title = %request.title,
					state = %AttemptState::Failed,
					error = %e,
					"Borrow authorization failed"
				);
			}
		}
		result
	}

	fn admit(&self, key: AttemptKey) -> Result<InFlightGuard<'_>, AuthorizationError> {
		match self.in_flight.entry(key.clone()) {
			Entry::Occupied(_) => Err(AuthorizationError::AuthorizationInProgress),
			Entry::Vacant(slot) => {
				slot.insert(());
				Ok(InFlightGuard {
					slots: &self.in_flight,
					key,
				})
			}
		}
	}

	async fn run_attempt(
		&self,
		owner: Address,
		request: &BorrowRequest,
	) -> Result<TransactionReceipt, AuthorizationError> {
		let mut state = AttemptState::Idle;

		if request.spender != self.library.address() {
			return Err(AuthorizationError::InvalidPermitParameters(format!(
				"spender {} is not the library contract",
				request.spender
			)));
		}

		advance(&mut state, AttemptState::BuildingDomain);
		let name = self.token.name().await?;
		let domain = PermitDomain {
			name,
			version: DOMAIN_VERSION.to_string(),
			verifying_contract: self.token.address(),
		};

		// Fetched fresh for every attempt: the counter is stale the moment
		// another authorization for this owner is mined.
		advance(&mut state, AttemptState::FetchingNonce);
		let nonce = self.token.nonces(owner).await?;

		advance(&mut state, AttemptState::ComposingMessage);
		let deadline = current_timestamp() + self.validity_secs;
		let message =
			PermitMessage::compose(owner, request.spender, request.value, nonce, deadline)?;

		// The single suspension point: blocks until the agent signs, the
		// operator declines, or the agent drops.
		advance(&mut state, AttemptState::AwaitingSignature);
		let raw = self.signer.sign_typed_data(&domain, &message).await?;

		advance(&mut state, AttemptState::Decomposing);
		let parts = SignatureParts::from_raw(&raw)?;
		let authorization = AuthorizationResult::new(parts, deadline);

		advance(&mut state, AttemptState::Submitting);
		ensure_deadline_valid(deadline, current_timestamp())?;
		tracing::debug!(
			nonce = %nonce,
			deadline,
			r = %truncate_id(&format!("{}", authorization.r)),
			"Submitting borrow with permit"
		);
		let receipt = self
			.library
			.borrow(&request.title, request.value, &authorization)
			.await?;

		advance(&mut state, AttemptState::Done);
		Ok(receipt)
	}
}

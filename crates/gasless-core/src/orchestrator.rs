//! The gasless operation orchestrator.
//!
//! Each invocation walks a fixed state machine:
//! `FetchingNonce -> Signing -> Relaying -> {Succeeded | Failed}`. A failure
//! at any step is terminal for that invocation; later steps never run. The
//! orchestrator holds no nonce state across invocations; every operation
//! fetches a fresh nonce from the authority, and at most one operation per
//! user is in flight at a time so a reserved nonce is never handed out twice.
//!
//! Dropping the returned future before the relaying phase has no on-chain
//! effect. Once a submission reaches the relay, the relay's decision stands;
//! the orchestrator reports whatever terminal outcome the relay produces.

use crate::error::BuildError;
use alloy::primitives::{Address, TxHash, U256};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use gasless_nonce::NonceSource;
use gasless_relay::RelayInterface;
use gasless_signing::{AuthorizationBuilder, SigningDomain};
use gasless_types::{
	DepositIntent, GaslessError, OperationResult, SignedDeposit, SignedWithdraw, WithdrawIntent,
};
use gasless_wallet::WalletInterface;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Observable phase of an in-flight operation.
///
/// Absence from the in-flight map means the user is idle; terminal states
/// are reported through the operation result, not tracked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationPhase {
	FetchingNonce,
	Signing,
	Relaying,
}

/// Caller-facing completion hooks, each invoked at most once per invocation.
#[derive(Default)]
pub struct OperationCallbacks {
	on_success: Option<Box<dyn FnOnce(TxHash) + Send>>,
	on_error: Option<Box<dyn FnOnce(String) + Send>>,
}

impl OperationCallbacks {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn on_success(mut self, callback: impl FnOnce(TxHash) + Send + 'static) -> Self {
		self.on_success = Some(Box::new(callback));
		self
	}

	pub fn on_error(mut self, callback: impl FnOnce(String) + Send + 'static) -> Self {
		self.on_error = Some(Box::new(callback));
		self
	}

	fn fire(self, result: &OperationResult) {
		if result.success {
			if let (Some(callback), Some(hash)) = (self.on_success, result.transaction_hash) {
				callback(hash);
			}
		} else if let (Some(callback), Some(error)) = (self.on_error, result.error.clone()) {
			callback(error);
		}
	}
}

enum OperationKind {
	Deposit {
		assets: U256,
		receiver: Address,
	},
	Withdraw {
		assets: U256,
		receiver: Address,
		owner: Address,
	},
}

impl OperationKind {
	fn label(&self) -> &'static str {
		match self {
			OperationKind::Deposit { .. } => "deposit",
			OperationKind::Withdraw { .. } => "withdraw",
		}
	}
}

/// Removes the user's in-flight entry when the invocation ends, whether it
/// completes or the caller drops the future.
struct InFlightGuard<'a> {
	map: &'a DashMap<Address, OperationPhase>,
	user: Address,
}

impl Drop for InFlightGuard<'_> {
	fn drop(&mut self) {
		self.map.remove(&self.user);
	}
}

/// Composes nonce tracking, authorization signing, and relay submission into
/// one terminal outcome per user-initiated operation.
pub struct GaslessOrchestrator {
	wallet: Arc<dyn WalletInterface>,
	nonces: Arc<dyn NonceSource>,
	relay: Arc<dyn RelayInterface>,
	builder: AuthorizationBuilder,
	in_flight: DashMap<Address, OperationPhase>,
}

impl GaslessOrchestrator {
	/// Executes a gasless deposit for the connected wallet.
	pub async fn execute_gasless_deposit(
		&self,
		assets: U256,
		receiver: Address,
	) -> OperationResult {
		self.execute(
			OperationKind::Deposit { assets, receiver },
			OperationCallbacks::new(),
		)
		.await
	}

	/// Executes a gasless deposit, invoking the callbacks terminally.
	pub async fn execute_gasless_deposit_with(
		&self,
		assets: U256,
		receiver: Address,
		callbacks: OperationCallbacks,
	) -> OperationResult {
		self.execute(OperationKind::Deposit { assets, receiver }, callbacks)
			.await
	}

	/// Executes a gasless withdrawal for the connected wallet.
	pub async fn execute_gasless_withdraw(
		&self,
		assets: U256,
		receiver: Address,
		owner: Address,
	) -> OperationResult {
		self.execute(
			OperationKind::Withdraw {
				assets,
				receiver,
				owner,
			},
			OperationCallbacks::new(),
		)
		.await
	}

	/// Executes a gasless withdrawal, invoking the callbacks terminally.
	pub async fn execute_gasless_withdraw_with(
		&self,
		assets: U256,
		receiver: Address,
		owner: Address,
		callbacks: OperationCallbacks,
	) -> OperationResult {
		self.execute(
			OperationKind::Withdraw {
				assets,
				receiver,
				owner,
			},
			callbacks,
		)
		.await
	}

	/// True while an operation for `user` is anywhere between nonce fetch
	/// and the relay decision.
	pub fn is_loading(&self, user: Address) -> bool {
		self.in_flight.contains_key(&user)
	}

	/// The current phase of the user's in-flight operation, if any.
	pub fn phase(&self, user: Address) -> Option<OperationPhase> {
		self.in_flight.get(&user).map(|entry| *entry.value())
	}

	async fn execute(&self, kind: OperationKind, callbacks: OperationCallbacks) -> OperationResult {
		let user = match self.wallet.address().await {
			Ok(address) => address,
			Err(e) => {
				warn!("Gasless {} refused: wallet not connected: {}", kind.label(), e);
				return Self::finish(callbacks, Err(GaslessError::WalletNotConnected));
			}
		};

		// Single-flight per user. A second request while one is in flight is
		// rejected rather than queued; queueing would reserve a nonce across
		// an unbounded wait.
		let guard = match self.in_flight.entry(user) {
			Entry::Occupied(_) => {
				warn!("Gasless {} refused: operation already in flight for {}", kind.label(), user);
				return Self::finish(
					callbacks,
					Err(GaslessError::ConcurrentOperationInProgress(user)),
				);
			}
			Entry::Vacant(slot) => {
				slot.insert(OperationPhase::FetchingNonce);
				InFlightGuard {
					map: &self.in_flight,
					user,
				}
			}
		};

		let outcome = self.run(user, kind).await;
		drop(guard);
		Self::finish(callbacks, outcome)
	}

	async fn run(&self, user: Address, kind: OperationKind) -> Result<TxHash, GaslessError> {
		debug!("Fetching nonce for {} ({})", user, kind.label());
		let nonce = self
			.nonces
			.get_user_nonce(user)
			.await
			.map_err(GaslessError::from)?;

		self.in_flight.insert(user, OperationPhase::Signing);

		let hash = match kind {
			OperationKind::Deposit { assets, receiver } => {
				let intent = DepositIntent {
					user,
					assets,
					receiver,
					nonce,
				};
				let signature = self.builder.create_deposit_signature(&intent).await?;
				self.in_flight.insert(user, OperationPhase::Relaying);

				let authorization = SignedDeposit { intent, signature };
				self.relay.execute_gasless_deposit(&authorization).await?
			}
			OperationKind::Withdraw {
				assets,
				receiver,
				owner,
			} => {
				let intent = WithdrawIntent {
					user,
					assets,
					receiver,
					owner,
					nonce,
				};
				let signature = self.builder.create_withdraw_signature(&intent).await?;
				self.in_flight.insert(user, OperationPhase::Relaying);

				let authorization = SignedWithdraw { intent, signature };
				self.relay.execute_gasless_withdraw(&authorization).await?
			}
		};

		info!("Gasless operation for {} relayed as {}", user, hash);
		Ok(hash)
	}

	fn finish(
		callbacks: OperationCallbacks,
		outcome: Result<TxHash, GaslessError>,
	) -> OperationResult {
		let result = match outcome {
			Ok(hash) => OperationResult::succeeded(hash),
			Err(error) => OperationResult::failed(&error),
		};
		callbacks.fire(&result);
		result
	}
}

/// Builder wiring the orchestrator's collaborators together.
pub struct OrchestratorBuilder {
	wallet: Option<Arc<dyn WalletInterface>>,
	nonces: Option<Arc<dyn NonceSource>>,
	relay: Option<Arc<dyn RelayInterface>>,
	domain: Option<SigningDomain>,
}

impl OrchestratorBuilder {
	pub fn new() -> Self {
		Self {
			wallet: None,
			nonces: None,
			relay: None,
			domain: None,
		}
	}

	pub fn with_wallet(mut self, wallet: Arc<dyn WalletInterface>) -> Self {
		self.wallet = Some(wallet);
		self
	}

	pub fn with_nonce_source(mut self, nonces: Arc<dyn NonceSource>) -> Self {
		self.nonces = Some(nonces);
		self
	}

	pub fn with_relay(mut self, relay: Arc<dyn RelayInterface>) -> Self {
		self.relay = Some(relay);
		self
	}

	pub fn with_signing_domain(mut self, domain: SigningDomain) -> Self {
		self.domain = Some(domain);
		self
	}

	pub fn build(self) -> Result<GaslessOrchestrator, BuildError> {
		let wallet = self.wallet.ok_or(BuildError::MissingComponent("wallet"))?;
		let nonces = self
			.nonces
			.ok_or(BuildError::MissingComponent("nonce source"))?;
		let relay = self.relay.ok_or(BuildError::MissingComponent("relay"))?;
		let domain = self
			.domain
			.ok_or(BuildError::MissingComponent("signing domain"))?;

		let builder = AuthorizationBuilder::new(domain, wallet.clone());

		Ok(GaslessOrchestrator {
			wallet,
			nonces,
			relay,
			builder,
			in_flight: DashMap::new(),
		})
	}
}

impl Default for OrchestratorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

//! Authorization construction and signing for gasless vault operations.
//!
//! The builder turns a deposit or withdraw intent into an EIP-712 typed-data
//! digest bound to the vault's signing domain, then delegates the signature
//! to the caller-supplied wallet capability. It performs no network I/O and
//! never holds key material. The same intent under the same domain always
//! produces the same digest; a signature valid for one vault or chain can
//! never validate against another.

use alloy::primitives::{Address, Signature, U256};
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolStruct};
use gasless_types::{DepositIntent, GaslessError, WithdrawIntent};
use gasless_wallet::{WalletError, WalletInterface};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

// Typed-data layouts fixed by the on-chain verifier. Field order matters.
sol! {
	struct DepositAuthorization {
		address user;
		uint256 assets;
		address receiver;
		uint256 nonce;
	}

	struct WithdrawAuthorization {
		address user;
		uint256 assets;
		address receiver;
		address owner;
		uint256 nonce;
	}
}

#[derive(Debug, Error)]
pub enum SigningError {
	#[error("Invalid intent: {0}")]
	InvalidIntent(String),
	#[error("Signing rejected: {0}")]
	SigningRejected(String),
}

impl From<SigningError> for GaslessError {
	fn from(err: SigningError) -> Self {
		match err {
			SigningError::InvalidIntent(reason) => GaslessError::InvalidIntent(reason),
			SigningError::SigningRejected(reason) => GaslessError::SigningRejected(reason),
		}
	}
}

impl From<WalletError> for SigningError {
	fn from(err: WalletError) -> Self {
		SigningError::SigningRejected(err.to_string())
	}
}

/// Parameters a signature is cryptographically bound to.
///
/// Supplied per deployment through configuration; never hard-coded.
#[derive(Debug, Clone)]
pub struct SigningDomain {
	/// Protocol name advertised in the EIP-712 domain.
	pub name: String,
	/// Protocol version advertised in the EIP-712 domain.
	pub version: String,
	/// The vault contract verifying signatures.
	pub vault: Address,
	/// Chain the vault is deployed on.
	pub chain_id: u64,
}

impl SigningDomain {
	fn eip712(&self) -> Eip712Domain {
		Eip712Domain::new(
			Some(self.name.clone().into()),
			Some(self.version.clone().into()),
			Some(U256::from(self.chain_id)),
			Some(self.vault),
			None,
		)
	}
}

/// Builds domain-separated authorizations and obtains user signatures.
pub struct AuthorizationBuilder {
	domain: SigningDomain,
	wallet: Arc<dyn WalletInterface>,
}

impl AuthorizationBuilder {
	pub fn new(domain: SigningDomain, wallet: Arc<dyn WalletInterface>) -> Self {
		Self { domain, wallet }
	}

	/// The EIP-712 signing hash for a deposit intent under this domain.
	pub fn deposit_signing_hash(&self, intent: &DepositIntent) -> alloy::primitives::B256 {
		let authorization = DepositAuthorization {
			user: intent.user,
			assets: intent.assets,
			receiver: intent.receiver,
			nonce: U256::from(intent.nonce),
		};
		authorization.eip712_signing_hash(&self.domain.eip712())
	}

	/// The EIP-712 signing hash for a withdraw intent under this domain.
	pub fn withdraw_signing_hash(&self, intent: &WithdrawIntent) -> alloy::primitives::B256 {
		let authorization = WithdrawAuthorization {
			user: intent.user,
			assets: intent.assets,
			receiver: intent.receiver,
			owner: intent.owner,
			nonce: U256::from(intent.nonce),
		};
		authorization.eip712_signing_hash(&self.domain.eip712())
	}

	/// Validates a deposit intent and obtains the user's signature over it.
	pub async fn create_deposit_signature(
		&self,
		intent: &DepositIntent,
	) -> Result<Signature, SigningError> {
		intent
			.validate()
			.map_err(|e| SigningError::InvalidIntent(e.to_string()))?;

		let digest = self.deposit_signing_hash(intent);
		debug!(
			"Requesting deposit signature for user {} nonce {}",
			intent.user, intent.nonce
		);

		Ok(self.wallet.sign_digest(digest).await?)
	}

	/// Validates a withdraw intent and obtains the user's signature over it.
	pub async fn create_withdraw_signature(
		&self,
		intent: &WithdrawIntent,
	) -> Result<Signature, SigningError> {
		intent
			.validate()
			.map_err(|e| SigningError::InvalidIntent(e.to_string()))?;

		let digest = self.withdraw_signing_hash(intent);
		debug!(
			"Requesting withdraw signature for user {} nonce {}",
			intent.user, intent.nonce
		);

		Ok(self.wallet.sign_digest(digest).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::sol_types::SolValue;
	use gasless_wallet::LocalWallet;

	const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn addr(byte: u8) -> Address {
		Address::from([byte; 20])
	}

	fn domain() -> SigningDomain {
		SigningDomain {
			name: "GaslessVault".to_string(),
			version: "1".to_string(),
			vault: addr(0x77),
			chain_id: 8217,
		}
	}

	fn builder_with(domain: SigningDomain) -> AuthorizationBuilder {
		let wallet = Arc::new(LocalWallet::new(DEV_KEY, domain.chain_id).unwrap());
		AuthorizationBuilder::new(domain, wallet)
	}

	fn scenario_intent() -> DepositIntent {
		DepositIntent {
			user: addr(0xAA),
			assets: U256::from(100u64),
			receiver: addr(0xAA),
			nonce: 3,
		}
	}

	#[test]
	fn same_intent_and_domain_produce_same_digest() {
		let builder = builder_with(domain());
		let intent = scenario_intent();
		assert_eq!(
			builder.deposit_signing_hash(&intent),
			builder.deposit_signing_hash(&intent)
		);
	}

	#[test]
	fn digest_is_bound_to_chain_and_vault() {
		let base = domain();
		let builder = builder_with(base.clone());
		let intent = scenario_intent();
		let digest = builder.deposit_signing_hash(&intent);

		let mut other_chain = base.clone();
		other_chain.chain_id = 1;
		assert_ne!(
			builder_with(other_chain).deposit_signing_hash(&intent),
			digest
		);

		let mut other_vault = base;
		other_vault.vault = addr(0x99);
		assert_ne!(
			builder_with(other_vault).deposit_signing_hash(&intent),
			digest
		);
	}

	#[test]
	fn deposit_and_withdraw_digests_differ() {
		let builder = builder_with(domain());
		let deposit = scenario_intent();
		let withdraw = WithdrawIntent {
			user: deposit.user,
			assets: deposit.assets,
			receiver: deposit.receiver,
			owner: deposit.user,
			nonce: deposit.nonce,
		};
		assert_ne!(
			builder.deposit_signing_hash(&deposit),
			builder.withdraw_signing_hash(&withdraw)
		);
	}

	#[tokio::test]
	async fn signature_recovers_to_the_signer() {
		let builder = builder_with(domain());
		let intent = scenario_intent();

		let signature = builder.create_deposit_signature(&intent).await.unwrap();
		let digest = builder.deposit_signing_hash(&intent);
		let recovered = signature.recover_address_from_prehash(&digest).unwrap();

		let wallet = LocalWallet::new(DEV_KEY, 8217).unwrap();
		assert_eq!(recovered, wallet.address().await.unwrap());
	}

	#[tokio::test]
	async fn zero_amount_never_reaches_the_wallet() {
		let builder = builder_with(domain());
		let mut intent = scenario_intent();
		intent.assets = U256::ZERO;

		let result = builder.create_deposit_signature(&intent).await;
		assert!(matches!(result, Err(SigningError::InvalidIntent(_))));
	}

	#[test]
	fn encoded_authorization_round_trips_exactly() {
		let intent = scenario_intent();
		let authorization = DepositAuthorization {
			user: intent.user,
			assets: intent.assets,
			receiver: intent.receiver,
			nonce: U256::from(intent.nonce),
		};

		let encoded = authorization.abi_encode();
		let decoded = DepositAuthorization::abi_decode(&encoded).unwrap();

		assert_eq!(decoded.user, intent.user);
		assert_eq!(decoded.assets, intent.assets);
		assert_eq!(decoded.receiver, intent.receiver);
		assert_eq!(decoded.nonce, U256::from(intent.nonce));
	}
}

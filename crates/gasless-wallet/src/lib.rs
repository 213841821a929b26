//! Wallet capability for gasless operations.
//!
//! The orchestrator never touches key material. It consumes this narrow
//! interface: a connected address, the active chain id, and a digest-signing
//! function that may suspend and may fail (a user can reject the prompt).
//! Test doubles substitute a deterministic signer through the same trait.

use alloy::primitives::{Address, Signature, B256};
use async_trait::async_trait;
use gasless_types::GaslessError;
use thiserror::Error;

pub mod implementations;

pub use implementations::local::LocalWallet;

#[derive(Debug, Error)]
pub enum WalletError {
	#[error("Wallet not connected: {0}")]
	NotConnected(String),
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

impl From<WalletError> for GaslessError {
	fn from(err: WalletError) -> Self {
		match err {
			WalletError::NotConnected(_) => GaslessError::WalletNotConnected,
			WalletError::SigningFailed(reason) => GaslessError::SigningRejected(reason),
			WalletError::InvalidKey(reason) => GaslessError::SigningRejected(reason),
		}
	}
}

/// The signing capability supplied by the user's wallet.
#[async_trait]
pub trait WalletInterface: Send + Sync {
	/// The connected account address.
	async fn address(&self) -> Result<Address, WalletError>;

	/// The chain the wallet is currently connected to.
	async fn chain_id(&self) -> Result<u64, WalletError>;

	/// Signs a 32-byte digest, typically an EIP-712 signing hash.
	async fn sign_digest(&self, digest: B256) -> Result<Signature, WalletError>;
}

//! Wallet implementations.
//!
//! Currently a single implementation backed by a local private key using the
//! Alloy signer. Suitable for the operator CLI and for tests where key
//! management simplicity is preferred.

use crate::{WalletError, WalletInterface};
use alloy::primitives::{Address, Signature, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use async_trait::async_trait;

/// Local wallet backed by an in-process private key.
pub struct LocalWallet {
	/// The underlying Alloy signer that handles cryptographic operations.
	signer: PrivateKeySigner,
	/// Chain the wallet reports as connected to.
	chain_id: u64,
}

impl LocalWallet {
	/// Creates a new LocalWallet from a hex-encoded private key.
	///
	/// The private key may carry a 0x prefix and must decode to 32 bytes.
	pub fn new(private_key_hex: &str, chain_id: u64) -> Result<Self, WalletError> {
		let key = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

		if key.len() != 64 {
			return Err(WalletError::InvalidKey(
				"private key must be 64 hex characters (32 bytes)".to_string(),
			));
		}
		if hex::decode(key).is_err() {
			return Err(WalletError::InvalidKey(
				"private key must be valid hexadecimal".to_string(),
			));
		}

		let signer = key
			.parse::<PrivateKeySigner>()
			.map_err(|e| WalletError::InvalidKey(format!("invalid private key: {}", e)))?;

		Ok(Self { signer, chain_id })
	}

	/// The signer's address, available without going through the capability.
	pub fn signer_address(&self) -> Address {
		self.signer.address()
	}
}

#[async_trait]
impl WalletInterface for LocalWallet {
	async fn address(&self) -> Result<Address, WalletError> {
		Ok(self.signer.address())
	}

	async fn chain_id(&self) -> Result<u64, WalletError> {
		Ok(self.chain_id)
	}

	async fn sign_digest(&self, digest: B256) -> Result<Signature, WalletError> {
		self.signer
			.sign_hash_sync(&digest)
			.map_err(|e| WalletError::SigningFailed(format!("failed to sign digest: {}", e)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// Well-known anvil development key, account 0.
	const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

	#[test]
	fn parses_key_with_and_without_prefix() {
		assert!(LocalWallet::new(DEV_KEY, 1).is_ok());
		assert!(LocalWallet::new(DEV_KEY.trim_start_matches("0x"), 1).is_ok());
	}

	#[test]
	fn rejects_malformed_keys() {
		assert!(matches!(
			LocalWallet::new("0x1234", 1),
			Err(WalletError::InvalidKey(_))
		));
		assert!(matches!(
			LocalWallet::new(&"zz".repeat(32), 1),
			Err(WalletError::InvalidKey(_))
		));
	}

	#[tokio::test]
	async fn reports_expected_address_and_chain() {
		let wallet = LocalWallet::new(DEV_KEY, 8217).unwrap();
		let address = wallet.address().await.unwrap();
		assert_eq!(address, DEV_ADDRESS.parse::<Address>().unwrap());
		assert_eq!(wallet.chain_id().await.unwrap(), 8217);
	}

	#[tokio::test]
	async fn signature_recovers_to_wallet_address() {
		let wallet = LocalWallet::new(DEV_KEY, 1).unwrap();
		let digest = B256::repeat_byte(0x11);

		let signature = wallet.sign_digest(digest).await.unwrap();
		let recovered = signature.recover_address_from_prehash(&digest).unwrap();
		assert_eq!(recovered, wallet.address().await.unwrap());
	}
}

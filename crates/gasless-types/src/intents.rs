//! Authorization intents and signed authorizations.
//!
//! An intent is the semantic payload a user authorizes off-chain: who moves
//! which amount to whom, under which nonce. A signed authorization pairs an
//! intent with its signature and is consumed by exactly one relay submission.

use alloy::primitives::{Address, Signature, U256};
use serde::{Deserialize, Serialize};

use crate::errors::GaslessError;

/// Intent to deposit assets into the vault on the user's behalf.
///
/// Field layout matches the on-chain verifier's expected typed-data struct:
/// `{user, assets, receiver, nonce}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositIntent {
	/// Address whose assets are deposited and whose nonce is consumed.
	pub user: Address,
	/// Asset amount in the asset's smallest unit. Must be positive.
	pub assets: U256,
	/// Address credited with the resulting vault shares.
	pub receiver: Address,
	/// The user's next expected meta-transaction nonce at signing time.
	pub nonce: u64,
}

/// Intent to withdraw assets from the vault on the user's behalf.
///
/// Field layout matches the on-chain verifier's expected typed-data struct:
/// `{user, assets, receiver, owner, nonce}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawIntent {
	/// Address initiating the withdrawal and whose nonce is consumed.
	pub user: Address,
	/// Asset amount in the asset's smallest unit. Must be positive.
	pub assets: U256,
	/// Address that receives the withdrawn assets.
	pub receiver: Address,
	/// Address whose vault shares are burned.
	pub owner: Address,
	/// The user's next expected meta-transaction nonce at signing time.
	pub nonce: u64,
}

impl DepositIntent {
	/// Checks the intent invariants that hold before any signature exists.
	pub fn validate(&self) -> Result<(), GaslessError> {
		if self.assets.is_zero() {
			return Err(GaslessError::InvalidIntent(
				"deposit amount must be positive".to_string(),
			));
		}
		Ok(())
	}
}

impl WithdrawIntent {
	/// Checks the intent invariants that hold before any signature exists.
	pub fn validate(&self) -> Result<(), GaslessError> {
		if self.assets.is_zero() {
			return Err(GaslessError::InvalidIntent(
				"withdraw amount must be positive".to_string(),
			));
		}
		Ok(())
	}
}

/// A deposit intent together with the user's signature over it.
///
/// Immutable once created; consumed by exactly one relay submission and
/// discarded after the relay's decision.
#[derive(Debug, Clone)]
pub struct SignedDeposit {
	pub intent: DepositIntent,
	pub signature: Signature,
}

/// A withdraw intent together with the user's signature over it.
#[derive(Debug, Clone)]
pub struct SignedWithdraw {
	pub intent: WithdrawIntent,
	pub signature: Signature,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addr(byte: u8) -> Address {
		Address::from([byte; 20])
	}

	#[test]
	fn deposit_intent_rejects_zero_amount() {
		let intent = DepositIntent {
			user: addr(1),
			assets: U256::ZERO,
			receiver: addr(1),
			nonce: 0,
		};
		assert!(matches!(
			intent.validate(),
			Err(GaslessError::InvalidIntent(_))
		));
	}

	#[test]
	fn withdraw_intent_rejects_zero_amount() {
		let intent = WithdrawIntent {
			user: addr(1),
			assets: U256::ZERO,
			receiver: addr(2),
			owner: addr(1),
			nonce: 3,
		};
		assert!(matches!(
			intent.validate(),
			Err(GaslessError::InvalidIntent(_))
		));
	}

	#[test]
	fn positive_amount_is_valid() {
		let intent = DepositIntent {
			user: addr(1),
			assets: U256::from(100u64),
			receiver: addr(1),
			nonce: 0,
		};
		assert!(intent.validate().is_ok());
	}

	#[test]
	fn intent_serde_round_trip_preserves_amount() {
		let intent = WithdrawIntent {
			user: addr(0xAA),
			assets: U256::from(u128::MAX),
			receiver: addr(0xBB),
			owner: addr(0xAA),
			nonce: 42,
		};
		let json = serde_json::to_string(&intent).unwrap();
		let decoded: WithdrawIntent = serde_json::from_str(&json).unwrap();
		assert_eq!(decoded, intent);
	}
}

//! Wire types for the relay's HTTP surface.

use alloy::primitives::{hex, Address, Signature, TxHash, U256};
use gasless_types::{SignedDeposit, SignedWithdraw};
use serde::{Deserialize, Serialize};

fn signature_hex(signature: &Signature) -> String {
	hex::encode_prefixed(signature.as_bytes())
}

/// Request body for `POST {endpoint}/deposit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
	pub user: Address,
	pub assets: U256,
	pub receiver: Address,
	pub nonce: u64,
	/// 65-byte r||s||v signature, 0x-prefixed hex.
	pub signature: String,
}

/// Request body for `POST {endpoint}/withdraw`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
	pub user: Address,
	pub assets: U256,
	pub receiver: Address,
	pub owner: Address,
	pub nonce: u64,
	/// 65-byte r||s||v signature, 0x-prefixed hex.
	pub signature: String,
}

/// The relay's decision on a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
	pub success: bool,
	#[serde(default)]
	pub transaction_hash: Option<TxHash>,
	#[serde(default)]
	pub error: Option<String>,
}

impl From<&SignedDeposit> for DepositRequest {
	fn from(auth: &SignedDeposit) -> Self {
		Self {
			user: auth.intent.user,
			assets: auth.intent.assets,
			receiver: auth.intent.receiver,
			nonce: auth.intent.nonce,
			signature: signature_hex(&auth.signature),
		}
	}
}

impl From<&SignedWithdraw> for WithdrawRequest {
	fn from(auth: &SignedWithdraw) -> Self {
		Self {
			user: auth.intent.user,
			assets: auth.intent.assets,
			receiver: auth.intent.receiver,
			owner: auth.intent.owner,
			nonce: auth.intent.nonce,
			signature: signature_hex(&auth.signature),
		}
	}
}

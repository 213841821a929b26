//! Terminal operation results.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};

use crate::errors::GaslessError;

/// Outcome of one orchestrated gasless operation.
///
/// Exactly one of `transaction_hash` / `error` is populated on a terminal
/// result; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
	pub success: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub transaction_hash: Option<TxHash>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl OperationResult {
	/// A successful result carrying the relayed transaction hash.
	pub fn succeeded(transaction_hash: TxHash) -> Self {
		Self {
			success: true,
			transaction_hash: Some(transaction_hash),
			error: None,
		}
	}

	/// A failed result carrying the user-facing failure report.
	pub fn failed(error: &GaslessError) -> Self {
		Self {
			success: false,
			transaction_hash: None,
			error: Some(error.user_message()),
		}
	}
}

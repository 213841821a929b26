//! Relay submission for gasless vault operations.
//!
//! The relay validates a signed authorization against the vault's signing
//! domain and the current on-chain nonce, executes the operation on the
//! user's behalf, and reports a transaction hash or a classified rejection.
//! A relay client submits exactly once per call and never retries; retry
//! policy lives with the orchestrator, which knows whether an earlier
//! submission could already have been observed on-chain.

use alloy::primitives::TxHash;
use async_trait::async_trait;
use gasless_types::{GaslessError, SignedDeposit, SignedWithdraw};
use std::time::Duration;
use thiserror::Error;

pub mod implementations;
pub mod types;

pub use implementations::http::HttpRelayClient;

#[derive(Debug, Error)]
pub enum RelayError {
	#[error("Relay rejected the signature: {0}")]
	InvalidSignature(String),
	#[error("Stale or already-used nonce: {0}")]
	StaleNonce(String),
	#[error("Insufficient balance or allowance: {0}")]
	InsufficientFunds(String),
	#[error("Relay unavailable: {0}")]
	Unavailable(String),
	#[error("Relay did not decide within {0:?}")]
	Timeout(Duration),
	#[error("Malformed relay response: {0}")]
	InvalidResponse(String),
}

impl From<RelayError> for GaslessError {
	fn from(err: RelayError) -> Self {
		match err {
			RelayError::InvalidSignature(reason) => GaslessError::InvalidSignature(reason),
			RelayError::StaleNonce(reason) => GaslessError::StaleOrUsedNonce(reason),
			RelayError::InsufficientFunds(reason) => GaslessError::InsufficientFunds(reason),
			RelayError::Unavailable(reason) => GaslessError::RelayUnavailable(reason),
			RelayError::Timeout(after) => GaslessError::RelayTimeout(after),
			// The request reached the relay and was not rejected, so the
			// transaction may still land; this is never safe to report as
			// "nothing happened".
			RelayError::InvalidResponse(reason) => GaslessError::RelayOutcomeUnknown(reason),
		}
	}
}

/// Classifies a relay rejection string into an error variant.
///
/// The relay reports rejections as free-form reasons; the known failure
/// classes are matched by keyword, anything else is treated as the relay
/// refusing service.
pub fn classify_rejection(reason: &str) -> RelayError {
	let lowered = reason.to_lowercase();
	if lowered.contains("signature") {
		RelayError::InvalidSignature(reason.to_string())
	} else if lowered.contains("nonce") {
		RelayError::StaleNonce(reason.to_string())
	} else if lowered.contains("insufficient")
		|| lowered.contains("balance")
		|| lowered.contains("allowance")
	{
		RelayError::InsufficientFunds(reason.to_string())
	} else {
		RelayError::Unavailable(reason.to_string())
	}
}

/// Submission interface to the relay/execution backend.
#[async_trait]
pub trait RelayInterface: Send + Sync {
	/// Submits a signed deposit authorization. One call, one outcome.
	async fn execute_gasless_deposit(&self, auth: &SignedDeposit) -> Result<TxHash, RelayError>;

	/// Submits a signed withdraw authorization. One call, one outcome.
	async fn execute_gasless_withdraw(&self, auth: &SignedWithdraw) -> Result<TxHash, RelayError>;
}

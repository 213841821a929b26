//! Nonce tracking for gasless operations.
//!
//! The meta-transaction nonce is owned by the relay/on-chain authority; this
//! crate only reads it. A returned nonce of 0 means the account has no prior
//! meta-transactions. Query failures are reported through the error channel,
//! never folded into the nonce value, so the orchestrator can tell "first
//! nonce" apart from "nonce unknown" and refuse to sign in the latter case.

use alloy::primitives::Address;
use async_trait::async_trait;
use gasless_types::GaslessError;
use thiserror::Error;

pub mod implementations;

pub use implementations::http::HttpNonceSource;

#[derive(Debug, Error)]
pub enum NonceError {
	#[error("Nonce query failed: {0}")]
	Query(String),
	#[error("Malformed nonce response: {0}")]
	InvalidResponse(String),
}

impl From<NonceError> for GaslessError {
	fn from(err: NonceError) -> Self {
		GaslessError::NonceFetchFailed(err.to_string())
	}
}

/// Read-only access to the authority-owned meta-transaction nonce sequence.
#[async_trait]
pub trait NonceSource: Send + Sync {
	/// Returns the smallest unused nonce for `user` at the time of the query.
	async fn get_user_nonce(&self, user: Address) -> Result<u64, NonceError>;
}

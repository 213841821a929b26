//! Error taxonomy for gasless operations.

use alloy::primitives::Address;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GaslessError>;

/// Terminal failure conditions for a gasless operation.
///
/// Every failed operation maps to exactly one of these variants. Variants up
/// to `InvalidIntent` arise before anything is submitted to the relay; the
/// rest classify the relay's decision or the lack of one.
#[derive(Error, Debug)]
pub enum GaslessError {
	#[error("Wallet is not connected")]
	WalletNotConnected,

	#[error("Nonce fetch failed: {0}")]
	NonceFetchFailed(String),

	#[error("Signing rejected: {0}")]
	SigningRejected(String),

	#[error("Invalid intent: {0}")]
	InvalidIntent(String),

	#[error("Relay rejected the signature: {0}")]
	InvalidSignature(String),

	#[error("Stale or already-used nonce: {0}")]
	StaleOrUsedNonce(String),

	#[error("Insufficient balance or allowance: {0}")]
	InsufficientFunds(String),

	#[error("Relay unavailable: {0}")]
	RelayUnavailable(String),

	#[error("Relay did not decide within {0:?}")]
	RelayTimeout(Duration),

	#[error("Relay accepted the request but its answer was unreadable: {0}")]
	RelayOutcomeUnknown(String),

	#[error("A gasless operation is already in flight for {0}")]
	ConcurrentOperationInProgress(Address),
}

/// User-visible consequence category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureGuidance {
	/// Nothing was submitted; retrying is safe.
	NothingHappened,
	/// The relay received and rejected the request; no funds moved.
	RelayRejected,
	/// The request was submitted but the outcome is unknown; the
	/// transaction may still land.
	OutcomeUnknown,
}

impl GaslessError {
	/// Classifies this failure for user-facing messaging.
	///
	/// `RelayUnavailable` means the submission never reached the relay, so it
	/// lands in the safe-to-retry bucket. `RelayTimeout` and
	/// `RelayOutcomeUnknown` do not: the relay accepted the request and may
	/// still execute it.
	pub fn guidance(&self) -> FailureGuidance {
		match self {
			GaslessError::WalletNotConnected
			| GaslessError::NonceFetchFailed(_)
			| GaslessError::SigningRejected(_)
			| GaslessError::InvalidIntent(_)
			| GaslessError::RelayUnavailable(_)
			| GaslessError::ConcurrentOperationInProgress(_) => FailureGuidance::NothingHappened,
			GaslessError::InvalidSignature(_)
			| GaslessError::StaleOrUsedNonce(_)
			| GaslessError::InsufficientFunds(_) => FailureGuidance::RelayRejected,
			GaslessError::RelayTimeout(_) | GaslessError::RelayOutcomeUnknown(_) => {
				FailureGuidance::OutcomeUnknown
			}
		}
	}

	/// Whether a caller-initiated retry is eligible for this failure.
	///
	/// A retry must restart from nonce fetch; signed authorizations are never
	/// reused across invocations.
	pub fn is_retryable(&self) -> bool {
		matches!(
			self,
			GaslessError::RelayUnavailable(_)
				| GaslessError::RelayTimeout(_)
				| GaslessError::RelayOutcomeUnknown(_)
		)
	}

	/// Human-readable failure report including what the user should do next.
	pub fn user_message(&self) -> String {
		let advice = match self.guidance() {
			FailureGuidance::NothingHappened => {
				"No transaction was submitted. It is safe to try again."
			}
			FailureGuidance::RelayRejected => {
				"The relay rejected the request. No funds were moved."
			}
			FailureGuidance::OutcomeUnknown => {
				"The transaction may still be executed. Check your transaction history before retrying."
			}
		};
		format!("{}. {}", self, advice)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn timeout_is_distinct_from_rejection() {
		let timeout = GaslessError::RelayTimeout(Duration::from_secs(30));
		let rejected = GaslessError::InsufficientFunds("balance too low".to_string());

		assert_eq!(timeout.guidance(), FailureGuidance::OutcomeUnknown);
		assert_eq!(rejected.guidance(), FailureGuidance::RelayRejected);

		// An on-chain rejection must not suggest the transaction could still land.
		assert!(!rejected.user_message().contains("may still be executed"));
		assert!(timeout.user_message().contains("may still be executed"));
	}

	#[test]
	fn pre_relay_failures_are_safe_to_retry_from_scratch() {
		let err = GaslessError::NonceFetchFailed("rpc timeout".to_string());
		assert_eq!(err.guidance(), FailureGuidance::NothingHappened);
		assert!(err.user_message().contains("safe to try again"));
	}

	#[test]
	fn only_relay_transport_failures_are_retryable() {
		assert!(GaslessError::RelayUnavailable("connect refused".into()).is_retryable());
		assert!(GaslessError::RelayTimeout(Duration::from_secs(10)).is_retryable());
		assert!(GaslessError::RelayOutcomeUnknown("no hash in response".into()).is_retryable());
		assert!(!GaslessError::SigningRejected("user cancelled".into()).is_retryable());
		assert!(!GaslessError::StaleOrUsedNonce("nonce 3 used".into()).is_retryable());
	}

	#[test]
	fn unreadable_acceptance_never_claims_nothing_happened() {
		// The relay accepted the request; an unreadable answer must not be
		// reported as if the submission never happened.
		let err = GaslessError::RelayOutcomeUnknown("no transaction hash".into());
		assert_eq!(err.guidance(), FailureGuidance::OutcomeUnknown);
		assert!(err.user_message().contains("may still be executed"));
		assert!(!err.user_message().contains("No transaction was submitted"));
	}
}

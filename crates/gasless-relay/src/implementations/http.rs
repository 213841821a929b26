//! HTTP relay client.
//!
//! Submits signed authorizations to the relay's HTTP surface and maps the
//! decision into the relay error taxonomy. The wait for a decision is
//! bounded; a timeout is reported as its own condition because the relay may
//! have accepted the request and the transaction can still land.

use crate::types::{DepositRequest, RelayResponse, WithdrawRequest};
use crate::{classify_rejection, RelayError, RelayInterface};
use alloy::primitives::TxHash;
use async_trait::async_trait;
use gasless_types::{SignedDeposit, SignedWithdraw};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct HttpRelayClient {
	client: reqwest::Client,
	endpoint: String,
	timeout: Duration,
}

impl HttpRelayClient {
	pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
		let client = reqwest::Client::builder()
			.build()
			.map_err(|e| RelayError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			endpoint: endpoint.into(),
			timeout,
		})
	}

	async fn submit<R: Serialize>(&self, path: &str, request: &R) -> Result<TxHash, RelayError> {
		let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), path);
		debug!("Submitting gasless {} request to {}", path, url);

		let send = async {
			let response = self
				.client
				.post(&url)
				.json(request)
				.send()
				.await
				.map_err(|e| {
					if e.is_connect() {
						RelayError::Unavailable(format!("could not reach relay: {}", e))
					} else {
						RelayError::Unavailable(format!("relay request failed: {}", e))
					}
				})?;

			let status = response.status();
			if status.is_server_error() {
				return Err(RelayError::Unavailable(format!(
					"relay returned status {}",
					status
				)));
			}

			response
				.json::<RelayResponse>()
				.await
				.map_err(|e| RelayError::InvalidResponse(e.to_string()))
		};

		let body = match tokio::time::timeout(self.timeout, send).await {
			Ok(result) => result?,
			Err(_) => {
				warn!("Relay decision timed out after {:?}", self.timeout);
				return Err(RelayError::Timeout(self.timeout));
			}
		};

		if body.success {
			let hash = body.transaction_hash.ok_or_else(|| {
				RelayError::InvalidResponse(
					"relay accepted but returned no transaction hash".to_string(),
				)
			})?;
			info!("Relay accepted gasless {}: {}", path, hash);
			Ok(hash)
		} else {
			let reason = body
				.error
				.unwrap_or_else(|| "relay rejected without a reason".to_string());
			warn!("Relay rejected gasless {}: {}", path, reason);
			Err(classify_rejection(&reason))
		}
	}
}

#[async_trait]
impl RelayInterface for HttpRelayClient {
	async fn execute_gasless_deposit(&self, auth: &SignedDeposit) -> Result<TxHash, RelayError> {
		self.submit("deposit", &DepositRequest::from(auth)).await
	}

	async fn execute_gasless_withdraw(&self, auth: &SignedWithdraw) -> Result<TxHash, RelayError> {
		self.submit("withdraw", &WithdrawRequest::from(auth)).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{Address, Signature, U256};
	use gasless_types::DepositIntent;

	fn signed_deposit() -> SignedDeposit {
		SignedDeposit {
			intent: DepositIntent {
				user: Address::from([0xAA; 20]),
				assets: U256::from(100u64),
				receiver: Address::from([0xAA; 20]),
				nonce: 3,
			},
			signature: Signature::new(U256::from(1u64), U256::from(2u64), false),
		}
	}

	#[tokio::test]
	async fn unreachable_relay_reports_unavailable() {
		let client =
			HttpRelayClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
		let result = client.execute_gasless_deposit(&signed_deposit()).await;
		assert!(matches!(result, Err(RelayError::Unavailable(_))));
	}

	/// Serves exactly one HTTP request with the given JSON body, then exits.
	async fn one_shot_relay(body: &'static str) -> std::net::SocketAddr {
		use tokio::io::{AsyncReadExt, AsyncWriteExt};

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move {
			let (mut socket, _) = listener.accept().await.unwrap();
			let mut buf = [0u8; 1024];
			let _ = socket.read(&mut buf).await;
			let response = format!(
				"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{}",
				body.len(),
				body
			);
			let _ = socket.write_all(response.as_bytes()).await;
		});
		addr
	}

	#[tokio::test]
	async fn acceptance_without_hash_reports_outcome_unknown() {
		let addr = one_shot_relay(r#"{"success": true}"#).await;
		let client =
			HttpRelayClient::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();

		let error = match client.execute_gasless_deposit(&signed_deposit()).await {
			Err(e) => e,
			Ok(hash) => panic!("expected an error, got {}", hash),
		};
		assert!(matches!(error, RelayError::InvalidResponse(_)));

		// The relay accepted; the user must not be told nothing was submitted.
		let message = gasless_types::GaslessError::from(error).user_message();
		assert!(message.contains("may still be executed"));
		assert!(!message.contains("No transaction was submitted"));
	}

	#[tokio::test]
	async fn unparseable_relay_answer_reports_outcome_unknown() {
		let addr = one_shot_relay("not json").await;
		let client =
			HttpRelayClient::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();

		let error = match client.execute_gasless_deposit(&signed_deposit()).await {
			Err(e) => e,
			Ok(hash) => panic!("expected an error, got {}", hash),
		};
		assert!(matches!(error, RelayError::InvalidResponse(_)));
		assert!(gasless_types::GaslessError::from(error)
			.user_message()
			.contains("Check your transaction history"));
	}
}

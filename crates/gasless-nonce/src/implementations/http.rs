//! HTTP nonce source backed by the relay's nonce query endpoint.

use crate::{NonceError, NonceSource};
use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct NonceResponse {
	nonce: u64,
}

/// Queries `GET {endpoint}/nonce/{address}` for a user's current nonce.
pub struct HttpNonceSource {
	client: reqwest::Client,
	endpoint: String,
}

impl HttpNonceSource {
	pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, NonceError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| NonceError::Query(format!("failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			endpoint: endpoint.into(),
		})
	}
}

#[async_trait]
impl NonceSource for HttpNonceSource {
	async fn get_user_nonce(&self, user: Address) -> Result<u64, NonceError> {
		let url = format!("{}/nonce/{}", self.endpoint.trim_end_matches('/'), user);
		debug!("Fetching meta-transaction nonce from {}", url);

		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| NonceError::Query(format!("nonce request failed: {}", e)))?;

		if !response.status().is_success() {
			return Err(NonceError::Query(format!(
				"nonce endpoint returned status {}",
				response.status()
			)));
		}

		let body: NonceResponse = response
			.json()
			.await
			.map_err(|e| NonceError::InvalidResponse(e.to_string()))?;

		debug!("Nonce for {} is {}", user, body.nonce);
		Ok(body.nonce)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_nonce_response() {
		let body: NonceResponse = serde_json::from_str(r#"{"nonce": 7}"#).unwrap();
		assert_eq!(body.nonce, 7);
	}

	#[test]
	fn zero_nonce_is_a_valid_response() {
		// 0 is a legitimate first nonce and must parse cleanly, not be
		// conflated with a failed query.
		let body: NonceResponse = serde_json::from_str(r#"{"nonce": 0}"#).unwrap();
		assert_eq!(body.nonce, 0);
	}

	#[test]
	fn rejects_malformed_response() {
		assert!(serde_json::from_str::<NonceResponse>(r#"{"nonce": "soon"}"#).is_err());
		assert!(serde_json::from_str::<NonceResponse>(r#"{}"#).is_err());
	}

	#[tokio::test]
	async fn unreachable_endpoint_reports_query_error() {
		// Port 9 (discard) with a tiny timeout; nothing is listening there.
		let source =
			HttpNonceSource::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
		let result = source.get_user_nonce(Address::ZERO).await;
		assert!(matches!(result, Err(NonceError::Query(_))));
	}
}

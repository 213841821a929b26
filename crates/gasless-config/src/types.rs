use alloy::primitives::Address;
use gasless_signing::SigningDomain;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GaslessConfig {
	pub vault: VaultConfig,
	pub relay: RelayConfig,
	#[serde(default)]
	pub service: ServiceConfig,
}

/// The vault deployment a signature is bound to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VaultConfig {
	/// Vault contract address, 0x-prefixed.
	pub address: String,
	/// Chain the vault is deployed on.
	pub chain_id: u64,
	/// Protocol name advertised in the EIP-712 domain.
	#[serde(default = "default_domain_name")]
	pub name: String,
	/// Protocol version advertised in the EIP-712 domain.
	#[serde(default = "default_domain_version")]
	pub version: String,
}

/// Relay backend endpoints and timing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
	/// Base URL of the relay's HTTP surface.
	pub endpoint: String,
	/// Bound on the wait for a relay decision, in seconds.
	#[serde(default = "default_relay_timeout_secs")]
	pub timeout_secs: u64,
}

/// Operational toggles owned by whatever composes the orchestrator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// When set, the service refuses new gasless operations.
	#[serde(default)]
	pub maintenance: bool,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

impl Default for ServiceConfig {
	fn default() -> Self {
		Self {
			maintenance: false,
			log_level: default_log_level(),
		}
	}
}

fn default_domain_name() -> String {
	"GaslessVault".to_string()
}

fn default_domain_version() -> String {
	"1".to_string()
}

fn default_relay_timeout_secs() -> u64 {
	30
}

fn default_log_level() -> String {
	"info".to_string()
}

impl GaslessConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.vault_address()?;

		if self.vault.chain_id == 0 {
			return Err(ConfigError::ValidationError(
				"vault.chain_id must be nonzero".to_string(),
			));
		}
		if !self.relay.endpoint.starts_with("http://") && !self.relay.endpoint.starts_with("https://")
		{
			return Err(ConfigError::ValidationError(
				"relay.endpoint must be an http(s) URL".to_string(),
			));
		}
		if self.relay.timeout_secs == 0 || self.relay.timeout_secs > 300 {
			return Err(ConfigError::ValidationError(
				"relay.timeout_secs must be between 1 and 300".to_string(),
			));
		}
		Ok(())
	}

	/// The parsed vault contract address.
	pub fn vault_address(&self) -> Result<Address, ConfigError> {
		self.vault.address.parse::<Address>().map_err(|e| {
			ConfigError::ValidationError(format!("vault.address is not a valid address: {}", e))
		})
	}

	/// The signing domain this deployment binds signatures to.
	pub fn signing_domain(&self) -> Result<SigningDomain, ConfigError> {
		Ok(SigningDomain {
			name: self.vault.name.clone(),
			version: self.vault.version.clone(),
			vault: self.vault_address()?,
			chain_id: self.vault.chain_id,
		})
	}
}

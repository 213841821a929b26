//! Configuration loader with environment variable substitution.

use std::env;
use std::path::Path;
use tracing::debug;

use crate::types::GaslessConfig;
use crate::ConfigError;

/// Loads and validates a [`GaslessConfig`] from a TOML file.
///
/// `${VAR}` patterns in the file are replaced with the corresponding
/// environment variable before parsing, and a `GASLESS_`-prefixed set of
/// variables can override selected settings afterwards.
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "GASLESS_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<GaslessConfig, ConfigError> {
		let mut config = if let Some(file_path) = &self.file_path {
			self.load_from_file(file_path).await?
		} else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		self.apply_env_overrides(&mut config)?;
		config.validate()?;

		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<GaslessConfig, ConfigError> {
		debug!("Loading configuration from {}", file_path);
		let content = tokio::fs::read_to_string(file_path).await?;

		let substituted_content = self.substitute_env_vars(&content)?;

		let config: GaslessConfig = toml::from_str(&substituted_content)
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		Ok(config)
	}

	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		// Find and replace ${VAR_NAME} patterns
		let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut GaslessConfig) -> Result<(), ConfigError> {
		if let Ok(log_level) = env::var(format!("{}LOG_LEVEL", self.env_prefix)) {
			config.service.log_level = log_level;
		}

		if let Ok(endpoint) = env::var(format!("{}RELAY_ENDPOINT", self.env_prefix)) {
			config.relay.endpoint = endpoint;
		}

		if let Ok(timeout) = env::var(format!("{}RELAY_TIMEOUT_SECS", self.env_prefix)) {
			config.relay.timeout_secs = timeout.parse().map_err(|e| {
				ConfigError::ValidationError(format!("Invalid relay timeout: {}", e))
			})?;
		}

		Ok(())
	}
}

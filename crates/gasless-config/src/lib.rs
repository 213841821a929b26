//! Configuration for the gasless operation service.
//!
//! The signing domain (vault address, chain id, protocol name/version) and
//! the relay endpoints are deployment parameters. They are loaded from a
//! TOML file with `${VAR}` environment substitution and validated before any
//! component is constructed; nothing in the signing path is hard-coded.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{GaslessConfig, RelayConfig, ServiceConfig, VaultConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

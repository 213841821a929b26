use alloy::primitives::{Address, U256};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gasless_config::{ConfigLoader, GaslessConfig};
use gasless_core::{GaslessOrchestrator, OrchestratorBuilder};
use gasless_nonce::{HttpNonceSource, NonceSource};
use gasless_relay::HttpRelayClient;
use gasless_wallet::{LocalWallet, WalletInterface};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gasless")]
#[command(about = "Gasless vault operations client", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[arg(short, long, value_name = "FILE", default_value = "config/local.toml")]
	config: PathBuf,

	#[arg(long, env = "GASLESS_LOG_LEVEL", default_value = "info")]
	log_level: String,

	/// Hex-encoded private key for the local wallet
	#[arg(long, env = "GASLESS_PRIVATE_KEY", hide_env_values = true)]
	private_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Deposit assets into the vault without paying gas
	Deposit {
		/// Amount in the asset's smallest unit
		#[arg(long)]
		amount: String,
		/// Receiver of the vault shares; defaults to the wallet address
		#[arg(long)]
		receiver: Option<Address>,
	},
	/// Withdraw assets from the vault without paying gas
	Withdraw {
		/// Amount in the asset's smallest unit
		#[arg(long)]
		amount: String,
		/// Receiver of the withdrawn assets; defaults to the wallet address
		#[arg(long)]
		receiver: Option<Address>,
		/// Owner of the burned shares; defaults to the wallet address
		#[arg(long)]
		owner: Option<Address>,
	},
	/// Show the current meta-transaction nonce for an address
	Nonce {
		/// Address to query; defaults to the wallet address
		#[arg(long)]
		user: Option<Address>,
	},
	/// Validate the configuration file
	Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.await
		.context("Failed to load configuration")?;

	match cli.command {
		Commands::Deposit { amount, receiver } => {
			ensure_not_in_maintenance(&config)?;
			let assets = parse_amount(&amount)?;
			let (orchestrator, user) = build_orchestrator(&config, cli.private_key.as_deref())?;

			let receiver = receiver.unwrap_or(user);
			info!("Submitting gasless deposit of {} for {}", assets, user);
			report(orchestrator.execute_gasless_deposit(assets, receiver).await)
		}
		Commands::Withdraw {
			amount,
			receiver,
			owner,
		} => {
			ensure_not_in_maintenance(&config)?;
			let assets = parse_amount(&amount)?;
			let (orchestrator, user) = build_orchestrator(&config, cli.private_key.as_deref())?;

			let receiver = receiver.unwrap_or(user);
			let owner = owner.unwrap_or(user);
			info!("Submitting gasless withdrawal of {} for {}", assets, user);
			report(
				orchestrator
					.execute_gasless_withdraw(assets, receiver, owner)
					.await,
			)
		}
		Commands::Nonce { user } => {
			let user = match user {
				Some(user) => user,
				None => {
					let wallet = build_wallet(&config, cli.private_key.as_deref())?;
					wallet
						.address()
						.await
						.context("Wallet did not report an address")?
				}
			};

			let nonces = build_nonce_source(&config)?;
			let nonce = nonces
				.get_user_nonce(user)
				.await
				.context("Failed to fetch nonce")?;
			println!("{}", nonce);
			Ok(())
		}
		Commands::Validate => {
			info!("Configuration is valid");
			info!("Vault: {} on chain {}", config.vault.address, config.vault.chain_id);
			info!("Relay endpoint: {}", config.relay.endpoint);
			if config.service.maintenance {
				info!("Service is in maintenance mode");
			}
			Ok(())
		}
	}
}

fn parse_amount(amount: &str) -> Result<U256> {
	let assets = amount
		.parse::<U256>()
		.with_context(|| format!("Invalid amount: {}", amount))?;
	if assets.is_zero() {
		bail!("Amount must be positive");
	}
	Ok(assets)
}

fn ensure_not_in_maintenance(config: &GaslessConfig) -> Result<()> {
	if config.service.maintenance {
		bail!("Service is in maintenance mode; gasless operations are disabled");
	}
	Ok(())
}

fn build_wallet(config: &GaslessConfig, private_key: Option<&str>) -> Result<Arc<LocalWallet>> {
	let key = private_key.context("No private key supplied (set GASLESS_PRIVATE_KEY)")?;
	let wallet =
		LocalWallet::new(key, config.vault.chain_id).context("Failed to create wallet")?;
	Ok(Arc::new(wallet))
}

fn build_nonce_source(config: &GaslessConfig) -> Result<Arc<HttpNonceSource>> {
	let timeout = Duration::from_secs(config.relay.timeout_secs);
	let nonces = HttpNonceSource::new(config.relay.endpoint.clone(), timeout)
		.context("Failed to create nonce source")?;
	Ok(Arc::new(nonces))
}

fn build_orchestrator(
	config: &GaslessConfig,
	private_key: Option<&str>,
) -> Result<(Arc<GaslessOrchestrator>, Address)> {
	let wallet = build_wallet(config, private_key)?;
	let user = wallet.signer_address();

	let timeout = Duration::from_secs(config.relay.timeout_secs);
	let relay = HttpRelayClient::new(config.relay.endpoint.clone(), timeout)
		.context("Failed to create relay client")?;

	let orchestrator = OrchestratorBuilder::new()
		.with_wallet(wallet)
		.with_nonce_source(build_nonce_source(config)?)
		.with_relay(Arc::new(relay))
		.with_signing_domain(config.signing_domain()?)
		.build()
		.context("Failed to build orchestrator")?;

	Ok((Arc::new(orchestrator), user))
}

fn report(result: gasless_types::OperationResult) -> Result<()> {
	match result.transaction_hash {
		Some(hash) => {
			println!("{}", hash);
			Ok(())
		}
		None => bail!(
			"{}",
			result
				.error
				.unwrap_or_else(|| "operation failed without a reason".to_string())
		),
	}
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}

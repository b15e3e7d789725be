use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keyrotate_cli::{load_body, load_key, load_signatures, render_key};
use keyrotate_core::{
    cancellation_pair, has_signature_match, ClientConfig, ConfigGate, KeyRotator, RotationParams,
    RotationSettings,
};
use keyrotate_sync::{http_client, HashpoolClient, MirrorRestClient};
use keyrotate_types::AccountId;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rotate the keys of a ledger account", long_about = None)]
struct Cli {
    /// Path to the client configuration file
    #[arg(short, long, default_value = "keyrotate.toml")]
    config: PathBuf,

    /// Override the hashpool endpoint from the configuration file
    #[arg(long)]
    hashpool: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the network the hashpool fronts
    Info,

    /// Show the key structure currently endorsing an account
    Account {
        /// Account id, e.g. 0.0.1234
        account: String,
    },

    /// Build an unsigned key rotation transaction
    Build {
        #[arg(short, long)]
        account: String,

        /// JSON file describing the new key structure
        #[arg(short, long)]
        new_key: PathBuf,

        /// Seconds until the transaction becomes valid
        #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
        delay: i64,

        /// Write the hex body bytes here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Check collected signatures against the current and new keys
    Check {
        #[arg(short, long)]
        account: String,

        #[arg(short, long)]
        new_key: PathBuf,

        /// JSON file of collected signatures
        #[arg(short, long)]
        signatures: PathBuf,
    },

    /// Submit a signed rotation and wait for it to reach the mirror
    Submit {
        #[arg(short, long)]
        account: String,

        #[arg(short, long)]
        new_key: PathBuf,

        /// Hex file with the body bytes produced by `build`
        #[arg(short, long)]
        body: PathBuf,

        #[arg(short, long)]
        signatures: PathBuf,

        /// Submit without checking signatures against the current key
        #[arg(long)]
        skip_check: bool,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(endpoint) = &cli.hashpool {
        config.network.hashpool_endpoint = endpoint.clone();
    }
    init_tracing(&config.logging.level);

    let http = http_client(Duration::from_secs(config.network.request_timeout_seconds))
        .context("Failed to build the HTTP client")?;
    let hashpool = Arc::new(HashpoolClient::new(
        http.clone(),
        &config.network.hashpool_endpoint,
    ));
    let gate = ConfigGate::new();
    let network = gate
        .ensure(hashpool.as_ref(), hashpool.base_url())
        .await
        .context("Failed to load network configuration")?;
    let mirror = Arc::new(MirrorRestClient::new(http, &network.mirror_endpoint));

    let rotator = KeyRotator::new(network.clone(), hashpool, mirror)
        .with_settings(RotationSettings::from(&config));

    match &cli.command {
        Commands::Info => {
            println!("Network: {}", network.network);
            println!("Hashpool: {}", network.hashpool_endpoint);
            println!("Mirror: {}", network.mirror_endpoint);
            println!("Explorer: {}", network.hashscan_base_url);
            println!("Nodes:");
            for node in &network.nodes {
                println!("  {} {}", node.account, node.address);
            }
        }

        Commands::Account { account } => {
            let info = rotator.lookup_account(account).await?;
            println!("Account {}", info.account_id);
            print!("{}", render_key(&info.endorsements));
        }

        Commands::Build {
            account,
            new_key,
            delay,
            out,
        } => {
            let params = RotationParams {
                account_id: parse_account(account)?,
                new_endorsement: load_key(new_key)?,
                start_delay_seconds: *delay,
            };
            let prepared = rotator.prepare(&params)?;
            let body_hex = hex::encode(&prepared.body_bytes);

            println!("Transaction: {}", prepared.transaction_id);
            println!("Node: {}", prepared.node_account_id);
            match out {
                Some(path) => {
                    std::fs::write(path, &body_hex)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Body written to {}", path.display());
                }
                None => println!("Body: {}", body_hex),
            }
        }

        Commands::Check {
            account,
            new_key,
            signatures,
        } => {
            let current = rotator.lookup_account(account).await?;
            let new_endorsement = load_key(new_key)?;
            let signatures = load_signatures(signatures)?;

            let current_ok = has_signature_match(&current.endorsements, &signatures);
            let new_ok = has_signature_match(&new_endorsement, &signatures);
            println!(
                "Current key: {}",
                if current_ok { "satisfied" } else { "NOT satisfied" }
            );
            println!(
                "New key: {}",
                if new_ok { "satisfied" } else { "NOT satisfied" }
            );
            rotator.check_authorization(&current.endorsements, &new_endorsement, &signatures)?;
        }

        Commands::Submit {
            account,
            new_key,
            body,
            signatures,
            skip_check,
        } => {
            let params = RotationParams {
                account_id: parse_account(account)?,
                new_endorsement: load_key(new_key)?,
                start_delay_seconds: 0,
            };
            let body_bytes = load_body(body)?;
            let signatures = load_signatures(signatures)?;

            let current = if *skip_check {
                warn!("Skipping the signature check for {}", params.account_id);
                None
            } else {
                Some(rotator.lookup_account(account).await?.endorsements)
            };

            let (handle, token) = cancellation_pair();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, abandoning the wait");
                    handle.cancel();
                }
            });

            let outcome = rotator
                .complete(&params, current.as_ref(), &body_bytes, &signatures, &token)
                .await?;

            println!("Transaction: {}", outcome.transaction_id);
            println!("Receipt status: {}", outcome.receipt.status);
            println!("Mirror result: {}", outcome.transaction_info.result);
            println!("Consensus at: {}", outcome.transaction_info.consensus_timestamp);
            println!("{}", network.transaction_url(&outcome.transaction_id));
        }
    }

    Ok(())
}

fn parse_account(account: &str) -> Result<AccountId> {
    account
        .parse()
        .with_context(|| format!("Invalid account id {}", account))
}

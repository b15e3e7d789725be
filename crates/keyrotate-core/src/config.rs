use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use keyrotate_types::{AccountId, ChannelInfo, RotationError, RotationResult, TransactionId};
use rand::Rng;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::client::NetworkInfoSource;

/// Client settings, read from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Primary network proxy connection settings
    #[serde(default)]
    pub network: NetworkSettings,
    /// Receipt wait settings
    #[serde(default)]
    pub receipt: ReceiptSettings,
    /// Mirror confirmation settings
    #[serde(default)]
    pub mirror: MirrorSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Base url of the primary network proxy
    #[serde(default = "default_hashpool_endpoint")]
    pub hashpool_endpoint: String,
    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSettings {
    /// Extra wait past the valid start before asking for a receipt
    #[serde(default = "default_receipt_margin")]
    pub margin_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorSettings {
    /// Lookups made before giving up on the mirror
    #[serde(default = "default_mirror_attempts")]
    pub max_attempts: u32,
    /// Pause between lookups
    #[serde(default = "default_mirror_interval")]
    pub interval_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_hashpool_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_receipt_margin() -> u64 {
    5
}

fn default_mirror_attempts() -> u32 {
    60
}

fn default_mirror_interval() -> u64 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            hashpool_endpoint: default_hashpool_endpoint(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            margin_seconds: default_receipt_margin(),
        }
    }
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_mirror_attempts(),
            interval_seconds: default_mirror_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> RotationResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RotationError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        toml::from_str(&content)
            .map_err(|e| RotationError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> RotationResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RotationError::Configuration(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RotationError::Configuration(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content)
            .map_err(|e| RotationError::Configuration(format!("Failed to write config file: {}", e)))
    }

    /// Defaults when the file does not exist; any other failure is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> RotationResult<Self> {
        match fs::metadata(path.as_ref()) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.as_ref().display());
                Ok(Self::default())
            }
            _ => Self::load(path),
        }
    }
}

/// Ledger networks the explorer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownNetwork {
    Mainnet,
    Testnet,
    Previewnet,
}

impl fmt::Display for KnownNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KnownNetwork::Mainnet => "mainnet",
            KnownNetwork::Testnet => "testnet",
            KnownNetwork::Previewnet => "previewnet",
        };
        f.write_str(name)
    }
}

/// Guesses the network from the mirror node's host name, falling back to mainnet.
pub fn guess_network(mirror_url: &str) -> KnownNetwork {
    let lowered = mirror_url.trim().to_lowercase();
    match lowered.split('.').next() {
        Some("https://testnet") => KnownNetwork::Testnet,
        Some("https://previewnet") => KnownNetwork::Previewnet,
        _ => KnownNetwork::Mainnet,
    }
}

/// Read-only description of the network, loaded once per process.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    pub hashpool_endpoint: String,
    pub mirror_endpoint: String,
    pub network: KnownNetwork,
    pub nodes: Vec<ChannelInfo>,
    pub hashscan_base_url: String,
    pub client_version: String,
}

impl NetworkConfig {
    pub fn select_random_gossip_node<R: Rng>(&self, rng: &mut R) -> RotationResult<AccountId> {
        select_random_gossip_node(&self.nodes, rng)
    }

    /// Explorer page for a transaction.
    pub fn transaction_url(&self, transaction_id: &TransactionId) -> String {
        format!("{}/transaction/{}", self.hashscan_base_url, transaction_id)
    }
}

/// Picks an entry node uniformly at random.
pub fn select_random_gossip_node<R: Rng>(
    nodes: &[ChannelInfo],
    rng: &mut R,
) -> RotationResult<AccountId> {
    if nodes.is_empty() {
        return Err(RotationError::Configuration(
            "no gossip nodes are known".to_string(),
        ));
    }
    let node = &nodes[rng.gen_range(0..nodes.len())];
    node.account_id()
}

/// Builds the network description from the proxy's `/info` endpoint.
pub async fn load_network_config<S: NetworkInfoSource + ?Sized>(
    source: &S,
    hashpool_endpoint: &str,
) -> RotationResult<NetworkConfig> {
    check_environment()?;

    let info = source.get_info().await?;
    let network = guess_network(&info.mirror_node);
    if info.channels.is_empty() {
        return Err(RotationError::Configuration(
            "network proxy reported no gossip nodes".to_string(),
        ));
    }
    for channel in &info.channels {
        channel.account_id().map_err(|_| {
            RotationError::Configuration(format!("malformed node account {}", channel.account))
        })?;
    }

    info!(
        "Loaded {} network configuration: mirror {}, {} nodes",
        network,
        info.mirror_node,
        info.channels.len()
    );

    Ok(NetworkConfig {
        hashpool_endpoint: hashpool_endpoint.to_string(),
        mirror_endpoint: info.mirror_node,
        network,
        nodes: info.channels,
        hashscan_base_url: format!("https://hashscan.io/{}", network),
        client_version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// The workflow's waits need a Tokio runtime; detect its absence up front.
fn check_environment() -> RotationResult<()> {
    tokio::runtime::Handle::try_current().map(|_| ()).map_err(|e| {
        RotationError::EnvironmentUnsupported(format!(
            "a Tokio runtime is required for timed waits: {}",
            e
        ))
    })
}

/// One-time initialization gate for [`NetworkConfig`].
///
/// Concurrent callers share a single in-flight load. A successful load is kept
/// for the life of the gate; a failed one is not, so the next caller retries.
#[derive(Debug, Default)]
pub struct ConfigGate {
    cell: OnceCell<Arc<NetworkConfig>>,
}

impl ConfigGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<NetworkConfig>> {
        self.cell.get().cloned()
    }

    pub async fn ensure<S: NetworkInfoSource + ?Sized>(
        &self,
        source: &S,
        hashpool_endpoint: &str,
    ) -> RotationResult<Arc<NetworkConfig>> {
        self.cell
            .get_or_try_init(|| async {
                load_network_config(source, hashpool_endpoint)
                    .await
                    .map(Arc::new)
            })
            .await
            .cloned()
    }
}

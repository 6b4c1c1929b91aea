use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::registry::{ChainRegistry, RegistryError, is_evm_address};

/// Default invoice recipient
pub const DEFAULT_RECIPIENT: &str = "0x9264e84Dcc5DFDf009F4cD14CdA70C59D7cb98fd";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("Chain registry: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    /// hourly | daily | never
    pub rotation: String,
    /// Keep debug output from the upstream HTTP stack (hyper, reqwest)
    #[serde(default)]
    pub log_upstream_http: bool,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub invoice: InvoiceConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Upstream market-data settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MarketConfig {
    pub upstream_base_url: String,
    pub request_timeout_ms: u64,
    /// Pause before each upstream call
    pub request_delay_ms: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: crate::market::coingecko::DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
            request_delay_ms: 300,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InvoiceConfig {
    pub recipient: String,
    /// YAML chain registry; the built-in table when absent
    #[serde(default)]
    pub chains_path: Option<String>,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            chains_path: None,
        }
    }
}

impl InvoiceConfig {
    /// Load the configured registry, or the built-in one
    pub fn registry(&self) -> Result<ChainRegistry, ConfigError> {
        match &self.chains_path {
            Some(path) => Ok(ChainRegistry::from_file(path)?),
            None => Ok(ChainRegistry::builtin()),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        if !is_evm_address(&config.invoice.recipient) {
            return Err(ConfigError::InvalidRecipient(config.invoice.recipient));
        }
        Ok(config)
    }
}

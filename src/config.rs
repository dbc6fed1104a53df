//! Configuration module for the submission engine
//!
//! This module handles all configuration loading from TOML files,
//! environment variables, and provides structured configuration types.

use serde::{Deserialize, Serialize};

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network node configuration
    pub network: NetworkConfig,

    /// Sponsorship service configuration
    pub sponsorship: SponsorshipConfig,

    /// Alternate fee-relay provider configuration
    pub provider: ProviderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which network the engine submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    Mainnet,
    Testnet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network identity, drives endpoint defaults
    pub id: NetworkId,

    /// Base URL of the node core API
    pub core_api_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SponsorshipConfig {
    /// Whether sponsored submission is offered at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the sponsorship service
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the alternate provider; defaults per network when unset
    #[serde(default)]
    pub api_url: Option<String>,

    /// Fixed relay fee forwarded with every provider submission
    #[serde(default = "default_relay_fee")]
    pub relay_fee: u64,
}

impl ProviderConfig {
    /// Resolve the provider base URL, falling back to the per-network default
    pub fn url_for_network(&self, network: NetworkId) -> String {
        match &self.api_url {
            Some(url) => url.clone(),
            None => match network {
                NetworkId::Testnet => "http://localhost:4000/api/v1".to_string(),
                NetworkId::Mainnet => "https://relay.example.org/api/v1".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable tracing subscriber initialization
    #[serde(default = "default_true")]
    pub enable_tracing: bool,

    /// Emit JSON-formatted log lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_tracing: default_true(),
            json: false,
        }
    }
}

// Default value functions
fn default_request_timeout() -> u64 {
    30
}
fn default_relay_fee() -> u64 {
    100
}
fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_file(path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig {
                id: NetworkId::Mainnet,
                core_api_url: "https://node.example.org".to_string(),
                timeout_secs: default_request_timeout(),
            },
            sponsorship: SponsorshipConfig {
                enabled: default_true(),
                api_url: "https://sponsor.example.org/api".to_string(),
            },
            provider: ProviderConfig {
                api_url: None,
                relay_fee: default_relay_fee(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let toml_src = r#"
            [network]
            id = "testnet"
            core_api_url = "http://localhost:3999"

            [sponsorship]
            api_url = "http://localhost:8080/api"

            [provider]
        "#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml_src.as_bytes()).unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.network.id, NetworkId::Testnet);
        assert_eq!(config.network.timeout_secs, 30);
        assert!(config.sponsorship.enabled);
        assert_eq!(config.provider.relay_fee, 100);
        assert!(config.logging.enable_tracing);
    }

    #[test]
    fn test_provider_url_defaults_per_network() {
        let provider = ProviderConfig {
            api_url: None,
            relay_fee: 100,
        };
        assert_eq!(
            provider.url_for_network(NetworkId::Testnet),
            "http://localhost:4000/api/v1"
        );
        assert_eq!(
            provider.url_for_network(NetworkId::Mainnet),
            "https://relay.example.org/api/v1"
        );

        let pinned = ProviderConfig {
            api_url: Some("http://localhost:9999/api".to_string()),
            relay_fee: 100,
        };
        assert_eq!(
            pinned.url_for_network(NetworkId::Mainnet),
            "http://localhost:9999/api"
        );
    }

    #[test]
    fn test_disabled_sponsorship_roundtrips() {
        let toml_src = r#"
            [network]
            id = "mainnet"
            core_api_url = "https://node.example.org"

            [sponsorship]
            enabled = false
            api_url = "https://sponsor.example.org/api"

            [provider]
            relay_fee = 250
        "#;
        let config: Config = toml::from_str(toml_src).unwrap();
        assert!(!config.sponsorship.enabled);
        assert_eq!(config.provider.relay_fee, 250);
    }
}

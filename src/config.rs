use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Bid Broker
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BidBrokerConfig {
    /// Record persistence service
    pub records: RecordsConfig,
    /// Bid source service
    pub bidding: BiddingConfig,
    /// Messaging service (thread resolution)
    pub messaging: MessagingConfig,
    /// Invoicing service (payment links + delivery)
    pub invoicing: InvoicingConfig,
    /// Mailing-list provider
    pub mailing: MailingConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordsConfig {
    /// Base URL of the persistence service's admin API
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BiddingConfig {
    /// Base URL of the bidding service
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessagingConfig {
    /// Base URL of the messaging service
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InvoicingConfig {
    /// Base URL of the invoicing service
    pub base_url: String,
    /// API key (can be set via env var)
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailingConfig {
    /// Base URL of the mailing-list provider
    pub base_url: String,
    /// API key (can be set via env var)
    pub api_key: Option<String>,
    /// Audience/list identifier
    pub list_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Enable structured tracing output
    pub tracing_enabled: bool,
    /// Log level
    pub log_level: String,
}

impl Default for BidBrokerConfig {
    fn default() -> Self {
        Self {
            records: RecordsConfig {
                base_url: "http://localhost:3000/api".to_string(),
            },
            bidding: BiddingConfig {
                base_url: "http://localhost:3001/api".to_string(),
            },
            messaging: MessagingConfig {
                base_url: "http://localhost:3002/api".to_string(),
            },
            invoicing: InvoicingConfig {
                base_url: "http://localhost:3003/api".to_string(),
                api_key: None, // read from env var or .bid-broker-rc
            },
            mailing: MailingConfig {
                base_url: "http://localhost:3004/api".to_string(),
                api_key: None,
                list_id: "default".to_string(),
            },
            observability: ObservabilityConfig {
                tracing_enabled: true,
                log_level: "info".to_string(),
            },
        }
    }
}

impl BidBrokerConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (bid-broker.toml, .bid-broker-rc)
    /// 3. Environment variables (prefixed with BID_BROKER_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("bid-broker.toml").exists() {
            builder = builder.add_source(File::with_name("bid-broker"));
        }

        if Path::new(".bid-broker-rc").exists() {
            builder = builder.add_source(File::with_name(".bid-broker-rc"));
        }

        builder = builder.add_source(
            Environment::with_prefix("BID_BROKER")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut broker_config: BidBrokerConfig = config.try_deserialize()?;

        // API keys are usually supplied through the environment
        if broker_config.invoicing.api_key.is_none() {
            if let Ok(key) = std::env::var("INVOICING_API_KEY") {
                broker_config.invoicing.api_key = Some(key);
            }
        }
        if broker_config.mailing.api_key.is_none() {
            if let Ok(key) = std::env::var("MAILING_API_KEY") {
                broker_config.mailing.api_key = Some(key);
            }
        }

        Ok(broker_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<BidBrokerConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = BidBrokerConfig::load_env_file();
        BidBrokerConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static BidBrokerConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_round_trip_through_toml() {
        let config = BidBrokerConfig::default();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bid-broker.toml");

        config.save_to_file(&path).expect("save");
        let raw = std::fs::read_to_string(&path).expect("read");
        let loaded: BidBrokerConfig = toml::from_str(&raw).expect("parse");

        assert_eq!(loaded.records.base_url, config.records.base_url);
        assert_eq!(loaded.mailing.list_id, config.mailing.list_id);
        assert!(loaded.observability.tracing_enabled);
    }
}

use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub sale: SaleConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub name: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// JSON file with products, customers and suppliers loaded at startup.
    pub seed_path: Option<String>,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SaleConfig {
    #[serde(default = "default_transaction_prefix")]
    pub transaction_prefix: String,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            transaction_prefix: default_transaction_prefix(),
        }
    }
}

fn default_currency() -> String { "USD".to_string() }

fn default_low_stock_threshold() -> u32 { 10 }

fn default_transaction_prefix() -> String { "TXN".to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `HEALTHSTORE_SERVER__PORT=9090` sets `server.port`
            .add_source(config::Environment::with_prefix("HEALTHSTORE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Parse a TOML document directly, without the file and environment layers.
    pub fn from_toml(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

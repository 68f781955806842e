use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_EXCHANGE_RATE_URL: &str = "https://open.er-api.com/v6";
pub const DEFAULT_GOLD_URL: &str = "https://api.binance.com";
pub const DEFAULT_GOLD_SYMBOL: &str = "PAXGUSDT";
pub const DEFAULT_CURRENCY_NAMES_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies.json";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeRateProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoldProviderConfig {
    pub base_url: String,
    #[serde(default = "default_gold_symbol")]
    pub symbol: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogProviderConfig {
    pub names_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub exchange_rate: Option<ExchangeRateProviderConfig>,
    pub gold: Option<GoldProviderConfig>,
    pub catalog: Option<CatalogProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            exchange_rate: Some(ExchangeRateProviderConfig {
                base_url: DEFAULT_EXCHANGE_RATE_URL.to_string(),
            }),
            gold: Some(GoldProviderConfig {
                base_url: DEFAULT_GOLD_URL.to_string(),
                symbol: DEFAULT_GOLD_SYMBOL.to_string(),
            }),
            catalog: Some(CatalogProviderConfig {
                names_url: DEFAULT_CURRENCY_NAMES_URL.to_string(),
            }),
        }
    }
}

fn default_gold_symbol() -> String {
    DEFAULT_GOLD_SYMBOL.to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Currency selected when a session starts.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: default_currency(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file was set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "aurum", "aurum")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn exchange_rate_url(&self) -> &str {
        self.providers
            .exchange_rate
            .as_ref()
            .map_or(DEFAULT_EXCHANGE_RATE_URL, |p| &p.base_url)
    }

    pub fn gold_url(&self) -> &str {
        self.providers
            .gold
            .as_ref()
            .map_or(DEFAULT_GOLD_URL, |p| &p.base_url)
    }

    pub fn gold_symbol(&self) -> &str {
        self.providers
            .gold
            .as_ref()
            .map_or(DEFAULT_GOLD_SYMBOL, |p| &p.symbol)
    }

    pub fn currency_names_url(&self) -> &str {
        self.providers
            .catalog
            .as_ref()
            .map_or(DEFAULT_CURRENCY_NAMES_URL, |p| &p.names_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "INR"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "INR");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.exchange_rate_url(), "https://open.er-api.com/v6");
        assert_eq!(config.gold_url(), "https://api.binance.com");
        assert_eq!(config.gold_symbol(), "PAXGUSDT");
        assert_eq!(config.currency_names_url(), DEFAULT_CURRENCY_NAMES_URL);

        let yaml_str_with_providers = r#"
providers:
  exchange_rate:
    base_url: "http://example.com/rates"
  gold:
    base_url: "http://example.com/gold"
request_timeout_secs: 3
        "#;
        let config_with_providers: AppConfig =
            serde_yaml::from_str(yaml_str_with_providers).unwrap();
        assert_eq!(
            config_with_providers.exchange_rate_url(),
            "http://example.com/rates"
        );
        assert_eq!(config_with_providers.gold_url(), "http://example.com/gold");
        // Symbol defaults even when the gold section is overridden
        assert_eq!(config_with_providers.gold_symbol(), "PAXGUSDT");
        // Missing catalog section falls back to the default URL
        assert!(config_with_providers.providers.catalog.is_none());
        assert_eq!(
            config_with_providers.currency_names_url(),
            DEFAULT_CURRENCY_NAMES_URL
        );
        assert_eq!(config_with_providers.currency, "EUR");
        assert_eq!(config_with_providers.request_timeout_secs, 3);
    }

    #[test]
    fn test_load_from_path_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = AppConfig::load_from_path(&missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

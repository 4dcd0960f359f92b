use crate::core::fees::CountryFeeSchedule;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable consulted when no API key is present in the config file.
pub const EXCHANGE_API_KEY_ENV: &str = "EXCHANGE_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExchangeRateApiConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ExchangeRateApiConfig {
    fn default() -> Self {
        ExchangeRateApiConfig {
            enabled: true,
            base_url: "https://v6.exchangerate-api.com/v6".to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ExchangeRateApiConfig {
    /// API key from the config file, else from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(EXCHANGE_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CoinGeckoConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        CoinGeckoConfig {
            enabled: true,
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OfflineRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct OfflineConfig {
    /// Include the built-in reference table.
    pub reference_table: bool,
    /// Extra entries, overriding reference entries for the same pair.
    pub rates: Vec<OfflineRate>,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        OfflineConfig {
            reference_table: true,
            rates: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    pub exchange_rate: ExchangeRateApiConfig,
    pub coingecko: CoinGeckoConfig,
    pub offline: OfflineConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Holding {
    pub currency: String,
    pub amount: f64,
    pub purchase_rate: f64,
    pub notes: Option<String>,
}

fn default_base_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    pub data_path: Option<String>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub holdings: Vec<Holding>,
    #[serde(default)]
    pub fee_schedules: Vec<CountryFeeSchedule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            data_path: None,
            providers: ProvidersConfig::default(),
            holdings: Vec::new(),
            fee_schedules: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults when none exists yet.
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "xrate", "xrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "xrate", "xrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

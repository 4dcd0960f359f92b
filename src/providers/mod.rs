pub mod coingecko;
pub mod exchange_rate_api;
pub mod offline;
pub mod util;

use crate::core::config::ProvidersConfig;
use crate::core::currency::{CurrencyRateProvider, DisabledProvider};
use anyhow::Result;
use coingecko::CoinGeckoProvider;
use exchange_rate_api::ExchangeRateApiProvider;
use offline::OfflineRateTable;
use std::sync::Arc;

/// The three rate sources the resolver falls back across.
pub struct RateProviders {
    pub fiat: Arc<dyn CurrencyRateProvider>,
    pub crypto: Arc<dyn CurrencyRateProvider>,
    pub offline: Arc<dyn CurrencyRateProvider>,
}

impl RateProviders {
    pub fn from_config(config: &ProvidersConfig) -> Result<Self> {
        let fiat: Arc<dyn CurrencyRateProvider> = if config.exchange_rate.enabled {
            Arc::new(ExchangeRateApiProvider::from_config(&config.exchange_rate)?)
        } else {
            Arc::new(DisabledProvider::new("exchange_rate_api"))
        };

        let crypto: Arc<dyn CurrencyRateProvider> = if config.coingecko.enabled {
            Arc::new(CoinGeckoProvider::from_config(&config.coingecko)?)
        } else {
            Arc::new(DisabledProvider::new("coingecko"))
        };

        Ok(RateProviders {
            fiat,
            crypto,
            offline: Arc::new(OfflineRateTable::from_config(&config.offline)),
        })
    }
}

use super::util::{fetch_text, http_client};
use crate::core::classify;
use crate::core::config::CoinGeckoConfig;
use crate::core::currency::{CurrencyRateProvider, LookupError, LookupResult};
use crate::core::trends::{MarketTrend, MarketTrendProvider};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// `{ "bitcoin": { "usd": 64000.0, "usd_24h_change": -1.2 } }`
type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

fn coin_id(code: &str) -> String {
    classify::asset_id(code).unwrap_or(code).to_lowercase()
}

/// Crypto prices from the CoinGecko simple price endpoint.
///
/// `query_rate(asset, fiat)` returns the price of one `asset` in `fiat`.
pub struct CoinGeckoProvider {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        Ok(CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(timeout_secs)?,
        })
    }

    pub fn from_config(config: &CoinGeckoConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout_secs)
    }

    async fn simple_price(&self, url: &str, label: &str) -> LookupResult<SimplePriceResponse> {
        let text = fetch_text(&self.client, url, label).await?;
        serde_json::from_str(&text).map_err(|e| {
            LookupError::Malformed(format!("failed to parse JSON response for {label}: {e}"))
        })
    }
}

#[async_trait]
impl CurrencyRateProvider for CoinGeckoProvider {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    #[instrument(name = "CoinGeckoFetch", skip(self), fields(asset = %asset, fiat = %fiat))]
    async fn query_rate(&self, asset: &str, fiat: &str) -> LookupResult<f64> {
        let asset_id = coin_id(asset);
        let vs_currency = fiat.to_lowercase();

        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url, asset_id, vs_currency
        );
        debug!("Requesting {asset_id} price in {vs_currency}");

        let data = self.simple_price(&url, &format!("{asset}/{fiat}")).await?;

        data.get(&asset_id)
            .and_then(|prices| prices.get(&vs_currency))
            .copied()
            .flatten()
            .ok_or_else(|| LookupError::not_listed(asset, fiat))
    }
}

#[async_trait]
impl MarketTrendProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoTrends", skip(self), fields(vs = %vs_currency))]
    async fn market_trends(
        &self,
        symbols: &[&str],
        vs_currency: &str,
    ) -> LookupResult<Vec<MarketTrend>> {
        let ids: Vec<String> = symbols.iter().map(|symbol| coin_id(symbol)).collect();
        let vs = vs_currency.to_lowercase();
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}&include_24hr_change=true",
            self.base_url,
            ids.join(","),
            vs
        );
        debug!("Requesting market trends for {} assets", ids.len());

        let data = self
            .simple_price(&url, &format!("market trends in {vs_currency}"))
            .await?;
        let change_key = format!("{vs}_24h_change");

        Ok(symbols
            .iter()
            .zip(&ids)
            .filter_map(|(symbol, id)| {
                let prices = data.get(id)?;
                let price = prices.get(&vs).copied().flatten()?;
                Some(MarketTrend {
                    symbol: symbol.to_string(),
                    price,
                    change_24h: prices.get(&change_key).copied().flatten(),
                })
            })
            .collect())
    }
}

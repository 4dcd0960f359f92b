use super::util::{fetch_text, http_client};
use crate::core::config::ExchangeRateApiConfig;
use crate::core::currency::{CurrencyRateProvider, LookupError, LookupResult, is_usable_rate};
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Live fiat rates from the ExchangeRate-API v6 pair endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: http_client(timeout_secs)?,
        })
    }

    pub fn from_config(config: &ExchangeRateApiConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.resolved_api_key(),
            config.timeout_secs,
        )
    }
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: String,
    conversion_rate: Option<f64>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &'static str {
        "exchange_rate_api"
    }

    #[instrument(name = "ExchangeRateApiFetch", skip(self), fields(from = %from, to = %to))]
    async fn query_rate(&self, from: &str, to: &str) -> LookupResult<f64> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LookupError::Unavailable("no API key configured".to_string()))?;

        let pair = format!("{from}/{to}");
        let url = format!("{}/{}/pair/{}", self.base_url, api_key, pair);
        debug!("Requesting conversion rate for {pair}");

        let text = fetch_text(&self.client, &url, &pair).await?;
        let data: PairResponse = serde_json::from_str(&text).map_err(|e| {
            LookupError::Malformed(format!("failed to parse JSON response for {pair}: {e}"))
        })?;

        if data.result != "success" {
            debug!(
                "Provider rejected {pair}: {}",
                data.error_type.as_deref().unwrap_or("unknown error")
            );
            return Err(LookupError::not_listed(from, to));
        }

        match data.conversion_rate {
            Some(rate) if is_usable_rate(rate) => Ok(rate),
            Some(rate) => Err(LookupError::Malformed(format!(
                "invalid conversion_rate {rate} for {pair}"
            ))),
            None => Err(LookupError::Malformed(format!(
                "missing conversion_rate for {pair}"
            ))),
        }
    }
}

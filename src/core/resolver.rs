//! Exchange-rate resolution across crypto, cached, live and offline sources.
//!
//! [`RateResolver::resolve_rate`] always produces a rate. Tiers are tried in order and
//! the first success wins:
//!
//! 1. identical codes resolve to `1.0`
//! 2. pairs with a crypto side go to the crypto provider (no cache)
//! 3. a cached sample younger than [`FRESHNESS_WINDOW_MINUTES`]
//! 4. the live fiat provider
//! 5. the offline table, forward
//! 6. the offline table for the reversed pair, inverted
//! 7. the newest stored sample regardless of age
//! 8. `1.0`
//!
//! Tiers 4-6 append what they found to the rate store. Provider and store failures
//! are logged and only move resolution on to the next tier.
use crate::core::classify::{CRYPTO_BRIDGE_CURRENCY, PairRoute};
use crate::core::currency::{CurrencyRateProvider, LookupError, is_usable_rate};
use crate::core::store::{RateSample, RateStore};
use chrono::Duration;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// How long a stored sample may be reused without a live lookup.
pub const FRESHNESS_WINDOW_MINUTES: i64 = 60;

/// The tier that produced a resolved rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOrigin {
    Identity,
    Crypto,
    Cache,
    Fiat,
    OfflineForward,
    OfflineInverse,
    LastKnown,
    /// Nothing answered and nothing was stored; the rate is a 1:1 placeholder.
    Unit,
}

impl Display for RateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RateOrigin::Identity => "identity",
                RateOrigin::Crypto => "crypto market",
                RateOrigin::Cache => "cached",
                RateOrigin::Fiat => "live",
                RateOrigin::OfflineForward => "offline table",
                RateOrigin::OfflineInverse => "offline table (inverted)",
                RateOrigin::LastKnown => "last known",
                RateOrigin::Unit => "unavailable (1:1 placeholder)",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub rate: f64,
    pub origin: RateOrigin,
}

impl Resolution {
    fn new(rate: f64, origin: RateOrigin) -> Self {
        Resolution { rate, origin }
    }

    /// True when no source had a rate and the 1:1 placeholder was returned.
    pub fn is_approximated(&self) -> bool {
        self.origin == RateOrigin::Unit
    }
}

pub struct RateResolver {
    store: Arc<dyn RateStore>,
    fiat: Arc<dyn CurrencyRateProvider>,
    crypto: Arc<dyn CurrencyRateProvider>,
    offline: Arc<dyn CurrencyRateProvider>,
}

impl RateResolver {
    pub fn new(
        store: Arc<dyn RateStore>,
        fiat: Arc<dyn CurrencyRateProvider>,
        crypto: Arc<dyn CurrencyRateProvider>,
        offline: Arc<dyn CurrencyRateProvider>,
    ) -> Self {
        RateResolver {
            store,
            fiat,
            crypto,
            offline,
        }
    }

    pub fn store(&self) -> &Arc<dyn RateStore> {
        &self.store
    }

    /// Units of `to` per unit of `from`. Never fails; see [`RateResolver::resolve`]
    /// to tell a real rate from the 1:1 placeholder.
    pub async fn resolve_rate(&self, from: &str, to: &str) -> f64 {
        self.resolve(from, to).await.rate
    }

    #[instrument(name = "ResolveRate", skip(self), fields(from = %from, to = %to))]
    pub async fn resolve(&self, from: &str, to: &str) -> Resolution {
        if from == to {
            return Resolution::new(1.0, RateOrigin::Identity);
        }

        if let Some(rate) = self.crypto_rate(from, to).await {
            return Resolution::new(rate, RateOrigin::Crypto);
        }

        if let Some(sample) = self.fresh_sample(from, to).await {
            debug!("Using cached rate {} observed at {}", sample.rate, sample.observed_at);
            return Resolution::new(sample.rate, RateOrigin::Cache);
        }

        if let Some(rate) = lookup(self.fiat.as_ref(), from, to).await {
            self.record(from, to, rate).await;
            return Resolution::new(rate, RateOrigin::Fiat);
        }

        if let Some(rate) = lookup(self.offline.as_ref(), from, to).await {
            self.record(from, to, rate).await;
            return Resolution::new(rate, RateOrigin::OfflineForward);
        }

        if let Some(reverse) = lookup(self.offline.as_ref(), to, from).await {
            let rate = 1.0 / reverse;
            self.record(from, to, rate).await;
            return Resolution::new(rate, RateOrigin::OfflineInverse);
        }

        if let Some(sample) = self.last_known(from, to).await {
            debug!(
                "Using last known rate {} observed at {}",
                sample.rate, sample.observed_at
            );
            return Resolution::new(sample.rate, RateOrigin::LastKnown);
        }

        warn!("No rate available for {from}/{to}, assuming 1:1");
        Resolution::new(1.0, RateOrigin::Unit)
    }

    async fn crypto_rate(&self, from: &str, to: &str) -> Option<f64> {
        match PairRoute::of(from, to) {
            PairRoute::FiatOnly => None,
            PairRoute::CryptoToFiat => self.crypto_price(from, to).await,
            PairRoute::FiatToCrypto => self.crypto_price(to, from).await.map(|price| 1.0 / price),
            PairRoute::CryptoToCrypto => {
                let from_price = self.crypto_price(from, CRYPTO_BRIDGE_CURRENCY).await?;
                let to_price = self.crypto_price(to, CRYPTO_BRIDGE_CURRENCY).await?;
                Some(to_price / from_price)
            }
        }
    }

    /// Price of one `asset` in `fiat`.
    async fn crypto_price(&self, asset: &str, fiat: &str) -> Option<f64> {
        lookup(self.crypto.as_ref(), asset, fiat).await
    }

    async fn fresh_sample(&self, from: &str, to: &str) -> Option<RateSample> {
        let window = Duration::minutes(FRESHNESS_WINDOW_MINUTES);
        match self.store.latest_within(from, to, window).await {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, "Rate store read failed for {from}/{to}");
                None
            }
        }
    }

    async fn last_known(&self, from: &str, to: &str) -> Option<RateSample> {
        match self.store.latest_ever(from, to).await {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, "Rate store read failed for {from}/{to}");
                None
            }
        }
    }

    async fn record(&self, from: &str, to: &str, rate: f64) {
        if let Err(e) = self
            .store
            .append(RateSample::observed_now(from, to, rate))
            .await
        {
            warn!(error = %e, "Failed to record rate for {from}/{to}");
        }
    }
}

/// Queries `provider`, treating errors and unusable rates (zero, negative, NaN or
/// infinite) as a miss.
async fn lookup(provider: &dyn CurrencyRateProvider, from: &str, to: &str) -> Option<f64> {
    match provider.query_rate(from, to).await {
        Ok(rate) if !is_usable_rate(rate) => {
            warn!(provider = provider.name(), "Ignoring unusable rate {rate} for {from}/{to}");
            None
        }
        Ok(rate) => {
            debug!("{} returned {rate} for {from}/{to}", provider.name());
            Some(rate)
        }
        Err(e @ LookupError::NotListed { .. }) => {
            debug!("{}: {e}", provider.name());
            None
        }
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "Rate lookup failed for {from}/{to}");
            None
        }
    }
}

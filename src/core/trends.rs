//! Market trend snapshots for crypto assets.
use crate::core::currency::LookupResult;
use async_trait::async_trait;

/// Current price and 24 hour move of one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketTrend {
    pub symbol: String,
    pub price: f64,
    /// Percentage change over the last 24 hours, when the source reports one.
    pub change_24h: Option<f64>,
}

#[async_trait]
pub trait MarketTrendProvider: Send + Sync {
    /// Trends for `symbols` priced in `vs_currency`, in the order requested.
    /// Symbols the source has no price for are left out.
    async fn market_trends(
        &self,
        symbols: &[&str],
        vs_currency: &str,
    ) -> LookupResult<Vec<MarketTrend>>;
}

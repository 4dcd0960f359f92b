//! Values currency holdings in a base currency.
use crate::core::config::Holding;
use crate::core::resolver::{RateOrigin, RateResolver};
use futures::future::join_all;
use tracing::debug;

/// Current valuation of a single holding.
#[derive(Debug, Clone)]
pub struct HoldingValue {
    pub currency: String,
    pub amount: f64,
    pub purchase_rate: f64,
    pub current_rate: f64,
    pub rate_origin: RateOrigin,
    pub current_value: f64,
    pub purchase_value: f64,
    pub profit_loss: f64,
    pub profit_loss_pct: f64,
    pub notes: Option<String>,
}

#[derive(Debug)]
pub struct PortfolioValue {
    pub base_currency: String,
    pub holdings: Vec<HoldingValue>,
    pub total_value: f64,
    pub total_purchase_value: f64,
}

impl PortfolioValue {
    /// True when at least one holding was valued with the 1:1 placeholder rate.
    pub fn has_placeholder_rates(&self) -> bool {
        self.holdings
            .iter()
            .any(|h| h.rate_origin == RateOrigin::Unit)
    }
}

/// Profit or loss as a percentage of the purchase value; zero for a zero purchase value.
pub fn profit_loss_pct(current_value: f64, purchase_value: f64) -> f64 {
    if purchase_value > 0.0 {
        (current_value - purchase_value) / purchase_value * 100.0
    } else {
        0.0
    }
}

/// Resolves every holding's rate concurrently and values it in `base_currency`.
/// `update_callback` runs once per valued holding.
pub async fn calculate_portfolio_value(
    holdings: &[Holding],
    resolver: &RateResolver,
    base_currency: &str,
    update_callback: &(dyn Fn() + Sync),
) -> PortfolioValue {
    let valuations = holdings.iter().map(|holding| async move {
        let resolution = resolver.resolve(&holding.currency, base_currency).await;
        update_callback();

        let current_value = holding.amount * resolution.rate;
        let purchase_value = holding.amount * holding.purchase_rate;
        debug!(
            "Valued {} {} at {} ({})",
            holding.amount, holding.currency, current_value, resolution.origin
        );

        HoldingValue {
            currency: holding.currency.clone(),
            amount: holding.amount,
            purchase_rate: holding.purchase_rate,
            current_rate: resolution.rate,
            rate_origin: resolution.origin,
            current_value,
            purchase_value,
            profit_loss: current_value - purchase_value,
            profit_loss_pct: profit_loss_pct(current_value, purchase_value),
            notes: holding.notes.clone(),
        }
    });

    let values = join_all(valuations).await;
    PortfolioValue {
        base_currency: base_currency.to_string(),
        total_value: values.iter().map(|v| v.current_value).sum(),
        total_purchase_value: values.iter().map(|v| v.purchase_value).sum(),
        holdings: values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::DisabledProvider;
    use crate::providers::offline::OfflineRateTable;
    use crate::store::memory::MemoryRateStore;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn offline_resolver(table: OfflineRateTable) -> RateResolver {
        RateResolver::new(
            Arc::new(MemoryRateStore::new()),
            Arc::new(DisabledProvider::new("exchange_rate_api")),
            Arc::new(DisabledProvider::new("coingecko")),
            Arc::new(table),
        )
    }

    fn holding(currency: &str, amount: f64, purchase_rate: f64) -> Holding {
        Holding {
            currency: currency.to_string(),
            amount,
            purchase_rate,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_portfolio_valuation() {
        let mut table = OfflineRateTable::empty();
        table.insert("GBP", "USD", 1.3);
        table.insert("EUR", "USD", 1.1);
        let resolver = offline_resolver(table);

        let holdings = vec![
            holding("GBP", 1000.0, 1.25),
            holding("EUR", 500.0, 1.2),
            holding("USD", 200.0, 1.0),
        ];
        let updates = AtomicUsize::new(0);
        let portfolio = calculate_portfolio_value(&holdings, &resolver, "USD", &|| {
            updates.fetch_add(1, Ordering::SeqCst);
        })
        .await;

        assert_eq!(updates.load(Ordering::SeqCst), 3);
        assert_eq!(portfolio.base_currency, "USD");
        assert_eq!(portfolio.holdings.len(), 3);

        let gbp = &portfolio.holdings[0];
        assert!((gbp.current_value - 1300.0).abs() < 1e-9);
        assert!((gbp.purchase_value - 1250.0).abs() < 1e-9);
        assert!((gbp.profit_loss - 50.0).abs() < 1e-9);
        assert!((gbp.profit_loss_pct - 4.0).abs() < 1e-9);

        let eur = &portfolio.holdings[1];
        assert!((eur.profit_loss - (-50.0)).abs() < 1e-9);

        let usd = &portfolio.holdings[2];
        assert_eq!(usd.rate_origin, RateOrigin::Identity);
        assert_eq!(usd.profit_loss, 0.0);

        assert!((portfolio.total_value - 2050.0).abs() < 1e-9);
        assert!((portfolio.total_purchase_value - 2050.0).abs() < 1e-9);
        assert!(!portfolio.has_placeholder_rates());
    }

    #[tokio::test]
    async fn test_unresolvable_holding_is_flagged() {
        let resolver = offline_resolver(OfflineRateTable::empty());
        let holdings = vec![holding("XAF", 1000.0, 0.0016)];

        let portfolio = calculate_portfolio_value(&holdings, &resolver, "USD", &|| ()).await;

        assert_eq!(portfolio.holdings[0].rate_origin, RateOrigin::Unit);
        assert!(portfolio.has_placeholder_rates());
    }

    #[test]
    fn test_profit_loss_pct_with_zero_purchase() {
        assert_eq!(profit_loss_pct(100.0, 0.0), 0.0);
        assert!((profit_loss_pct(110.0, 100.0) - 10.0).abs() < 1e-9);
    }
}

use crate::core::config::OfflineConfig;
use crate::core::currency::{CurrencyRateProvider, LookupError, LookupResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Built-in reference rates, quoted as units of the second code per unit of the first.
const REFERENCE_RATES: &[(&str, &str, f64)] = &[
    ("EUR", "USD", 1.08),
    ("EUR", "JPY", 162.0),
    ("EUR", "GBP", 0.85),
    ("EUR", "CHF", 0.95),
    ("EUR", "AUD", 1.65),
    ("EUR", "CAD", 1.47),
    ("EUR", "CNY", 7.8),
    ("EUR", "INR", 90.0),
    ("EUR", "SEK", 11.5),
    ("EUR", "NOK", 11.6),
    ("EUR", "DKK", 7.46),
    ("EUR", "PLN", 4.3),
    ("EUR", "CZK", 25.0),
    ("EUR", "HUF", 395.0),
    ("EUR", "NZD", 1.78),
    ("EUR", "SGD", 1.45),
    ("EUR", "HKD", 8.45),
    ("EUR", "KRW", 1460.0),
    ("EUR", "MXN", 18.5),
    ("EUR", "BRL", 5.5),
    ("EUR", "ZAR", 20.0),
    ("EUR", "TRY", 35.0),
    ("EUR", "THB", 38.5),
    ("EUR", "IDR", 17000.0),
    ("EUR", "ILS", 4.0),
    ("EUR", "PHP", 61.0),
    ("EUR", "MYR", 5.0),
    ("USD", "EUR", 0.92),
    ("USD", "GBP", 0.79),
    ("USD", "JPY", 150.0),
    ("USD", "CHF", 0.88),
    ("USD", "CAD", 1.36),
    ("USD", "AUD", 1.52),
    ("USD", "INR", 83.0),
    ("USD", "CNY", 7.2),
];

/// Static conversion table that needs no network access.
///
/// Only direct entries are answered; the resolver asks for the reversed pair itself
/// when it wants an inverted rate.
#[derive(Debug, Clone, Default)]
pub struct OfflineRateTable {
    rates: HashMap<(String, String), f64>,
}

impl OfflineRateTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn reference() -> Self {
        let mut table = Self::empty();
        for (from, to, rate) in REFERENCE_RATES {
            table.insert(from, to, *rate);
        }
        table
    }

    pub fn from_config(config: &OfflineConfig) -> Self {
        let mut table = if config.reference_table {
            Self::reference()
        } else {
            Self::empty()
        };
        for entry in &config.rates {
            table.insert(&entry.from, &entry.to, entry.rate);
        }
        debug!("Offline rate table has {} entries", table.len());
        table
    }

    pub fn insert(&mut self, from: &str, to: &str, rate: f64) {
        self.rates.insert((from.to_string(), to.to_string()), rate);
    }

    pub fn get(&self, from: &str, to: &str) -> Option<f64> {
        self.rates.get(&(from.to_string(), to.to_string())).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[async_trait]
impl CurrencyRateProvider for OfflineRateTable {
    fn name(&self) -> &'static str {
        "offline_table"
    }

    async fn query_rate(&self, from: &str, to: &str) -> LookupResult<f64> {
        self.get(from, to).ok_or_else(|| LookupError::not_listed(from, to))
    }
}

//! Currency rate lookup abstractions

use async_trait::async_trait;
use thiserror::Error;

/// Why a provider could not produce a rate for a pair.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// Network failure, timeout, non-success status or a provider switched off.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    /// The provider answered with a payload we could not understand.
    #[error("malformed provider response: {0}")]
    Malformed(String),
    /// The provider answered but has no rate for the pair.
    #[error("no rate listed for {from}/{to}")]
    NotListed { from: String, to: String },
}

impl LookupError {
    pub fn not_listed(from: &str, to: &str) -> Self {
        LookupError::NotListed {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns how many units of `to` one unit of `from` buys.
    async fn query_rate(&self, from: &str, to: &str) -> LookupResult<f64>;
}

/// Stand-in for a provider that is switched off in configuration.
pub struct DisabledProvider {
    name: &'static str,
}

impl DisabledProvider {
    pub fn new(name: &'static str) -> Self {
        DisabledProvider { name }
    }
}

#[async_trait]
impl CurrencyRateProvider for DisabledProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn query_rate(&self, _from: &str, _to: &str) -> LookupResult<f64> {
        Err(LookupError::Unavailable(format!("{} is disabled", self.name)))
    }
}

/// A rate that can be used for conversion: finite and strictly positive.
pub fn is_usable_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

/// Errors in user supplied input, reported back to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("missing currency code")]
    MissingCode,
    #[error("invalid currency code: {0} (expected 3-6 letters or digits)")]
    InvalidCode(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Normalises a currency code typed by a user: trimmed and upper-cased.
pub fn validate_code(code: &str) -> Result<String, InputError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(InputError::MissingCode);
    }
    let valid_len = (3..=6).contains(&code.chars().count());
    if !valid_len || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(InputError::InvalidCode(code.to_string()));
    }
    Ok(code.to_uppercase())
}

pub fn validate_amount(amount: f64) -> Result<f64, InputError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(InputError::InvalidAmount(amount.to_string()));
    }
    Ok(amount)
}

//! Rate ledger abstractions

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single observed exchange rate for an ordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSample {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub observed_at: DateTime<Utc>,
}

impl RateSample {
    pub fn new(from: &str, to: &str, rate: f64, observed_at: DateTime<Utc>) -> Self {
        RateSample {
            from: from.to_string(),
            to: to.to_string(),
            rate,
            observed_at,
        }
    }

    pub fn observed_now(from: &str, to: &str, rate: f64) -> Self {
        Self::new(from, to, rate, Utc::now())
    }

    pub fn is_pair(&self, from: &str, to: &str) -> bool {
        self.from == from && self.to == to
    }
}

/// Append-only ledger of rate samples.
///
/// Samples are never updated or removed. Every query looks at the exact ordered pair,
/// newest observation first.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn append(&self, sample: RateSample) -> Result<()>;

    /// Newest sample for the pair observed no longer than `window` ago.
    async fn latest_within(
        &self,
        from: &str,
        to: &str,
        window: Duration,
    ) -> Result<Option<RateSample>> {
        let cutoff = Utc::now() - window;
        Ok(self
            .latest_ever(from, to)
            .await?
            .filter(|sample| sample.observed_at >= cutoff))
    }

    async fn latest_ever(&self, from: &str, to: &str) -> Result<Option<RateSample>>;

    /// All samples for the pair observed at or after `since`, oldest first.
    async fn samples_since(
        &self,
        from: &str,
        to: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<RateSample>>;
}

use crate::core::store::{RateSample, RateStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory rate ledger backed by a Vec
#[derive(Clone, Default)]
pub struct MemoryRateStore {
    inner: Arc<RwLock<Vec<RateSample>>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples recorded across all pairs.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Snapshot of every sample in append order.
    pub async fn samples(&self) -> Vec<RateSample> {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn append(&self, sample: RateSample) -> Result<()> {
        let mut samples = self.inner.write().await;
        debug!("Store APPEND {}/{} = {}", sample.from, sample.to, sample.rate);
        samples.push(sample);
        Ok(())
    }

    async fn latest_ever(&self, from: &str, to: &str) -> Result<Option<RateSample>> {
        let samples = self.inner.read().await;
        // max_by_key keeps the last of equal keys, so ties go to the later append
        let latest = samples
            .iter()
            .filter(|s| s.is_pair(from, to))
            .max_by_key(|s| s.observed_at)
            .cloned();
        if latest.is_some() {
            debug!("Store HIT for {from}/{to}");
        } else {
            debug!("Store MISS for {from}/{to}");
        }
        Ok(latest)
    }

    async fn samples_since(
        &self,
        from: &str,
        to: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<RateSample>> {
        let samples = self.inner.read().await;
        let mut matching: Vec<RateSample> = samples
            .iter()
            .filter(|s| s.is_pair(from, to) && s.observed_at >= since)
            .cloned()
            .collect();
        matching.sort_by_key(|s| s.observed_at);
        Ok(matching)
    }
}

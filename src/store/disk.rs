use crate::core::store::{RateSample, RateStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

const SAMPLES_PARTITION: &str = "rate_samples";

/// Durable rate ledger stored in a fjall partition.
///
/// Keys are `<len>FROM<len>TO<timestamp><seq>`: each code is prefixed with its
/// big-endian byte length so no pair's prefix can match another pair, whatever the
/// codes contain. The timestamp is order-preserving and big-endian, so a prefix scan
/// walks one pair oldest to newest and its reverse yields the latest sample first.
/// The sequence suffix keeps appends with equal timestamps distinct.
pub struct DiskRateStore {
    keyspace: Keyspace,
    samples: PartitionHandle,
    seq: AtomicU32,
}

impl DiskRateStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path)
            .open()
            .with_context(|| format!("Failed to open rate store at {}", path.display()))?;
        let samples = keyspace.open_partition(SAMPLES_PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened rate store at {}", path.display());

        Ok(Self {
            keyspace,
            samples,
            seq: AtomicU32::new(0),
        })
    }

    fn sample_key(&self, sample: &RateSample) -> Vec<u8> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let mut key = pair_prefix(&sample.from, &sample.to);
        key.extend_from_slice(&sortable_micros(&sample.observed_at));
        key.extend_from_slice(&seq.to_be_bytes());
        key
    }

    fn decode(value: &[u8]) -> Result<RateSample> {
        serde_json::from_slice(value).context("Failed to decode stored rate sample")
    }
}

fn pair_prefix(from: &str, to: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(8 + from.len() + to.len());
    for code in [from, to] {
        prefix.extend_from_slice(&(code.len() as u32).to_be_bytes());
        prefix.extend_from_slice(code.as_bytes());
    }
    prefix
}

/// Flips the sign bit so byte order matches chronological order, pre-epoch included.
fn sortable_micros(at: &DateTime<Utc>) -> [u8; 8] {
    ((at.timestamp_micros() as u64) ^ (1 << 63)).to_be_bytes()
}

#[async_trait]
impl RateStore for DiskRateStore {
    async fn append(&self, sample: RateSample) -> Result<()> {
        let key = self.sample_key(&sample);
        self.samples.insert(key, serde_json::to_vec(&sample)?)?;
        self.keyspace.persist(PersistMode::SyncData)?;
        debug!("Store APPEND {}/{} = {}", sample.from, sample.to, sample.rate);
        Ok(())
    }

    async fn latest_ever(&self, from: &str, to: &str) -> Result<Option<RateSample>> {
        match self.samples.prefix(pair_prefix(from, to)).rev().next() {
            Some(entry) => {
                let (_, value) = entry?;
                debug!("Store HIT for {from}/{to}");
                Ok(Some(Self::decode(&value)?))
            }
            None => {
                debug!("Store MISS for {from}/{to}");
                Ok(None)
            }
        }
    }

    async fn samples_since(
        &self,
        from: &str,
        to: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<RateSample>> {
        let mut samples = Vec::new();
        for entry in self.samples.prefix(pair_prefix(from, to)) {
            let (_, value) = entry?;
            let sample = Self::decode(&value)?;
            if sample.observed_at >= since {
                samples.push(sample);
            }
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use futures::future::join_all;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_disk_store_latest_and_window() {
        let dir = tempdir().unwrap();
        let store = DiskRateStore::open(dir.path()).unwrap();
        let now = Utc::now();

        assert!(store.latest_ever("USD", "EUR").await.unwrap().is_none());

        store
            .append(RateSample::new("USD", "EUR", 0.90, now - Duration::hours(4)))
            .await
            .unwrap();
        store
            .append(RateSample::new("USD", "EUR", 0.92, now - Duration::hours(2)))
            .await
            .unwrap();

        let latest = store.latest_ever("USD", "EUR").await.unwrap().unwrap();
        assert_eq!(latest.rate, 0.92);
        assert!(
            store
                .latest_within("USD", "EUR", Duration::hours(1))
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.latest_ever("EUR", "USD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disk_store_keeps_equal_timestamps() {
        let dir = tempdir().unwrap();
        let store = DiskRateStore::open(dir.path()).unwrap();
        let at = Utc::now();

        store
            .append(RateSample::new("EUR", "GBP", 0.85, at))
            .await
            .unwrap();
        store
            .append(RateSample::new("EUR", "GBP", 0.86, at))
            .await
            .unwrap();

        let samples = store
            .samples_since("EUR", "GBP", at - Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(samples.len(), 2);
        let latest = store.latest_ever("EUR", "GBP").await.unwrap().unwrap();
        assert_eq!(latest.rate, 0.86);
    }

    #[tokio::test]
    async fn test_disk_store_prefix_does_not_leak_between_pairs() {
        let dir = tempdir().unwrap();
        let store = DiskRateStore::open(dir.path()).unwrap();

        store
            .append(RateSample::observed_now("USD", "EURX", 2.0))
            .await
            .unwrap();

        assert!(store.latest_ever("USD", "EUR").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disk_store_codes_with_separators_stay_apart() {
        let dir = tempdir().unwrap();
        let store = DiskRateStore::open(dir.path()).unwrap();

        store
            .append(RateSample::observed_now("USD/EUR", "X", 42.0))
            .await
            .unwrap();
        store
            .append(RateSample::observed_now("USD", "EUR/X", 43.0))
            .await
            .unwrap();

        assert!(store.latest_ever("USD", "EUR").await.unwrap().is_none());
        assert!(
            store
                .samples_since("USD", "EUR", DateTime::<Utc>::UNIX_EPOCH)
                .await
                .unwrap()
                .is_empty()
        );
        let latest = store.latest_ever("USD/EUR", "X").await.unwrap().unwrap();
        assert_eq!(latest.rate, 42.0);
        let latest = store.latest_ever("USD", "EUR/X").await.unwrap().unwrap();
        assert_eq!(latest.rate, 43.0);
    }

    #[tokio::test]
    async fn test_disk_store_concurrent_appends() {
        let dir = tempdir().unwrap();
        let store = Arc::new(DiskRateStore::open(dir.path()).unwrap());
        let at = Utc::now();

        let appends = (0..16).map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .append(RateSample::new("USD", "JPY", 150.0 + f64::from(i), at))
                    .await
            })
        });
        for result in join_all(appends).await {
            result.unwrap().unwrap();
        }

        let samples = store
            .samples_since("USD", "JPY", at - Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(samples.len(), 16);
        assert!(store.latest_ever("USD", "JPY").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_disk_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = DiskRateStore::open(dir.path()).unwrap();
            store
                .append(RateSample::observed_now("USD", "INR", 83.2))
                .await
                .unwrap();
        }

        let store = DiskRateStore::open(dir.path()).unwrap();
        let latest = store.latest_ever("USD", "INR").await.unwrap().unwrap();
        assert_eq!(latest.rate, 83.2);
    }

    #[test]
    fn test_sortable_micros_orders_chronologically() {
        let epoch = DateTime::<Utc>::UNIX_EPOCH;
        let before = epoch - Duration::days(1);
        let after = epoch + Duration::days(1);
        assert!(sortable_micros(&before) < sortable_micros(&epoch));
        assert!(sortable_micros(&epoch) < sortable_micros(&after));
    }
}

pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::RateStore;
use disk::DiskRateStore;
use memory::MemoryRateStore;
use std::sync::Arc;
use tracing::warn;

/// Opens the durable rate ledger under the configured data directory.
///
/// Falls back to an in-memory ledger when the directory cannot be determined or
/// opened, so rate resolution keeps working without history.
pub fn open_rate_store(config: &AppConfig) -> Arc<dyn RateStore> {
    let disk = config
        .data_path()
        .and_then(|path| DiskRateStore::open(&path.join("rates")));

    match disk {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, "Rate store unavailable, using in-memory store");
            Arc::new(MemoryRateStore::new())
        }
    }
}

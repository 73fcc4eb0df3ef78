//! CEP monitor service: statistics over a historical store, with a
//! per-quantity cache invalidated by every accepted mutation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::error::{CepError, CepResult};
use crate::monitor::{compute_statistics, sort_newest_first, CepChart, CepStatistics};
use crate::sample::{CepSample, FieldChange, SampleId};
use crate::store::HistoricalStore;

#[derive(Default)]
struct StatsCache {
    /// Bumped by every mutation; a computation started under an older
    /// generation is not cached.
    generation: u64,
    entries: HashMap<String, Option<CepStatistics>>,
}

pub struct CepMonitor {
    store: Arc<dyn HistoricalStore>,
    cache: RwLock<StatsCache>,
}

impl CepMonitor {
    pub fn new(store: Arc<dyn HistoricalStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(StatsCache::default()),
        }
    }

    pub fn store(&self) -> &Arc<dyn HistoricalStore> {
        &self.store
    }

    /// Samples ordered newest first.
    pub fn samples(&self) -> CepResult<Vec<CepSample>> {
        let mut samples = self.store.list_samples()?;
        sort_newest_first(&mut samples);
        Ok(samples)
    }

    /// Statistics for `quantity`; `None` means insufficient history.
    pub fn statistics(&self, quantity: &str) -> CepResult<Option<CepStatistics>> {
        let generation = {
            let cache = self.cache.read().map_err(|_| CepError::LockPoisoned)?;
            if let Some(hit) = cache.entries.get(quantity) {
                return Ok(hit.clone());
            }
            cache.generation
        };

        let stats = compute_statistics(&self.samples()?, quantity);

        let mut cache = self.cache.write().map_err(|_| CepError::LockPoisoned)?;
        if cache.generation == generation {
            cache.entries.insert(quantity.to_string(), stats.clone());
        }
        Ok(stats)
    }

    pub fn chart(&self, quantity: &str) -> CepResult<CepChart> {
        Ok(CepChart::build(&self.samples()?, quantity))
    }

    pub fn ingest(&self, sample: CepSample) -> CepResult<()> {
        let id = sample.id;
        self.store.insert_sample(sample)?;
        self.invalidate_all()?;
        debug!(sample = %id, "Ingested sample");
        Ok(())
    }

    /// Audited edit; drops cached statistics of every changed quantity.
    pub fn edit_sample(
        &self,
        id: SampleId,
        changes: &[FieldChange],
        reason: &str,
    ) -> CepResult<CepSample> {
        let updated = match self.store.append_edit(id, changes, reason) {
            Ok(sample) => sample,
            Err(e) => {
                warn!(sample = %id, error = %e, "Edit rejected");
                return Err(e);
            }
        };

        let mut cache = self.cache.write().map_err(|_| CepError::LockPoisoned)?;
        cache.generation += 1;
        for change in changes {
            cache.entries.remove(&change.name);
        }
        Ok(updated)
    }

    pub fn clear(&self) -> CepResult<usize> {
        let removed = self.store.clear()?;
        self.invalidate_all()?;
        Ok(removed)
    }

    /// Quantities with cached statistics, sorted.
    pub fn cached_quantities(&self) -> CepResult<Vec<String>> {
        let cache = self.cache.read().map_err(|_| CepError::LockPoisoned)?;
        let mut names: Vec<String> = cache.entries.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn invalidate_all(&self) -> CepResult<()> {
        let mut cache = self.cache.write().map_err(|_| CepError::LockPoisoned)?;
        cache.generation += 1;
        cache.entries.clear();
        Ok(())
    }
}

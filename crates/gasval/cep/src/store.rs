//! Historical sample stores.
//!
//! Provides the `HistoricalStore` trait and two implementations:
//! `InMemoryStore` (tests, embedding) and `JsonFileStore`, which keeps all
//! samples in a single JSON document.
//!
//! Edits are read-modify-append sequences. Both stores serialize them behind
//! a single writer lock; readers see a complete snapshot.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{CepError, CepResult};
use crate::sample::{CepSample, FieldChange, SampleId};

/// Storage collaborator of the CEP monitor.
///
/// `list_samples` returns storage order; callers sort with
/// [`sort_newest_first`](crate::monitor::sort_newest_first).
pub trait HistoricalStore: Send + Sync {
    fn list_samples(&self) -> CepResult<Vec<CepSample>>;

    fn get_sample(&self, id: SampleId) -> CepResult<CepSample>;

    /// Ingest a completed report. Rejects duplicate ids.
    fn insert_sample(&self, sample: CepSample) -> CepResult<()>;

    /// Apply `changes` atomically and append the audit entry.
    ///
    /// `reason` is mandatory; returns the updated sample.
    fn append_edit(
        &self,
        id: SampleId,
        changes: &[FieldChange],
        reason: &str,
    ) -> CepResult<CepSample>;

    /// Administrative bulk clear. Returns the number of samples removed.
    fn clear(&self) -> CepResult<usize>;
}

fn insert_into(samples: &mut Vec<CepSample>, sample: CepSample) -> CepResult<()> {
    sample.validate()?;
    if samples.iter().any(|s| s.id == sample.id) {
        return Err(CepError::DuplicateSample(sample.id));
    }
    samples.push(sample);
    Ok(())
}

fn edit_in(
    samples: &mut [CepSample],
    id: SampleId,
    changes: &[FieldChange],
    reason: &str,
) -> CepResult<CepSample> {
    let sample = samples
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or(CepError::SampleNotFound(id))?;
    let record = sample.apply_edit(changes, reason, Utc::now())?;
    info!(
        sample = %id,
        fields = ?record.changed_fields,
        reason = %record.reason,
        "Applied audited edit"
    );
    Ok(sample.clone())
}

// ── In-memory store ─────────────────────────────────────────────────────

/// Store held in memory.
#[derive(Default)]
pub struct InMemoryStore {
    samples: RwLock<Vec<CepSample>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(samples: Vec<CepSample>) -> CepResult<Self> {
        let store = Self::new();
        for sample in samples {
            store.insert_sample(sample)?;
        }
        Ok(store)
    }
}

impl HistoricalStore for InMemoryStore {
    fn list_samples(&self) -> CepResult<Vec<CepSample>> {
        let samples = self.samples.read().map_err(|_| CepError::LockPoisoned)?;
        Ok(samples.clone())
    }

    fn get_sample(&self, id: SampleId) -> CepResult<CepSample> {
        let samples = self.samples.read().map_err(|_| CepError::LockPoisoned)?;
        samples
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(CepError::SampleNotFound(id))
    }

    fn insert_sample(&self, sample: CepSample) -> CepResult<()> {
        let mut samples = self.samples.write().map_err(|_| CepError::LockPoisoned)?;
        insert_into(&mut samples, sample)
    }

    fn append_edit(
        &self,
        id: SampleId,
        changes: &[FieldChange],
        reason: &str,
    ) -> CepResult<CepSample> {
        let mut samples = self.samples.write().map_err(|_| CepError::LockPoisoned)?;
        edit_in(&mut samples, id, changes, reason)
    }

    fn clear(&self) -> CepResult<usize> {
        let mut samples = self.samples.write().map_err(|_| CepError::LockPoisoned)?;
        let removed = samples.len();
        samples.clear();
        warn!(removed, "Cleared historical store");
        Ok(removed)
    }
}

// ── JSON file store ─────────────────────────────────────────────────────

/// JSON-file based store.
///
/// All samples live in one JSON array. Writes are atomic (write to `.tmp`,
/// then rename) so readers never observe a half-written document, and every
/// mutation holds the write lock across its load-modify-save.
///
/// The lock is per instance: two processes sharing a file are not
/// serialized against each other.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> CepResult<Vec<CepSample>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, samples: &[CepSample]) -> CepResult<()> {
        let json = serde_json::to_string_pretty(samples)
            .map_err(|e| CepError::Persistence(format!("serialization failed: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), samples = samples.len(), "Saved historical store");
        Ok(())
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<CepSample>) -> CepResult<T>) -> CepResult<T> {
        let _guard = self.write_lock.lock().map_err(|_| CepError::LockPoisoned)?;
        let mut samples = self.load()?;
        let out = f(&mut samples)?;
        self.save(&samples)?;
        Ok(out)
    }
}

impl HistoricalStore for JsonFileStore {
    fn list_samples(&self) -> CepResult<Vec<CepSample>> {
        self.load()
    }

    fn get_sample(&self, id: SampleId) -> CepResult<CepSample> {
        self.load()?
            .into_iter()
            .find(|s| s.id == id)
            .ok_or(CepError::SampleNotFound(id))
    }

    fn insert_sample(&self, sample: CepSample) -> CepResult<()> {
        self.mutate(|samples| insert_into(samples, sample))
    }

    fn append_edit(
        &self,
        id: SampleId,
        changes: &[FieldChange],
        reason: &str,
    ) -> CepResult<CepSample> {
        self.mutate(|samples| edit_in(samples, id, changes, reason))
    }

    fn clear(&self) -> CepResult<usize> {
        let removed = self.mutate(|samples| {
            let removed = samples.len();
            samples.clear();
            Ok(removed)
        })?;
        warn!(path = %self.path.display(), removed, "Cleared historical store");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_sample(bulletin: &str, day: u32, methane: f64) -> CepSample {
        CepSample::new(bulletin, NaiveDate::from_ymd_opt(2024, 2, day).unwrap())
            .with_component("methane", methane)
            .with_property("fatorCompressibilidade", 0.998)
    }

    fn temp_store_path(prefix: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("{}_{}", prefix, uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("samples.json");
        (dir, path)
    }

    #[test]
    fn in_memory_insert_get_and_list() {
        let store = InMemoryStore::new();
        let s = make_sample("B-1", 1, 90.0);
        let id = s.id;
        store.insert_sample(s).unwrap();

        assert_eq!(store.get_sample(id).unwrap().bulletin_number, "B-1");
        assert_eq!(store.list_samples().unwrap().len(), 1);
        assert!(matches!(
            store.get_sample(SampleId::new()),
            Err(CepError::SampleNotFound(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let store = InMemoryStore::new();
        let s = make_sample("B-1", 1, 90.0);
        store.insert_sample(s.clone()).unwrap();
        assert!(matches!(
            store.insert_sample(s),
            Err(CepError::DuplicateSample(_))
        ));
    }

    #[test]
    fn edit_without_reason_is_rejected_by_store() {
        let store = InMemoryStore::new();
        let s = make_sample("B-1", 1, 90.0);
        let id = s.id;
        store.insert_sample(s).unwrap();

        let change = [FieldChange::property("fatorCompressibilidade", 0.95)];
        assert!(matches!(
            store.append_edit(id, &change, ""),
            Err(CepError::MissingReason)
        ));
        let stored = store.get_sample(id).unwrap();
        assert_eq!(stored.value_of("fatorCompressibilidade"), Some(0.998));
        assert!(stored.edit_history.is_empty());
    }

    #[test]
    fn edit_unknown_sample_fails() {
        let store = InMemoryStore::new();
        let change = [FieldChange::component("methane", 90.0)];
        assert!(matches!(
            store.append_edit(SampleId::new(), &change, "fix"),
            Err(CepError::SampleNotFound(_))
        ));
    }

    #[test]
    fn clear_removes_everything() {
        let store =
            InMemoryStore::with_samples(vec![make_sample("B-1", 1, 90.0), make_sample("B-2", 2, 91.0)])
                .unwrap();
        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.list_samples().unwrap().is_empty());
    }

    #[test]
    fn json_store_persists_edits_across_instances() {
        let (dir, path) = temp_store_path("cep_store_test");

        let store = JsonFileStore::new(&path);
        let s = make_sample("B-1", 1, 90.0);
        let id = s.id;
        store.insert_sample(s).unwrap();
        store
            .append_edit(id, &[FieldChange::component("methane", 90.5)], "re-integration")
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        let loaded = reopened.get_sample(id).unwrap();
        assert_eq!(loaded.value_of("methane"), Some(90.5));
        assert_eq!(loaded.edit_history.len(), 1);
        assert_eq!(loaded.edit_history[0].reason, "re-integration");
        assert!(!path.with_extension("tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_store_missing_file_is_empty() {
        let (dir, path) = temp_store_path("cep_store_empty");
        let store = JsonFileStore::new(&path);
        assert!(store.list_samples().unwrap().is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_store_corrupt_document_is_an_error() {
        let (dir, path) = temp_store_path("cep_store_corrupt");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.list_samples(), Err(CepError::Persistence(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn store_trait_object() {
        let store: Box<dyn HistoricalStore> = Box::new(InMemoryStore::new());
        store.insert_sample(make_sample("B-9", 9, 88.0)).unwrap();
        assert_eq!(store.list_samples().unwrap().len(), 1);
    }
}

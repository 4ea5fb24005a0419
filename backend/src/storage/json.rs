//! # JSON Document Store
//!
//! File-based implementation of [`DatasetStorage`] holding the whole dataset
//! in a single JSON document:
//!
//! ```json
//! {
//!     "kids": [
//!         { "id": "kid_a1b2c3d4e5f6", "name": "Mia", "allocation": { "spent": 40.0, "saved": 40.0, "given": 20.0 }, "interestRate": 2.0, "entries": [] }
//!     ],
//!     "settings": { "period": "monthly", "currency": "EUR" }
//! }
//! ```
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write never leaves a torn document behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use shared::Dataset;
use tracing::debug;

use crate::storage::traits::DatasetStorage;

/// JSON-file dataset store.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DatasetStorage for JsonStore {
    fn load(&self) -> Result<Dataset> {
        if !self.path.exists() {
            debug!("No data file at {}, starting empty", self.path.display());
            return Ok(Dataset::default());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read data file {}", self.path.display()))?;
        let dataset = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse data file {}", self.path.display()))?;
        Ok(dataset)
    }

    fn store(&self, dataset: &Dataset) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create data directory {}", parent.display())
                })?;
            }
        }

        let contents = serde_json::to_string_pretty(dataset)
            .context("Failed to serialize dataset")?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write temp file {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to move temp file into place at {}", self.path.display())
        })?;

        debug!("Persisted dataset to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Kid, PeriodType, Settings};

    fn store_in(dir: &tempfile::TempDir) -> JsonStore {
        JsonStore::new(dir.path().join("data.json"))
    }

    #[test]
    fn missing_file_loads_as_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let dataset = store.load().unwrap();
        assert!(dataset.kids.is_empty());
        assert_eq!(dataset.settings, Settings::default());
    }

    #[test]
    fn dataset_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut dataset = Dataset::default();
        dataset.kids.push(Kid {
            id: "kid_a1b2c3d4e5f6".to_string(),
            name: "Mia".to_string(),
            allocation: Default::default(),
            interest_rate: 2.0,
            entries: vec![],
        });
        dataset.settings.period = PeriodType::Weekly;

        store.store(&dataset).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn store_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/dir/data.json"));
        store.store(&Dataset::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn store_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.store(&Dataset::default()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec!["data.json"]);
    }

    #[test]
    fn corrupt_file_surfaces_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "not json {").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn camel_case_document_format_is_read_back() {
        // Format compatibility with the original data files.
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{
                "kids": [{
                    "id": "kid_000000000001",
                    "name": "Leo",
                    "allocation": {"spent": 50.0, "saved": 30.0, "given": 20.0},
                    "interestRate": 1.5,
                    "entries": [{
                        "id": "entry_000000000001",
                        "period": "2024-03",
                        "periodType": "monthly",
                        "amount": 10.0,
                        "spentPercent": 50.0,
                        "savedPercent": 30.0,
                        "givenPercent": 20.0,
                        "spent": 5.0,
                        "saved": 3.0,
                        "given": 2.0,
                        "interestRate": 1.5,
                        "usedFromSaved": 0.0,
                        "createdAt": "2024-03-01T00:00:00+00:00"
                    }]
                }],
                "settings": {"period": "monthly", "currency": "EUR"}
            }"#,
        )
        .unwrap();

        let dataset = store.load().unwrap();
        let kid = &dataset.kids[0];
        assert_eq!(kid.interest_rate, 1.5);
        let entry = &kid.entries[0];
        assert_eq!(entry.period, "2024-03");
        assert_eq!(entry.period_type, PeriodType::Monthly);
        assert_eq!(entry.used_from_saved, 0.0);
        assert_eq!(entry.updated_at, None);
    }
}

//! Storage abstraction for the persisted dataset.

use anyhow::Result;
use shared::Dataset;

/// Load and store the whole dataset document.
///
/// The dataset is small (entry counts are bounded by a human's data-entry
/// rate), so every operation reads and writes the full document rather than
/// maintaining incremental state on disk.
pub trait DatasetStorage: Send + Sync + 'static {
    /// Load the full dataset, or its default shape if nothing was persisted
    /// yet.
    fn load(&self) -> Result<Dataset>;

    /// Persist the full dataset atomically: either the new document is fully
    /// visible afterwards or the old one is untouched.
    fn store(&self, dataset: &Dataset) -> Result<()>;
}

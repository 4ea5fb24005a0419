//! Domain layer: the ledger engine, period codec, and the services that
//! validate and apply mutations to the dataset.

pub mod child_service;
pub mod commands;
pub mod entry_service;
pub mod errors;
pub mod ledger;
pub mod period;
pub mod settings_service;

use shared::{Dataset, Kid};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Allocation percentages must total 100 within this tolerance.
pub(crate) const ALLOCATION_TOLERANCE: f64 = 0.01;

/// IDs follow the document format "<prefix>_<12 hex chars>".
pub(crate) fn generate_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &hex[..12])
}

pub(crate) fn find_kid<'a>(dataset: &'a Dataset, kid_id: &str) -> Result<&'a Kid, DomainError> {
    dataset
        .kids
        .iter()
        .find(|k| k.id == kid_id)
        .ok_or_else(|| DomainError::not_found(format!("Child not found: {kid_id}")))
}

pub(crate) fn find_kid_mut<'a>(
    dataset: &'a mut Dataset,
    kid_id: &str,
) -> Result<&'a mut Kid, DomainError> {
    dataset
        .kids
        .iter_mut()
        .find(|k| k.id == kid_id)
        .ok_or_else(|| DomainError::not_found(format!("Child not found: {kid_id}")))
}

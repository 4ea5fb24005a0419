//! Commands and results for entry management.
//!
//! Every mutating result carries the recomputed ledger so callers never need
//! a second round trip to display fresh totals.

use serde::Serialize;
use shared::Entry;

use crate::domain::ledger::LedgerReport;

#[derive(Debug, Clone)]
pub struct AddEntryCommand {
    pub kid_id: String,
    /// Period key; the period type is derived from it
    pub period: String,
    pub amount: f64,
    /// Defaults to the kid's allocation when None
    pub spent_percent: Option<f64>,
    pub saved_percent: Option<f64>,
    pub given_percent: Option<f64>,
    /// Defaults to the kid's interest rate when None
    pub interest_rate: Option<f64>,
    /// Defaults to 0 when None
    pub used_from_saved: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct UpdateEntryCommand {
    pub kid_id: String,
    pub entry_id: String,
    pub amount: f64,
    pub spent_percent: f64,
    pub saved_percent: f64,
    pub given_percent: f64,
    pub interest_rate: f64,
    pub used_from_saved: f64,
    /// Keeps the existing period when None
    pub period: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeleteEntryCommand {
    pub kid_id: String,
    pub entry_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddEntryResult {
    pub entry: Entry,
    pub ledger: LedgerReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateEntryResult {
    pub entry: Entry,
    pub ledger: LedgerReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteEntryResult {
    pub ledger: LedgerReport,
}

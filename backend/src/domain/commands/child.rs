//! Commands and results for child management.

use serde::Serialize;
use shared::{Allocation, Kid};

use crate::domain::ledger::{AnnotatedEntry, LedgerTotals};

#[derive(Debug, Clone)]
pub struct CreateChildCommand {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UpdateChildCommand {
    pub kid_id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct DeleteChildCommand {
    pub kid_id: String,
}

#[derive(Debug, Clone)]
pub struct GetChildCommand {
    pub kid_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateAllocationCommand {
    pub kid_id: String,
    pub spent: f64,
    pub saved: f64,
    pub given: f64,
    pub interest_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateChildResult {
    pub kid: Kid,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateChildResult {
    pub kid: Kid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteChildResult {
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateAllocationResult {
    pub kid: Kid,
}

/// One child as shown on the overview list: identity plus current totals,
/// no entry detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KidSummary {
    pub id: String,
    pub name: String,
    pub allocation: Allocation,
    pub interest_rate: f64,
    pub totals: LedgerTotals,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListChildrenResult {
    pub kids: Vec<KidSummary>,
}

/// One child in full: identity, totals, and the annotated entry history in
/// chronological order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KidDetail {
    pub id: String,
    pub name: String,
    pub allocation: Allocation,
    pub interest_rate: f64,
    pub totals: LedgerTotals,
    pub entries: Vec<AnnotatedEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetChildResult {
    pub kid: KidDetail,
}

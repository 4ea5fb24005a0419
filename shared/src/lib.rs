//! Wire and document types shared across the pocket-money tracker.
//!
//! Everything here serializes with camelCase keys so the persisted
//! `data.json` document and the HTTP payloads share one shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How often pocket money is handed out. Stored on each entry for display
/// purposes; the ledger itself only ever orders by the period key string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PeriodType::Weekly => "weekly",
            PeriodType::Biweekly => "biweekly",
            PeriodType::Monthly => "monthly",
            PeriodType::Quarterly => "quarterly",
        };
        write!(f, "{}", s)
    }
}

/// Default spend/save/give split applied to new entries, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub spent: f64,
    pub saved: f64,
    pub given: f64,
}

impl Default for Allocation {
    fn default() -> Self {
        Self {
            spent: 40.0,
            saved: 40.0,
            given: 20.0,
        }
    }
}

impl Allocation {
    /// Sum of the three percentages; valid allocations total 100 (±0.01).
    pub fn total(&self) -> f64 {
        self.spent + self.saved + self.given
    }
}

/// One period's pocket-money contribution for a kid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Entry ID in format: "entry_<12 hex chars>"
    pub id: String,
    /// Sortable period key, e.g. "2024-03", "2024-W07", "2024-BW04", "2024-Q2"
    pub period: String,
    pub period_type: PeriodType,
    /// Gross contribution for the period (positive)
    pub amount: f64,
    pub spent_percent: f64,
    pub saved_percent: f64,
    pub given_percent: f64,
    /// amount × spentPercent / 100, rounded to cents at write time
    pub spent: f64,
    pub saved: f64,
    pub given: f64,
    /// Interest in percent applied to the saved balance carried into this
    /// period, before this period's own contribution lands
    #[serde(default)]
    pub interest_rate: f64,
    /// Amount withdrawn from savings during this period
    #[serde(default)]
    pub used_from_saved: f64,
    /// RFC 3339 creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// RFC 3339 timestamp of the last edit, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A child and their entry history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kid {
    /// Kid ID in format: "kid_<12 hex chars>"
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub allocation: Allocation,
    /// Default interest rate for new entries, in percent
    #[serde(default)]
    pub interest_rate: f64,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Global application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub period: PeriodType,
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            period: PeriodType::Monthly,
            currency: "EUR".to_string(),
        }
    }
}

/// The whole persisted document: every kid plus the global settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub kids: Vec<Kid>,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAllocationRequest {
    pub spent: f64,
    pub saved: f64,
    pub given: f64,
    pub interest_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryRequest {
    /// Period key for the new entry; the period type is derived from it
    pub period: String,
    pub amount: f64,
    /// Percentage overrides; the kid's default allocation applies when omitted
    pub spent_percent: Option<f64>,
    pub saved_percent: Option<f64>,
    pub given_percent: Option<f64>,
    /// Interest rate override; the kid's default rate applies when omitted
    pub interest_rate: Option<f64>,
    /// Withdrawal from savings this period, defaults to 0
    pub used_from_saved: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub amount: f64,
    pub spent_percent: f64,
    pub saved_percent: f64,
    pub given_percent: f64,
    pub interest_rate: f64,
    pub used_from_saved: f64,
    /// New period key; keeps the existing period when omitted
    pub period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    pub period: Option<PeriodType>,
    pub currency: Option<String>,
}

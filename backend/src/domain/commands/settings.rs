//! Commands and results for the global settings.

use serde::Serialize;
use shared::{PeriodType, Settings};

#[derive(Debug, Clone)]
pub struct UpdateSettingsCommand {
    pub period: Option<PeriodType>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetSettingsResult {
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateSettingsResult {
    pub settings: Settings,
}

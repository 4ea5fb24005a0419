//! Global settings: the default period type and display currency.

use std::sync::Arc;

use shared::Settings;
use tracing::info;

use crate::domain::commands::settings::{
    GetSettingsResult, UpdateSettingsCommand, UpdateSettingsResult,
};
use crate::domain::errors::DomainError;
use crate::storage::{DatasetHandle, DatasetStorage};

/// Service for the global application settings.
pub struct SettingsService<S: DatasetStorage> {
    handle: Arc<DatasetHandle<S>>,
}

impl<S: DatasetStorage> Clone for SettingsService<S> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<S: DatasetStorage> SettingsService<S> {
    pub fn new(handle: Arc<DatasetHandle<S>>) -> Self {
        Self { handle }
    }

    pub fn get_settings(&self) -> Result<GetSettingsResult, DomainError> {
        let dataset = self.handle.read()?;
        Ok(GetSettingsResult {
            settings: dataset.settings,
        })
    }

    /// Update period type and/or currency; omitted fields keep their value.
    pub fn update_settings(
        &self,
        command: UpdateSettingsCommand,
    ) -> Result<UpdateSettingsResult, DomainError> {
        info!(
            "Updating settings: period={:?}, currency={:?}",
            command.period, command.currency
        );

        if let Some(ref currency) = command.currency {
            if currency.trim().is_empty() {
                return Err(DomainError::validation("Currency cannot be empty"));
            }
        }

        let settings = self.handle.transact(|dataset| {
            if let Some(period) = command.period {
                dataset.settings.period = period;
            }
            if let Some(ref currency) = command.currency {
                dataset.settings.currency = currency.trim().to_string();
            }
            Ok(dataset.settings.clone())
        })?;

        Ok(UpdateSettingsResult { settings })
    }
}

//! Entry management for the pocket-money tracker.
//!
//! Every mutation re-validates against the ledger recomputed from the full
//! entry history: the hypothetical entry list (with the mutation applied) is
//! folded once, and each entry's withdrawal is checked against the balance
//! that was actually available at its chronological slot. Because the
//! per-entry ceiling (`available_saved_before`) never includes that entry's
//! own withdrawal, a no-op update can never block itself on its own prior
//! withdrawal.

use std::sync::Arc;

use chrono::Utc;
use shared::Entry;
use tracing::info;

use crate::domain::commands::entry::{
    AddEntryCommand, AddEntryResult, DeleteEntryCommand, DeleteEntryResult, UpdateEntryCommand,
    UpdateEntryResult,
};
use crate::domain::errors::DomainError;
use crate::domain::ledger::{check_withdrawals, compute_ledger, round_cents, LedgerReport};
use crate::domain::period::Period;
use crate::domain::{find_kid_mut, generate_id, ALLOCATION_TOLERANCE};
use crate::storage::{DatasetHandle, DatasetStorage};

/// Service for managing a child's pocket-money entries.
pub struct EntryService<S: DatasetStorage> {
    handle: Arc<DatasetHandle<S>>,
}

impl<S: DatasetStorage> Clone for EntryService<S> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<S: DatasetStorage> EntryService<S> {
    pub fn new(handle: Arc<DatasetHandle<S>>) -> Self {
        Self { handle }
    }

    /// Add a new entry for a child. Percentages and interest rate default to
    /// the child's configured values when omitted.
    pub fn add_entry(&self, command: AddEntryCommand) -> Result<AddEntryResult, DomainError> {
        info!(
            "Adding entry for child {} in period {}",
            command.kid_id, command.period
        );

        let period = Period::parse(&command.period)?;

        self.handle.transact(|dataset| {
            let kid = find_kid_mut(dataset, &command.kid_id)?;

            if kid.entries.iter().any(|e| e.period == command.period) {
                return Err(DomainError::conflict(format!(
                    "An entry for period {} already exists for {}",
                    command.period, kid.name
                )));
            }

            let spent_percent = command.spent_percent.unwrap_or(kid.allocation.spent);
            let saved_percent = command.saved_percent.unwrap_or(kid.allocation.saved);
            let given_percent = command.given_percent.unwrap_or(kid.allocation.given);
            let interest_rate = command.interest_rate.unwrap_or(kid.interest_rate);
            let used_from_saved = command.used_from_saved.unwrap_or(0.0);

            validate_entry_values(
                command.amount,
                spent_percent,
                saved_percent,
                given_percent,
                interest_rate,
                used_from_saved,
            )?;

            let (spent, saved, given) =
                split_buckets(command.amount, spent_percent, saved_percent, given_percent);
            let entry = Entry {
                id: generate_id("entry"),
                period: command.period.clone(),
                period_type: period.period_type(),
                amount: command.amount,
                spent_percent,
                saved_percent,
                given_percent,
                spent,
                saved,
                given,
                interest_rate,
                used_from_saved: round_cents(used_from_saved),
                created_at: Utc::now().to_rfc3339(),
                updated_at: None,
            };

            let report = ledger_with(&kid.entries, |entries| entries.push(entry.clone()))?;
            kid.entries.push(entry.clone());

            info!("Added entry {} for child {}", entry.id, kid.id);
            Ok(AddEntryResult {
                entry,
                ledger: report,
            })
        })
    }

    /// Update an existing entry, optionally moving it to another period.
    pub fn update_entry(
        &self,
        command: UpdateEntryCommand,
    ) -> Result<UpdateEntryResult, DomainError> {
        info!(
            "Updating entry {} for child {}",
            command.entry_id, command.kid_id
        );

        let new_period = command.period.as_deref().map(Period::parse).transpose()?;

        self.handle.transact(|dataset| {
            let kid = find_kid_mut(dataset, &command.kid_id)?;
            let index = kid
                .entries
                .iter()
                .position(|e| e.id == command.entry_id)
                .ok_or_else(|| {
                    DomainError::not_found(format!("Entry not found: {}", command.entry_id))
                })?;

            validate_entry_values(
                command.amount,
                command.spent_percent,
                command.saved_percent,
                command.given_percent,
                command.interest_rate,
                command.used_from_saved,
            )?;

            let mut updated = kid.entries[index].clone();
            if let (Some(key), Some(period)) = (command.period.as_ref(), new_period) {
                // Moving to a new period must not collide with another entry;
                // keeping the current key is always allowed.
                if *key != updated.period {
                    let taken = kid
                        .entries
                        .iter()
                        .any(|e| e.id != command.entry_id && e.period == *key);
                    if taken {
                        return Err(DomainError::conflict(format!(
                            "An entry for period {} already exists for {}",
                            key, kid.name
                        )));
                    }
                }
                updated.period = key.clone();
                updated.period_type = period.period_type();
            }

            let (spent, saved, given) = split_buckets(
                command.amount,
                command.spent_percent,
                command.saved_percent,
                command.given_percent,
            );
            updated.amount = command.amount;
            updated.spent_percent = command.spent_percent;
            updated.saved_percent = command.saved_percent;
            updated.given_percent = command.given_percent;
            updated.spent = spent;
            updated.saved = saved;
            updated.given = given;
            updated.interest_rate = command.interest_rate;
            updated.used_from_saved = round_cents(command.used_from_saved);
            updated.updated_at = Some(Utc::now().to_rfc3339());

            let report = ledger_with(&kid.entries, |entries| {
                entries[index] = updated.clone();
            })?;
            kid.entries[index] = updated.clone();

            info!("Updated entry {} for child {}", updated.id, kid.id);
            Ok(UpdateEntryResult {
                entry: updated,
                ledger: report,
            })
        })
    }

    /// Delete an entry outright. Later withdrawals are not re-validated; a
    /// delete that strands one shows up as a negative running balance on the
    /// next read rather than blocking the delete.
    pub fn delete_entry(
        &self,
        command: DeleteEntryCommand,
    ) -> Result<DeleteEntryResult, DomainError> {
        info!(
            "Deleting entry {} for child {}",
            command.entry_id, command.kid_id
        );

        self.handle.transact(|dataset| {
            let kid = find_kid_mut(dataset, &command.kid_id)?;
            let before = kid.entries.len();
            kid.entries.retain(|e| e.id != command.entry_id);
            if kid.entries.len() == before {
                return Err(DomainError::not_found(format!(
                    "Entry not found: {}",
                    command.entry_id
                )));
            }
            Ok(DeleteEntryResult {
                ledger: compute_ledger(&kid.entries),
            })
        })
    }
}

/// Compute and validate the ledger for a hypothetical entry list: the
/// current entries with `apply` applied. The returned report is exactly what
/// the ledger will look like once the mutation is persisted.
fn ledger_with(
    entries: &[Entry],
    apply: impl FnOnce(&mut Vec<Entry>),
) -> Result<LedgerReport, DomainError> {
    let mut candidate = entries.to_vec();
    apply(&mut candidate);
    let report = compute_ledger(&candidate);
    check_withdrawals(&report)?;
    Ok(report)
}

fn split_buckets(amount: f64, spent_pct: f64, saved_pct: f64, given_pct: f64) -> (f64, f64, f64) {
    (
        round_cents(amount * spent_pct / 100.0),
        round_cents(amount * saved_pct / 100.0),
        round_cents(amount * given_pct / 100.0),
    )
}

fn validate_entry_values(
    amount: f64,
    spent_pct: f64,
    saved_pct: f64,
    given_pct: f64,
    interest_rate: f64,
    used_from_saved: f64,
) -> Result<(), DomainError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(DomainError::validation("Amount must be greater than 0"));
    }
    if spent_pct < 0.0 || saved_pct < 0.0 || given_pct < 0.0 {
        return Err(DomainError::validation(
            "Allocation percentages cannot be negative",
        ));
    }
    let total = spent_pct + saved_pct + given_pct;
    if !total.is_finite() || (total - 100.0).abs() > ALLOCATION_TOLERANCE {
        return Err(DomainError::validation(format!(
            "Allocation must total 100%, got {total:.2}%"
        )));
    }
    if !interest_rate.is_finite() || interest_rate < 0.0 {
        return Err(DomainError::validation("Interest rate cannot be negative"));
    }
    if !used_from_saved.is_finite() || used_from_saved < 0.0 {
        return Err(DomainError::validation(
            "Used from Saved cannot be negative",
        ));
    }
    Ok(())
}

// Used by child_service for allocation updates as well.
pub(crate) fn validate_allocation(
    spent: f64,
    saved: f64,
    given: f64,
    interest_rate: f64,
) -> Result<(), DomainError> {
    if spent < 0.0 || saved < 0.0 || given < 0.0 {
        return Err(DomainError::validation(
            "Allocation percentages cannot be negative",
        ));
    }
    let total = spent + saved + given;
    if !total.is_finite() || (total - 100.0).abs() > ALLOCATION_TOLERANCE {
        return Err(DomainError::validation(format!(
            "Allocation must total 100%, got {total:.2}%"
        )));
    }
    if !interest_rate.is_finite() || interest_rate < 0.0 {
        return Err(DomainError::validation("Interest rate cannot be negative"));
    }
    Ok(())
}

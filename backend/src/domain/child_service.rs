//! Child management for the pocket-money tracker.
//!
//! Reads always recompute totals from the full entry history via the ledger
//! engine; nothing derived is ever read back from storage.

use std::sync::Arc;

use shared::{Allocation, Kid};
use tracing::{info, warn};

use crate::domain::commands::child::{
    CreateChildCommand, CreateChildResult, DeleteChildCommand, DeleteChildResult, GetChildCommand,
    GetChildResult, KidDetail, KidSummary, ListChildrenResult, UpdateAllocationCommand,
    UpdateAllocationResult, UpdateChildCommand, UpdateChildResult,
};
use crate::domain::entry_service::validate_allocation;
use crate::domain::errors::DomainError;
use crate::domain::ledger::compute_ledger;
use crate::domain::{find_kid, find_kid_mut, generate_id};
use crate::storage::{DatasetHandle, DatasetStorage};

/// Service for managing children.
pub struct ChildService<S: DatasetStorage> {
    handle: Arc<DatasetHandle<S>>,
}

impl<S: DatasetStorage> Clone for ChildService<S> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
        }
    }
}

impl<S: DatasetStorage> ChildService<S> {
    pub fn new(handle: Arc<DatasetHandle<S>>) -> Self {
        Self { handle }
    }

    /// Create a new child with the default 40/40/20 allocation and no
    /// interest.
    pub fn create_child(
        &self,
        command: CreateChildCommand,
    ) -> Result<CreateChildResult, DomainError> {
        info!("Creating child: name={}", command.name);
        validate_name(&command.name)?;

        let kid = Kid {
            id: generate_id("kid"),
            name: command.name.trim().to_string(),
            allocation: Allocation::default(),
            interest_rate: 0.0,
            entries: Vec::new(),
        };

        let stored = kid.clone();
        self.handle.transact(move |dataset| {
            dataset.kids.push(stored);
            Ok(())
        })?;

        info!("Created child {} with ID {}", kid.name, kid.id);
        Ok(CreateChildResult { kid })
    }

    /// Rename an existing child.
    pub fn update_child(
        &self,
        command: UpdateChildCommand,
    ) -> Result<UpdateChildResult, DomainError> {
        info!("Updating child: {}", command.kid_id);
        validate_name(&command.name)?;

        let kid = self.handle.transact(|dataset| {
            let kid = find_kid_mut(dataset, &command.kid_id)?;
            kid.name = command.name.trim().to_string();
            Ok(kid.clone())
        })?;

        info!("Renamed child {} to {}", kid.id, kid.name);
        Ok(UpdateChildResult { kid })
    }

    /// Delete a child and all of their entries.
    pub fn delete_child(
        &self,
        command: DeleteChildCommand,
    ) -> Result<DeleteChildResult, DomainError> {
        info!("Deleting child: {}", command.kid_id);

        let name = self.handle.transact(|dataset| {
            let name = find_kid(dataset, &command.kid_id)?.name.clone();
            dataset.kids.retain(|k| k.id != command.kid_id);
            Ok(name)
        })?;

        info!("Deleted child {} ({})", name, command.kid_id);
        Ok(DeleteChildResult {
            success_message: format!("Child '{name}' deleted successfully"),
        })
    }

    /// Update a child's default allocation and interest rate. Existing
    /// entries keep the percentages they were created with.
    pub fn update_allocation(
        &self,
        command: UpdateAllocationCommand,
    ) -> Result<UpdateAllocationResult, DomainError> {
        info!(
            "Updating allocation for child {}: {}/{}/{} @ {}%",
            command.kid_id, command.spent, command.saved, command.given, command.interest_rate
        );
        validate_allocation(
            command.spent,
            command.saved,
            command.given,
            command.interest_rate,
        )?;

        let kid = self.handle.transact(|dataset| {
            let kid = find_kid_mut(dataset, &command.kid_id)?;
            kid.allocation = Allocation {
                spent: command.spent,
                saved: command.saved,
                given: command.given,
            };
            kid.interest_rate = command.interest_rate;
            Ok(kid.clone())
        })?;

        Ok(UpdateAllocationResult { kid })
    }

    /// List every child with freshly computed totals.
    pub fn list_children(&self) -> Result<ListChildrenResult, DomainError> {
        info!("Listing all children");
        let dataset = self.handle.read()?;

        let kids = dataset
            .kids
            .iter()
            .map(|kid| KidSummary {
                id: kid.id.clone(),
                name: kid.name.clone(),
                allocation: kid.allocation,
                interest_rate: kid.interest_rate,
                totals: compute_ledger(&kid.entries).totals,
            })
            .collect::<Vec<_>>();

        info!("Found {} children", kids.len());
        Ok(ListChildrenResult { kids })
    }

    /// Fetch one child with the full annotated entry history.
    pub fn get_child(&self, command: GetChildCommand) -> Result<GetChildResult, DomainError> {
        info!("Getting child: {}", command.kid_id);
        let dataset = self.handle.read()?;

        let kid = match find_kid(&dataset, &command.kid_id) {
            Ok(kid) => kid,
            Err(e) => {
                warn!("Child not found: {}", command.kid_id);
                return Err(e);
            }
        };

        let report = compute_ledger(&kid.entries);
        Ok(GetChildResult {
            kid: KidDetail {
                id: kid.id.clone(),
                name: kid.name.clone(),
                allocation: kid.allocation,
                interest_rate: kid.interest_rate,
                totals: report.totals,
                entries: report.entries,
            },
        })
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Child name cannot be empty"));
    }
    if name.len() > 100 {
        return Err(DomainError::validation(
            "Child name cannot exceed 100 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::entry::AddEntryCommand;
    use crate::domain::entry_service::EntryService;
    use crate::storage::JsonStore;

    fn test_services() -> (
        ChildService<JsonStore>,
        EntryService<JsonStore>,
        tempfile::TempDir,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let handle = Arc::new(DatasetHandle::new(JsonStore::new(
            dir.path().join("data.json"),
        )));
        (
            ChildService::new(Arc::clone(&handle)),
            EntryService::new(handle),
            dir,
        )
    }

    #[test]
    fn create_and_list_children() {
        let (children, _entries, _dir) = test_services();
        let created = children
            .create_child(CreateChildCommand {
                name: "  Mia  ".to_string(),
            })
            .unwrap();
        assert_eq!(created.kid.name, "Mia");
        assert!(created.kid.id.starts_with("kid_"));
        assert_eq!(created.kid.allocation, Allocation::default());

        let listed = children.list_children().unwrap();
        assert_eq!(listed.kids.len(), 1);
        assert_eq!(listed.kids[0].totals.grand_total, 0.0);
    }

    #[test]
    fn empty_name_is_rejected() {
        let (children, _entries, _dir) = test_services();
        let err = children
            .create_child(CreateChildCommand {
                name: "   ".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rename_child() {
        let (children, _entries, _dir) = test_services();
        let kid = children
            .create_child(CreateChildCommand {
                name: "Mia".to_string(),
            })
            .unwrap()
            .kid;

        let renamed = children
            .update_child(UpdateChildCommand {
                kid_id: kid.id.clone(),
                name: "Amelia".to_string(),
            })
            .unwrap();
        assert_eq!(renamed.kid.name, "Amelia");
        assert_eq!(renamed.kid.id, kid.id);
    }

    #[test]
    fn get_unknown_child_is_not_found() {
        let (children, _entries, _dir) = test_services();
        let err = children
            .get_child(GetChildCommand {
                kid_id: "kid_missing".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn delete_child_drops_their_entries() {
        let (children, entries, _dir) = test_services();
        let kid = children
            .create_child(CreateChildCommand {
                name: "Mia".to_string(),
            })
            .unwrap()
            .kid;
        entries
            .add_entry(AddEntryCommand {
                kid_id: kid.id.clone(),
                period: "2024-01".to_string(),
                amount: 100.0,
                spent_percent: None,
                saved_percent: None,
                given_percent: None,
                interest_rate: None,
                used_from_saved: None,
            })
            .unwrap();

        children
            .delete_child(DeleteChildCommand {
                kid_id: kid.id.clone(),
            })
            .unwrap();

        assert!(children.list_children().unwrap().kids.is_empty());
        let err = children
            .get_child(GetChildCommand { kid_id: kid.id })
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn allocation_update_is_validated() {
        let (children, _entries, _dir) = test_services();
        let kid = children
            .create_child(CreateChildCommand {
                name: "Mia".to_string(),
            })
            .unwrap()
            .kid;

        let err = children
            .update_allocation(UpdateAllocationCommand {
                kid_id: kid.id.clone(),
                spent: 50.0,
                saved: 40.0,
                given: 20.0,
                interest_rate: 0.0,
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let updated = children
            .update_allocation(UpdateAllocationCommand {
                kid_id: kid.id.clone(),
                spent: 50.0,
                saved: 30.0,
                given: 20.0,
                interest_rate: 2.5,
            })
            .unwrap();
        assert_eq!(updated.kid.allocation.spent, 50.0);
        assert_eq!(updated.kid.interest_rate, 2.5);
    }

    #[test]
    fn allocation_tolerance_allows_rounding_noise() {
        let (children, _entries, _dir) = test_services();
        let kid = children
            .create_child(CreateChildCommand {
                name: "Mia".to_string(),
            })
            .unwrap()
            .kid;

        // 33.33 + 33.33 + 33.34 sums to 100.00 and must pass; 33.33 ×3 is
        // 0.01 off and sits exactly on the tolerance boundary.
        assert!(children
            .update_allocation(UpdateAllocationCommand {
                kid_id: kid.id.clone(),
                spent: 33.33,
                saved: 33.33,
                given: 33.34,
                interest_rate: 0.0,
            })
            .is_ok());
    }

    #[test]
    fn list_totals_reflect_entry_history() {
        let (children, entries, _dir) = test_services();
        let kid = children
            .create_child(CreateChildCommand {
                name: "Mia".to_string(),
            })
            .unwrap()
            .kid;
        entries
            .add_entry(AddEntryCommand {
                kid_id: kid.id.clone(),
                period: "2024-01".to_string(),
                amount: 100.0,
                spent_percent: None,
                saved_percent: None,
                given_percent: None,
                interest_rate: None,
                used_from_saved: None,
            })
            .unwrap();

        let listed = children.list_children().unwrap();
        assert_eq!(listed.kids[0].totals.total_saved, 40.0);
        assert_eq!(listed.kids[0].totals.grand_total, 100.0);

        let detail = children
            .get_child(GetChildCommand {
                kid_id: kid.id.clone(),
            })
            .unwrap()
            .kid;
        assert_eq!(detail.entries.len(), 1);
        assert_eq!(detail.entries[0].running_saved, 40.0);
    }
}

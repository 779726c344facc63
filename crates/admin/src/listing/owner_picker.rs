//! Owner selection list.

use tracing::{error, info, instrument};

use fleet_core::OwnerId;

use crate::backend::FleetBackend;
use crate::models::Owner;

/// Label shown when no owner is selected.
pub const NO_OWNER_LABEL: &str = "Select vehicle owner";

/// Message shown when there are no active owners.
pub const NO_OWNERS_MESSAGE: &str = "No car owners found. Add owners in Car Owners section.";

/// Active owners plus the open/closed state of the picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerPicker {
    owners: Vec<Owner>,
    open: bool,
}

impl OwnerPicker {
    /// Picker over an already loaded list.
    #[must_use]
    pub const fn with_owners(owners: Vec<Owner>) -> Self {
        Self { owners, open: false }
    }

    /// Fetch active owners. A failed fetch is logged and yields an empty list.
    #[instrument(skip(backend))]
    pub async fn load<B: FleetBackend>(backend: &B) -> Self {
        match backend.active_owners().await {
            Ok(owners) => {
                info!(count = owners.len(), "Loaded owners");
                Self::with_owners(owners)
            }
            Err(e) => {
                error!(error = %e, "Failed to load owners");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub const fn open(&mut self) {
        self.open = true;
    }

    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Select an owner and close the picker. Returns `None` for ids not in
    /// the list.
    pub fn choose(&mut self, id: OwnerId) -> Option<OwnerId> {
        let found = self.owners.iter().any(|o| o.id == id);
        self.open = false;
        found.then_some(id)
    }

    /// Text for the picker button.
    #[must_use]
    pub fn label(&self, selected: Option<OwnerId>) -> &str {
        selected
            .and_then(|id| self.owners.iter().find(|o| o.id == id))
            .map_or(NO_OWNER_LABEL, |o| o.name.as_str())
    }

    /// Placeholder text when the list is empty.
    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.owners.is_empty().then_some(NO_OWNERS_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use fleet_core::OwnerStatus;

    use super::*;

    fn owner(id: i64, name: &str) -> Owner {
        Owner {
            id: OwnerId::new(id),
            name: name.to_string(),
            email: None,
            status: OwnerStatus::Active,
        }
    }

    #[test]
    fn test_choose_closes_and_returns_id() {
        let mut picker = OwnerPicker::with_owners(vec![owner(1, "Alice"), owner(2, "Bob")]);
        picker.open();
        assert!(picker.is_open());

        assert_eq!(picker.choose(OwnerId::new(2)), Some(OwnerId::new(2)));
        assert!(!picker.is_open());
        assert_eq!(picker.choose(OwnerId::new(9)), None);
    }

    #[test]
    fn test_label() {
        let picker = OwnerPicker::with_owners(vec![owner(1, "Alice")]);

        assert_eq!(picker.label(None), NO_OWNER_LABEL);
        assert_eq!(picker.label(Some(OwnerId::new(1))), "Alice");
        assert_eq!(picker.label(Some(OwnerId::new(5))), NO_OWNER_LABEL);
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(OwnerPicker::default().empty_message(), Some(NO_OWNERS_MESSAGE));
        assert_eq!(
            OwnerPicker::with_owners(vec![owner(1, "Alice")]).empty_message(),
            None
        );
    }
}

//! Car owner reference data.

use serde::{Deserialize, Serialize};

use fleet_core::{OwnerId, OwnerStatus};

/// A row of the `car_owners` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: OwnerStatus,
}

impl Owner {
    /// Uppercased first letter of the name, used as the avatar glyph.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

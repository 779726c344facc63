//! YAML listing files.
//!
//! A listing file describes the form input for one vehicle:
//!
//! ```yaml
//! make: Toyota
//! model: Camry
//! year: 2023
//! type: Sedan
//! seats: 5
//! price_per_day: 50
//! owner_id: 3
//! variants:
//!   - color: White
//!     total_quantity: 2
//!     available_quantity: 2
//!     image: photos/white.heic
//! ```
//!
//! Every field is optional. When editing, present fields overwrite the stored
//! values; variant entries with an `id` edit (or, with `remove: true`, remove)
//! the stored variant of that id, and entries without one add a new variant.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use fleet_admin::listing::{FieldEdit, ListingScreen, VariantEdit, VariantKey};
use fleet_core::{OwnerId, VehicleType};

/// Errors raised while loading or applying a listing file.
#[derive(Debug, Error)]
pub enum ListingFileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid listing file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Variant {0} is not part of this vehicle")]
    UnknownVariant(i64),
}

/// Text-entry field value. Numbers are kept as typed so the form validator
/// sees the same input a person would have entered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// One entry of `variants:`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantEntry {
    /// Stored variant id, when editing.
    pub id: Option<i64>,
    pub color: Option<String>,
    pub total_quantity: Option<u32>,
    pub available_quantity: Option<u32>,
    /// Photo path (relative to the listing file) or URL.
    pub image: Option<String>,
    #[serde(default)]
    pub remove: bool,
}

/// Parsed listing file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingFile {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<Scalar>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<VehicleType>,
    pub seats: Option<Scalar>,
    pub price_per_day: Option<Scalar>,
    pub mileage: Option<Scalar>,
    pub description: Option<String>,
    pub available: Option<bool>,
    pub owner_id: Option<OwnerId>,
    #[serde(default)]
    pub variants: Vec<VariantEntry>,
}

impl ListingFile {
    /// Read and parse a listing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid listing.
    pub async fn load(path: &Path) -> Result<Self, ListingFileError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|source| {
            ListingFileError::Read {
                path: path.display().to_string(),
                source,
            }
        })?;

        Self::parse(&content).map_err(|source| ListingFileError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse listing YAML.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed input or unknown fields.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Feed the file's values into the screen as form edits. Image paths are
    /// resolved against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ListingFileError::UnknownVariant`] for an `id` the screen
    /// does not hold.
    pub fn apply(
        self,
        screen: &mut ListingScreen,
        base_dir: &Path,
    ) -> Result<(), ListingFileError> {
        let fields = [
            self.make.map(FieldEdit::Make),
            self.model.map(FieldEdit::Model),
            self.year.map(|v| FieldEdit::Year(v.into_text())),
            self.vehicle_type.map(FieldEdit::VehicleType),
            self.seats.map(|v| FieldEdit::Seats(v.into_text())),
            self.price_per_day.map(|v| FieldEdit::PricePerDay(v.into_text())),
            self.mileage.map(|v| FieldEdit::Mileage(v.into_text())),
            self.description.map(FieldEdit::Description),
            self.available.map(FieldEdit::Available),
        ];
        for edit in fields.into_iter().flatten() {
            screen.edit(edit);
        }

        if let Some(owner_id) = self.owner_id {
            screen.choose_owner(owner_id);
            if screen.form().owner_id != Some(owner_id) {
                warn!(owner_id = %owner_id, "Owner is not an active owner, ignoring");
            }
        }

        let mut claimed = HashSet::new();
        for entry in self.variants {
            apply_variant(screen, entry, base_dir, &mut claimed)?;
        }
        Ok(())
    }
}

fn apply_variant(
    screen: &mut ListingScreen,
    entry: VariantEntry,
    base_dir: &Path,
    claimed: &mut HashSet<VariantKey>,
) -> Result<(), ListingFileError> {
    let key = match entry.id {
        Some(id) => {
            let key = VariantKey::new(id);
            if screen.form().variants.get(key).is_none() {
                return Err(ListingFileError::UnknownVariant(id));
            }
            key
        }
        None => blank_or_new(screen, claimed),
    };
    claimed.insert(key);

    if entry.remove {
        if screen.request_variant_removal(key) {
            screen.confirm_variant_removal();
        } else {
            warn!(variant = %key, "Cannot remove the only variant, ignoring");
        }
        return Ok(());
    }

    if let Some(color) = entry.color {
        screen.edit(VariantEdit::Color(key, color));
    }
    if let Some(total) = entry.total_quantity {
        screen.edit(VariantEdit::TotalQuantity(key, total));
    }
    if let Some(available) = entry.available_quantity {
        screen.edit(VariantEdit::AvailableQuantity(key, available));
    }
    if let Some(image) = entry.image {
        screen.edit(VariantEdit::Image(key, resolve_image(&image, base_dir)));
    }
    Ok(())
}

/// Reuse an untouched blank variant (such as the form's default one) before
/// adding a new one.
fn blank_or_new(screen: &mut ListingScreen, claimed: &HashSet<VariantKey>) -> VariantKey {
    let reusable = screen
        .form()
        .variants
        .iter()
        .find(|v| v.is_blank() && !claimed.contains(&v.key))
        .map(|v| v.key);

    if let Some(key) = reusable {
        return key;
    }

    screen.edit(VariantEdit::Add);
    screen
        .form()
        .variants
        .last_key()
        .unwrap_or_else(|| VariantKey::new(0))
}

fn resolve_image(image: &str, base_dir: &Path) -> String {
    let is_url = image.starts_with("http://")
        || image.starts_with("https://")
        || image.starts_with("file://");
    if is_url || Path::new(image).is_absolute() {
        image.to_string()
    } else {
        base_dir.join(image).display().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fleet_admin::listing::SubmitPhase;

    use super::*;

    const CAMRY: &str = r"
make: Toyota
model: Camry
year: 2023
type: Sedan
seats: 5
price_per_day: 49.5
variants:
  - color: White
    total_quantity: 2
    available_quantity: 2
    image: photos/white.jpg
  - color: Black
    total_quantity: 1
";

    #[test]
    fn test_parse_keeps_numbers_as_text() {
        let file = ListingFile::parse(CAMRY).unwrap();

        assert_eq!(file.year.unwrap().into_text(), "2023");
        assert_eq!(file.price_per_day.unwrap().into_text(), "49.5");
        assert_eq!(file.vehicle_type, Some(VehicleType::Sedan));
        assert_eq!(file.variants.len(), 2);
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        assert!(ListingFile::parse("make: Toyota\ncolour: red\n").is_err());
    }

    #[test]
    fn test_apply_fills_default_variant_then_adds() {
        let mut screen = ListingScreen::new();
        ListingFile::parse(CAMRY)
            .unwrap()
            .apply(&mut screen, Path::new("/listings"))
            .unwrap();

        let variants: Vec<_> = screen.form().variants.iter().collect();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].color, "White");
        assert_eq!(variants[0].image_ref.as_deref(), Some("/listings/photos/white.jpg"));
        assert_eq!(variants[1].color, "Black");

        screen.press_submit().unwrap();
        assert_eq!(screen.phase(), SubmitPhase::Confirming);
    }

    #[test]
    fn test_apply_unknown_variant_id() {
        let mut screen = ListingScreen::new();
        let file = ListingFile {
            variants: vec![VariantEntry {
                id: Some(999),
                ..VariantEntry::default()
            }],
            ..ListingFile::default()
        };

        let err = file.apply(&mut screen, Path::new(".")).unwrap_err();
        assert!(matches!(err, ListingFileError::UnknownVariant(999)));
    }

    #[test]
    fn test_resolve_image() {
        let base = Path::new("/data");
        assert_eq!(resolve_image("a.png", base), "/data/a.png");
        assert_eq!(resolve_image("/abs/a.png", base), "/abs/a.png");
        assert_eq!(resolve_image("https://cdn/a.png", base), "https://cdn/a.png");
    }
}

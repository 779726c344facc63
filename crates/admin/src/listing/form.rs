//! Listing form state.
//!
//! [`ListingForm`] is an immutable snapshot: every edit consumes the current
//! snapshot and returns the next one. Text-entry fields stay as raw text until
//! validation so that "empty" and "not a number" can be told apart.

use fleet_core::{OwnerId, VehicleId, VehicleType};

use crate::models::{VariantRow, Vehicle};

use super::variants::{VariantEdit, VariantList};

/// Scalar vehicle fields as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleForm {
    pub make: String,
    pub model: String,
    pub year: String,
    pub vehicle_type: Option<VehicleType>,
    pub seats: String,
    pub price_per_day: String,
    pub mileage: String,
    pub description: String,
    pub available: bool,
}

impl Default for VehicleForm {
    fn default() -> Self {
        Self {
            make: String::new(),
            model: String::new(),
            year: String::new(),
            vehicle_type: None,
            seats: String::new(),
            price_per_day: String::new(),
            mileage: String::new(),
            description: String::new(),
            available: true,
        }
    }
}

impl VehicleForm {
    /// Prefill from a stored vehicle.
    #[must_use]
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year.to_string(),
            vehicle_type: vehicle.vehicle_type,
            seats: vehicle.seats.to_string(),
            price_per_day: vehicle.price_per_day.amount().normalize().to_string(),
            mileage: vehicle.mileage.map(|m| m.to_string()).unwrap_or_default(),
            description: vehicle.description.clone().unwrap_or_default(),
            available: vehicle.available,
        }
    }

    /// Apply one field edit.
    #[must_use]
    pub fn apply(mut self, edit: FieldEdit) -> Self {
        match edit {
            FieldEdit::Make(v) => self.make = v,
            FieldEdit::Model(v) => self.model = v,
            FieldEdit::Year(v) => self.year = v,
            FieldEdit::VehicleType(v) => self.vehicle_type = Some(v),
            FieldEdit::Seats(v) => self.seats = v,
            FieldEdit::PricePerDay(v) => self.price_per_day = v,
            FieldEdit::Mileage(v) => self.mileage = v,
            FieldEdit::Description(v) => self.description = v,
            FieldEdit::Available(v) => self.available = v,
        }
        self
    }
}

/// Edit of a single scalar field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Make(String),
    Model(String),
    Year(String),
    VehicleType(VehicleType),
    Seats(String),
    PricePerDay(String),
    Mileage(String),
    Description(String),
    Available(bool),
}

/// Any edit the listing form accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEdit {
    Field(FieldEdit),
    Variant(VariantEdit),
    SelectOwner(OwnerId),
}

impl From<FieldEdit> for ListingEdit {
    fn from(edit: FieldEdit) -> Self {
        Self::Field(edit)
    }
}

impl From<VariantEdit> for ListingEdit {
    fn from(edit: VariantEdit) -> Self {
        Self::Variant(edit)
    }
}

/// Complete form snapshot: vehicle fields, variants and owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingForm {
    /// Set when editing an existing vehicle.
    pub editing: Option<VehicleId>,
    pub vehicle: VehicleForm,
    pub variants: VariantList,
    pub owner_id: Option<OwnerId>,
}

impl ListingForm {
    /// Blank form for a new listing.
    #[must_use]
    pub fn new_listing() -> Self {
        Self::default()
    }

    /// Form prefilled from a stored vehicle. Variants stay at the single
    /// default until [`with_variant_rows`](Self::with_variant_rows) is called.
    #[must_use]
    pub fn for_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            editing: Some(vehicle.id),
            vehicle: VehicleForm::from_vehicle(vehicle),
            variants: VariantList::new(),
            owner_id: vehicle.owner_id,
        }
    }

    /// Whether this form edits an existing vehicle.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Replace the variants with stored rows (no-op for an empty slice).
    #[must_use]
    pub fn with_variant_rows(mut self, rows: &[VariantRow]) -> Self {
        self.variants = self.variants.with_rows(rows);
        self
    }

    /// Apply one edit, returning the next snapshot.
    #[must_use]
    pub fn apply(mut self, edit: impl Into<ListingEdit>) -> Self {
        match edit.into() {
            ListingEdit::Field(field) => self.vehicle = self.vehicle.apply(field),
            ListingEdit::Variant(variant) => self.variants = self.variants.apply(variant),
            ListingEdit::SelectOwner(owner_id) => self.owner_id = Some(owner_id),
        }
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fleet_core::DailyRate;

    use super::*;

    fn stored_vehicle() -> Vehicle {
        Vehicle {
            id: VehicleId::new(12),
            make: "BMW".to_string(),
            model: "X5".to_string(),
            year: 2021,
            vehicle_type: Some(VehicleType::Suv),
            seats: 7,
            price_per_day: DailyRate::parse("120.50").unwrap(),
            mileage: Some(25_000),
            description: None,
            available: false,
            owner_id: Some(OwnerId::new(4)),
            total_quantity: 2,
            available_quantity: 1,
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_new_listing_defaults() {
        let form = ListingForm::new_listing();

        assert!(!form.is_editing());
        assert!(form.vehicle.available);
        assert!(form.vehicle.make.is_empty());
        assert_eq!(form.owner_id, None);
        assert_eq!(form.variants.len(), 1);
    }

    #[test]
    fn test_for_vehicle_prefills_text_fields() {
        let form = ListingForm::for_vehicle(&stored_vehicle());

        assert_eq!(form.editing, Some(VehicleId::new(12)));
        assert_eq!(form.vehicle.year, "2021");
        assert_eq!(form.vehicle.seats, "7");
        assert_eq!(form.vehicle.price_per_day, "120.5");
        assert_eq!(form.vehicle.mileage, "25000");
        assert_eq!(form.vehicle.description, "");
        assert!(!form.vehicle.available);
        assert_eq!(form.owner_id, Some(OwnerId::new(4)));
    }

    #[test]
    fn test_apply_leaves_previous_snapshot_untouched() {
        let before = ListingForm::new_listing();
        let after = before
            .clone()
            .apply(FieldEdit::Make("Toyota".to_string()))
            .apply(FieldEdit::VehicleType(VehicleType::Sedan))
            .apply(ListingEdit::SelectOwner(OwnerId::new(2)));

        assert!(before.vehicle.make.is_empty());
        assert_eq!(after.vehicle.make, "Toyota");
        assert_eq!(after.vehicle.vehicle_type, Some(VehicleType::Sedan));
        assert_eq!(after.owner_id, Some(OwnerId::new(2)));
    }

    #[test]
    fn test_variant_edits_route_to_the_list() {
        let form = ListingForm::new_listing().apply(VariantEdit::Add);
        assert_eq!(form.variants.len(), 2);
    }
}

//! Listing form validation.
//!
//! Rules run in a fixed order and the first failure wins. The error's
//! `Display` is the message shown to the user.

use thiserror::Error;

use fleet_core::{DailyRate, VehicleId};

use crate::models::VehicleDraft;

use super::form::ListingForm;
use super::variants::ColorVariant;

/// Allowed seat range, inclusive.
pub const SEATS_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

/// A failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingRequired,

    #[error("Please enter a valid number of seats (1-50)")]
    SeatsOutOfRange,

    /// A numeric field holds text that does not parse.
    #[error("Please enter a valid {0}")]
    InvalidNumber(&'static str),

    #[error("Please add at least one color variant")]
    NoVariants,

    #[error("Total quantity for {0} must be at least 1")]
    ZeroTotal(String),

    #[error("Available quantity for {0} cannot exceed total quantity")]
    AvailableExceedsTotal(String),
}

/// A form that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidListing {
    /// Target vehicle when editing.
    pub vehicle_id: Option<VehicleId>,
    pub draft: VehicleDraft,
    /// Variants with a non-blank color, in form order.
    pub variants: Vec<ColorVariant>,
}

impl ValidListing {
    #[must_use]
    pub const fn is_update(&self) -> bool {
        self.vehicle_id.is_some()
    }
}

/// Check a form snapshot.
///
/// # Errors
///
/// Returns the first [`ValidationError`] that applies.
pub fn validate(form: &ListingForm) -> Result<ValidListing, ValidationError> {
    let fields = &form.vehicle;

    let required = [
        &fields.make,
        &fields.model,
        &fields.year,
        &fields.price_per_day,
        &fields.seats,
    ];
    if required.iter().any(|value| value.trim().is_empty()) {
        return Err(ValidationError::MissingRequired);
    }

    let seats = fields
        .seats
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|s| SEATS_RANGE.contains(s))
        .ok_or(ValidationError::SeatsOutOfRange)?;

    let year = fields
        .year
        .trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidNumber("year"))?;

    let price_per_day =
        DailyRate::parse(&fields.price_per_day).map_err(|_| ValidationError::InvalidNumber("price"))?;

    let mileage = match fields.mileage.trim() {
        "" => None,
        raw => Some(
            raw.parse::<u32>()
                .map_err(|_| ValidationError::InvalidNumber("mileage"))?,
        ),
    };

    let variants: Vec<ColorVariant> = form.variants.named().cloned().collect();
    if variants.is_empty() {
        return Err(ValidationError::NoVariants);
    }

    for variant in &variants {
        if variant.total_quantity < 1 {
            return Err(ValidationError::ZeroTotal(variant.color.clone()));
        }
        if variant.available_quantity > variant.total_quantity {
            return Err(ValidationError::AvailableExceedsTotal(variant.color.clone()));
        }
    }

    Ok(ValidListing {
        vehicle_id: form.editing,
        draft: VehicleDraft {
            make: fields.make.trim().to_string(),
            model: fields.model.trim().to_string(),
            year,
            vehicle_type: fields.vehicle_type,
            seats,
            price_per_day,
            mileage,
            description: fields.description.clone(),
            available: fields.available,
            owner_id: form.owner_id,
        },
        variants,
    })
}

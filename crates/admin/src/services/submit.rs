//! Listing submission.
//!
//! Writes a validated listing to the backend:
//! 1. Upload every changed variant photo concurrently and wait for all of them
//! 2. Insert the vehicle, or update it and delete its previous variant rows
//! 3. Insert the full set of variant rows in one batch
//!
//! A failed photo upload is logged and the variant is saved without the new
//! photo. Any table write failure aborts the submission; earlier writes are
//! not rolled back.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use thiserror::Error;
use tracing::{error, info, instrument};

use fleet_core::VehicleId;

use crate::backend::{FleetBackend, ObjectStorage};
use crate::listing::{ColorVariant, ValidListing};
use crate::models::{NewVariantRow, VehicleRecord};
use crate::supabase::SupabaseError;

use super::images::{ImageUploader, Transcoder};

/// A table write that aborted the submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Inserting or updating the `vehicles` row failed.
    #[error("{0}")]
    VehicleWrite(#[source] SupabaseError),

    /// Deleting the previous variant rows failed.
    #[error("{0}")]
    VariantCleanup(#[source] SupabaseError),

    /// Inserting the new variant rows failed.
    #[error("{0}")]
    VariantWrite(#[source] SupabaseError),
}

/// Result of a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub vehicle_id: VehicleId,
    /// Whether an existing vehicle was updated.
    pub updated: bool,
    /// Number of variant rows written.
    pub variant_count: usize,
    /// Photos that could not be uploaded.
    pub failed_uploads: usize,
}

impl SubmitOutcome {
    /// Message shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        if self.updated {
            "Vehicle updated successfully! All changes have been saved."
        } else {
            "Vehicle added successfully! Your new vehicle is now available in the fleet."
        }
    }
}

/// Sums over the submitted variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregates {
    pub total_quantity: u32,
    pub available_quantity: u32,
    /// First variant's photo.
    pub image_url: Option<String>,
}

impl Aggregates {
    #[must_use]
    pub fn of(variants: &[ColorVariant]) -> Self {
        Self {
            total_quantity: variants
                .iter()
                .fold(0, |sum, v| sum.saturating_add(v.total_quantity)),
            available_quantity: variants
                .iter()
                .fold(0, |sum, v| sum.saturating_add(v.available_quantity)),
            image_url: variants.first().and_then(|v| v.image_url.clone()),
        }
    }
}

/// Write a validated listing.
///
/// # Errors
///
/// Returns a [`SubmitError`] for the first table write that fails. Photo
/// upload failures are not errors.
#[instrument(skip_all, fields(vehicle_id = ?listing.vehicle_id, variants = listing.variants.len()))]
pub async fn submit_listing<B, T>(
    backend: &B,
    uploader: &ImageUploader<T>,
    listing: &ValidListing,
) -> Result<SubmitOutcome, SubmitError>
where
    B: FleetBackend + ObjectStorage,
    T: Transcoder,
{
    let (variants, failed_uploads) = resolve_images(backend, uploader, &listing.variants).await;

    let now = Utc::now();
    let totals = Aggregates::of(&variants);
    let record = VehicleRecord::from_draft(
        &listing.draft,
        totals.total_quantity,
        totals.available_quantity,
        totals.image_url,
        now,
        listing.vehicle_id.is_none(),
    );

    let vehicle_id = match listing.vehicle_id {
        Some(id) => {
            backend
                .update_vehicle(id, &record)
                .await
                .map_err(SubmitError::VehicleWrite)?;
            backend
                .delete_variants_for_vehicle(id)
                .await
                .map_err(SubmitError::VariantCleanup)?;
            id
        }
        None => {
            backend
                .insert_vehicle(&record)
                .await
                .map_err(SubmitError::VehicleWrite)?
                .id
        }
    };

    let rows = variant_rows(vehicle_id, &variants, now);
    backend
        .insert_variants(&rows)
        .await
        .map_err(SubmitError::VariantWrite)?;

    info!(
        vehicle_id = %vehicle_id,
        variants = rows.len(),
        failed_uploads,
        "Listing saved"
    );

    Ok(SubmitOutcome {
        vehicle_id,
        updated: listing.vehicle_id.is_some(),
        variant_count: rows.len(),
        failed_uploads,
    })
}

/// Upload changed photos concurrently. A variant whose upload fails keeps
/// the URL it already had.
async fn resolve_images<S, T>(
    storage: &S,
    uploader: &ImageUploader<T>,
    variants: &[ColorVariant],
) -> (Vec<ColorVariant>, usize)
where
    S: ObjectStorage,
    T: Transcoder,
{
    let uploads = variants.iter().map(|variant| async move {
        let mut variant = variant.clone();
        let Some(reference) = variant.image_ref.clone().filter(|_| variant.needs_upload()) else {
            return (variant, false);
        };

        match uploader.upload(storage, &reference).await {
            Ok(url) => {
                variant.image_url = Some(url);
                (variant, false)
            }
            Err(e) => {
                error!(
                    color = %variant.color,
                    error = %e,
                    key_conflict = e.is_key_conflict(),
                    "Failed to upload variant image"
                );
                (variant, true)
            }
        }
    });

    let results = join_all(uploads).await;
    let failed = results.iter().filter(|(_, failed)| *failed).count();
    (results.into_iter().map(|(v, _)| v).collect(), failed)
}

fn variant_rows(
    vehicle_id: VehicleId,
    variants: &[ColorVariant],
    now: DateTime<Utc>,
) -> Vec<NewVariantRow> {
    variants
        .iter()
        .map(|v| NewVariantRow {
            vehicle_id,
            color: v.color.trim().to_string(),
            image_url: v.image_url.clone(),
            total_quantity: v.total_quantity,
            available_quantity: v.available_quantity,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::VariantKey;

    fn variant(color: &str, total: u32, available: u32, url: Option<&str>) -> ColorVariant {
        ColorVariant {
            key: VariantKey::new(1),
            color: color.to_string(),
            total_quantity: total,
            available_quantity: available,
            image_ref: url.map(String::from),
            image_url: url.map(String::from),
        }
    }

    #[test]
    fn test_aggregates_sum_and_take_first_image() {
        let variants = [
            variant("White", 2, 1, None),
            variant("Black", 3, 3, Some("https://cdn/black.jpg")),
        ];
        let totals = Aggregates::of(&variants);

        assert_eq!(totals.total_quantity, 5);
        assert_eq!(totals.available_quantity, 4);
        assert_eq!(totals.image_url, None);
    }

    #[test]
    fn test_aggregates_saturate() {
        let variants = [variant("A", u32::MAX, 1, None), variant("B", 5, 1, None)];
        assert_eq!(Aggregates::of(&variants).total_quantity, u32::MAX);
    }

    #[test]
    fn test_variant_rows_reference_vehicle() {
        let now = Utc::now();
        let rows = variant_rows(
            VehicleId::new(9),
            &[variant(" White ", 2, 2, Some("https://cdn/w.jpg"))],
            now,
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vehicle_id, VehicleId::new(9));
        assert_eq!(rows[0].color, "White");
        assert_eq!(rows[0].image_url.as_deref(), Some("https://cdn/w.jpg"));
        assert_eq!(rows[0].created_at, now);
    }

    #[test]
    fn test_outcome_message() {
        let outcome = SubmitOutcome {
            vehicle_id: VehicleId::new(1),
            updated: false,
            variant_count: 1,
            failed_uploads: 0,
        };
        assert!(outcome.message().starts_with("Vehicle added successfully!"));
        assert!(
            SubmitOutcome { updated: true, ..outcome }
                .message()
                .starts_with("Vehicle updated successfully!")
        );
    }
}

//! Integration tests for listing submission.
//!
//! These tests drive the listing screen against the in-memory backend and
//! check which rows and objects get written.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use fleet_admin::listing::{
    FieldEdit, ListingScreen, SubmitPhase, ValidationError, VariantEdit, VariantKey, validate,
};
use fleet_admin::services::{ImageUploader, submit_listing};
use fleet_core::{OwnerStatus, VehicleId, VehicleType};
use fleet_integration_tests::{
    Call, MemoryFleet, Op, PUBLIC_BASE, missing_image, owner, stored_variant, stored_vehicle,
    temp_image,
};

fn uploader() -> ImageUploader {
    ImageUploader::new("vehicle-variants")
}

/// Toyota Camry 2023, 5 seats, 50/day, one White variant 2/2.
fn camry() -> ListingScreen {
    let mut screen = ListingScreen::new();
    screen.edit(FieldEdit::Make("Toyota".to_string()));
    screen.edit(FieldEdit::Model("Camry".to_string()));
    screen.edit(FieldEdit::Year("2023".to_string()));
    screen.edit(FieldEdit::VehicleType(VehicleType::Sedan));
    screen.edit(FieldEdit::Seats("5".to_string()));
    screen.edit(FieldEdit::PricePerDay("50".to_string()));

    let key = screen.form().variants.last_key().unwrap();
    screen.edit(VariantEdit::Color(key, "White".to_string()));
    screen.edit(VariantEdit::TotalQuantity(key, 2));
    screen.edit(VariantEdit::AvailableQuantity(key, 2));
    screen
}

fn add_variant(screen: &mut ListingScreen, color: &str, image: Option<String>) -> VariantKey {
    screen.edit(VariantEdit::Add);
    let key = screen.form().variants.last_key().unwrap();
    screen.edit(VariantEdit::Color(key, color.to_string()));
    if let Some(image) = image {
        screen.edit(VariantEdit::Image(key, image));
    }
    key
}

fn seeded_fleet() -> MemoryFleet {
    MemoryFleet::new()
        .with_owners(vec![owner(1, "Alice", OwnerStatus::Active)])
        .with_vehicle(
            stored_vehicle(7),
            vec![
                stored_variant(70, 7, "White", 2, 1),
                stored_variant(71, 7, "Black", 1, 1),
            ],
        )
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_inserts_vehicle_then_variant_rows() {
    let fleet = MemoryFleet::new();
    let mut screen = camry();

    screen.press_submit().unwrap();
    let phase = screen.confirm_submit(&fleet, &uploader()).await;
    assert_eq!(phase, SubmitPhase::Succeeded);

    let writes = fleet.writes();
    assert_eq!(writes.len(), 2, "unexpected writes: {writes:?}");

    let Call::InsertVehicle(record) = &writes[0] else {
        panic!("expected vehicle insert first, got {:?}", writes[0]);
    };
    assert_eq!(record.make, "Toyota");
    assert_eq!(record.model, "Camry");
    assert_eq!(record.year, 2023);
    assert_eq!(record.seats, 5);
    assert_eq!(record.total_quantity, 2);
    assert_eq!(record.available_quantity, 2);
    assert!(record.created_at.is_some());

    let vehicle_id = fleet.vehicles()[0].id;
    let Call::InsertVariants(rows) = &writes[1] else {
        panic!("expected variant insert second, got {:?}", writes[1]);
    };
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].vehicle_id, vehicle_id);
    assert_eq!(rows[0].color, "White");
    assert_eq!(rows[0].total_quantity, 2);
    assert_eq!(rows[0].available_quantity, 2);

    let modal = screen.modal();
    assert_eq!(modal.title, "Success");
    assert_eq!(
        modal.message,
        "Vehicle added successfully! Your new vehicle is now available in the fleet."
    );
}

#[tokio::test]
async fn test_create_variant_insert_failure_reports_save() {
    let fleet = MemoryFleet::new();
    fleet.fail(Op::InsertVariants, "violates foreign key constraint");

    let mut screen = camry();
    screen.press_submit().unwrap();
    let phase = screen.confirm_submit(&fleet, &uploader()).await;

    assert_eq!(phase, SubmitPhase::Failed);
    let modal = screen.modal();
    assert_eq!(modal.title, "Error");
    assert!(modal.message.starts_with("Failed to save vehicle: "));
    assert!(modal.message.contains("violates foreign key constraint"));

    // The vehicle row stays behind; there is no rollback.
    assert_eq!(fleet.vehicles().len(), 1);
}

#[tokio::test]
async fn test_zero_named_variants_makes_no_backend_calls() {
    let fleet = MemoryFleet::new();
    let mut screen = camry();
    let key = screen.form().variants.last_key().unwrap();
    screen.edit(VariantEdit::Color(key, "   ".to_string()));

    assert_eq!(screen.press_submit(), Err(ValidationError::NoVariants));
    assert_eq!(screen.phase(), SubmitPhase::Idle);

    // Nothing is confirmed, so confirming does nothing.
    screen.confirm_submit(&fleet, &uploader()).await;
    assert!(fleet.calls().is_empty());
}

// =============================================================================
// Photo uploads
// =============================================================================

#[tokio::test]
async fn test_one_failed_upload_still_completes() {
    let fleet = MemoryFleet::new();
    let mut screen = camry();
    let white = screen.form().variants.last_key().unwrap();
    screen.edit(VariantEdit::Image(white, temp_image("png", b"png-bytes")));
    add_variant(&mut screen, "Black", Some(missing_image()));

    let listing = validate(screen.form()).unwrap();
    let outcome = submit_listing(&fleet, &uploader(), &listing).await.unwrap();
    assert_eq!(outcome.failed_uploads, 1);
    assert_eq!(outcome.variant_count, 2);

    let rows = fleet.variants_of(outcome.vehicle_id);
    let white = rows.iter().find(|r| r.color == "White").unwrap();
    let black = rows.iter().find(|r| r.color == "Black").unwrap();

    let url = white.image_url.as_deref().unwrap();
    assert!(url.starts_with(&format!("{PUBLIC_BASE}/vehicle-variants/")));
    assert!(url.ends_with(".png"));
    assert_eq!(black.image_url, None);

    // Primary image is the first variant's.
    assert_eq!(fleet.vehicles()[0].image_url.as_deref(), Some(url));
}

#[tokio::test]
async fn test_slow_upload_does_not_hold_back_others() {
    let fleet = MemoryFleet::new();
    fleet.delay_uploads(".png", Duration::from_millis(300));

    let mut screen = camry();
    let white = screen.form().variants.last_key().unwrap();
    screen.edit(VariantEdit::Image(white, temp_image("png", b"slow")));
    add_variant(&mut screen, "Red", Some(temp_image("webp", b"fast")));

    let listing = validate(screen.form()).unwrap();
    let outcome = submit_listing(&fleet, &uploader(), &listing).await.unwrap();
    assert_eq!(outcome.failed_uploads, 0);

    let calls = fleet.calls();
    let uploads: Vec<&str> = calls
        .iter()
        .filter_map(|c| match c {
            Call::Upload { key, .. } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(uploads.len(), 2);
    assert!(uploads[0].ends_with(".webp"), "uploads: {uploads:?}");
    assert!(uploads[1].ends_with(".png"), "uploads: {uploads:?}");

    // Both photos are resolved before the vehicle row is written.
    let insert = calls
        .iter()
        .position(|c| matches!(c, Call::InsertVehicle(_)))
        .unwrap();
    assert_eq!(insert, 2);
}

#[tokio::test]
async fn test_storage_rejection_is_absorbed() {
    let fleet = MemoryFleet::new();
    fleet.fail(Op::Upload, "bucket unavailable");

    let mut screen = camry();
    let white = screen.form().variants.last_key().unwrap();
    screen.edit(VariantEdit::Image(white, temp_image("jpg", b"jpeg-bytes")));

    screen.press_submit().unwrap();
    assert_eq!(
        screen.confirm_submit(&fleet, &uploader()).await,
        SubmitPhase::Succeeded
    );

    let vehicle_id = fleet.vehicles()[0].id;
    assert_eq!(fleet.variants_of(vehicle_id)[0].image_url, None);
}

#[tokio::test]
async fn test_uploads_get_unique_keys_and_content_types() {
    let fleet = MemoryFleet::new();
    let mut screen = camry();
    let white = screen.form().variants.last_key().unwrap();
    screen.edit(VariantEdit::Image(white, temp_image("JPEG", b"a")));
    add_variant(&mut screen, "Red", Some(temp_image("webp", b"b")));
    add_variant(&mut screen, "Blue", Some(temp_image("tiff", b"c")));

    screen.press_submit().unwrap();
    screen.confirm_submit(&fleet, &uploader()).await;

    let mut uploads: Vec<(String, String)> = fleet
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Upload { key, content_type } => Some((key, content_type)),
            _ => None,
        })
        .collect();
    uploads.sort_by(|a, b| a.1.cmp(&b.1));

    assert_eq!(uploads.len(), 3);
    assert_eq!(fleet.object_keys().len(), 3);

    let types: Vec<&str> = uploads.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(types, vec!["image/jpeg", "image/jpeg", "image/webp"]);
    assert!(uploads.iter().any(|(k, _)| k.ends_with(".jpeg")));
    assert!(uploads.iter().any(|(k, _)| k.ends_with(".tiff")));
    assert!(uploads.iter().all(|(k, _)| k.starts_with("vehicle-variants/")));
}

// =============================================================================
// Edit
// =============================================================================

#[tokio::test]
async fn test_edit_update_failure_skips_variant_delete() {
    let fleet = seeded_fleet();
    fleet.fail(Op::UpdateVehicle, "connection reset by peer");

    let mut screen = ListingScreen::editing(&stored_vehicle(7));
    screen.mount(&fleet).await;
    screen.press_submit().unwrap();
    let phase = screen.confirm_submit(&fleet, &uploader()).await;

    assert_eq!(phase, SubmitPhase::Failed);
    let writes = fleet.writes();
    assert_eq!(writes.len(), 1);
    assert!(matches!(writes[0], Call::UpdateVehicle(id, _) if id == VehicleId::new(7)));

    let message = screen.modal().message;
    assert!(message.starts_with("Failed to update vehicle: "));
    assert!(message.contains("connection reset by peer"));

    assert_eq!(fleet.variants_of(VehicleId::new(7)).len(), 2);
}

#[tokio::test]
async fn test_edit_replaces_variant_rows() {
    let fleet = seeded_fleet();

    let mut screen = ListingScreen::editing(&stored_vehicle(7));
    screen.mount(&fleet).await;
    screen.edit(FieldEdit::PricePerDay("135".to_string()));
    screen.edit(VariantEdit::TotalQuantity(VariantKey::new(71), 4));
    add_variant(&mut screen, "Silver", None);

    screen.press_submit().unwrap();
    assert_eq!(screen.modal().title, "Update Vehicle");
    let phase = screen.confirm_submit(&fleet, &uploader()).await;
    assert_eq!(phase, SubmitPhase::Succeeded);
    assert_eq!(
        screen.modal().message,
        "Vehicle updated successfully! All changes have been saved."
    );

    let writes = fleet.writes();
    assert_eq!(writes.len(), 3, "unexpected writes: {writes:?}");
    let Call::UpdateVehicle(_, record) = &writes[0] else {
        panic!("expected update first, got {:?}", writes[0]);
    };
    assert_eq!(record.created_at, None);
    assert_eq!(record.total_quantity, 2 + 4 + 1);
    assert_eq!(record.available_quantity, 1 + 1 + 1);
    assert_eq!(writes[1], Call::DeleteVariants(VehicleId::new(7)));
    assert!(matches!(&writes[2], Call::InsertVariants(rows) if rows.len() == 3));

    // Stored photos are kept without uploading them again.
    let rows = fleet.variants_of(VehicleId::new(7));
    let white = rows.iter().find(|r| r.color == "White").unwrap();
    assert_eq!(
        white.image_url.as_deref(),
        Some(format!("{PUBLIC_BASE}/vehicle-variants/old_70.jpg").as_str())
    );
    assert!(fleet.object_keys().is_empty());
}

#[tokio::test]
async fn test_edit_delete_failure_aborts_before_insert() {
    let fleet = seeded_fleet();
    fleet.fail(Op::DeleteVariants, "permission denied for table vehicle_variants");

    let mut screen = ListingScreen::editing(&stored_vehicle(7));
    screen.mount(&fleet).await;
    screen.press_submit().unwrap();
    let phase = screen.confirm_submit(&fleet, &uploader()).await;

    assert_eq!(phase, SubmitPhase::Failed);
    let writes = fleet.writes();
    assert_eq!(writes.len(), 2);
    assert!(matches!(writes[1], Call::DeleteVariants(_)));
    assert!(
        screen
            .modal()
            .message
            .contains("permission denied for table vehicle_variants")
    );
}

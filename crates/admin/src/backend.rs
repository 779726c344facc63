//! Backend seams used by the listing workflow.
//!
//! The workflow only needs a handful of table operations and an object store.
//! [`SupabaseClient`](crate::supabase::SupabaseClient) implements both traits;
//! tests substitute an in-memory implementation.

use std::future::Future;

use fleet_core::VehicleId;

use crate::models::{NewVariantRow, Owner, VariantRow, Vehicle, VehicleRecord};
use crate::supabase::SupabaseError;

/// Table operations on `vehicles`, `vehicle_variants` and `car_owners`.
pub trait FleetBackend: Sync {
    /// Active owners ordered by name.
    fn active_owners(&self) -> impl Future<Output = Result<Vec<Owner>, SupabaseError>> + Send;

    /// Fetch one vehicle by id.
    fn vehicle(
        &self,
        id: VehicleId,
    ) -> impl Future<Output = Result<Vehicle, SupabaseError>> + Send;

    /// Insert a vehicle and return the stored row (with its generated id).
    fn insert_vehicle(
        &self,
        record: &VehicleRecord,
    ) -> impl Future<Output = Result<Vehicle, SupabaseError>> + Send;

    /// Update the vehicle with the given id.
    fn update_vehicle(
        &self,
        id: VehicleId,
        record: &VehicleRecord,
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;

    /// All variant rows belonging to a vehicle.
    fn variants_for_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> impl Future<Output = Result<Vec<VariantRow>, SupabaseError>> + Send;

    /// Delete every variant row belonging to a vehicle.
    fn delete_variants_for_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;

    /// Bulk insert variant rows.
    fn insert_variants(
        &self,
        rows: &[NewVariantRow],
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;
}

/// Write-once object storage for variant photos.
pub trait ObjectStorage: Sync {
    /// Upload bytes under `key`. Must fail if the key already exists.
    fn upload_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), SupabaseError>> + Send;

    /// Publicly resolvable URL for `key`.
    fn public_url(&self, key: &str) -> String;
}

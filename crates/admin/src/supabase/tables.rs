//! PostgREST operations on the fleet tables.

use tracing::{info, instrument};

use fleet_core::VehicleId;

use crate::backend::FleetBackend;
use crate::models::{NewVariantRow, Owner, VariantRow, Vehicle, VehicleRecord};

use super::{SupabaseClient, SupabaseError};

const VEHICLES: &str = "vehicles";
const VEHICLE_VARIANTS: &str = "vehicle_variants";
const CAR_OWNERS: &str = "car_owners";

impl SupabaseClient {
    /// List active owners ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the rows cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_active_owners(&self) -> Result<Vec<Owner>, SupabaseError> {
        let url = self.table_query(
            CAR_OWNERS,
            &[("select", "*"), ("status", "eq.active"), ("order", "name.asc")],
        )?;

        let owners: Vec<Owner> = self.send_json(self.http().get(url)).await?;
        info!(count = owners.len(), "Fetched active owners");
        Ok(owners)
    }

    /// Fetch a single vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::NotFound`] if no row has this id.
    #[instrument(skip(self))]
    pub async fn get_vehicle(&self, id: VehicleId) -> Result<Vehicle, SupabaseError> {
        let filter = format!("eq.{id}");
        let url = self.table_query(VEHICLES, &[("select", "*"), ("id", filter.as_str())])?;

        let rows: Vec<Vehicle> = self.send_json(self.http().get(url)).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound(format!("vehicle {id}")))
    }

    /// Insert a vehicle and return the stored row.
    ///
    /// # Errors
    ///
    /// Returns an error if PostgREST rejects the row or returns nothing.
    #[instrument(skip(self, record), fields(make = %record.make, model = %record.model))]
    pub async fn create_vehicle(&self, record: &VehicleRecord) -> Result<Vehicle, SupabaseError> {
        let request = self
            .http()
            .post(self.table_url(VEHICLES))
            .header("Prefer", "return=representation")
            .json(&[record]);

        let rows: Vec<Vehicle> = self.send_json(request).await?;
        let vehicle = rows
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound("inserted vehicle row".to_string()))?;

        info!(vehicle_id = %vehicle.id, "Vehicle inserted");
        Ok(vehicle)
    }

    /// Update a vehicle by id.
    ///
    /// # Errors
    ///
    /// Returns an error if PostgREST rejects the update.
    #[instrument(skip(self, record))]
    pub async fn patch_vehicle(
        &self,
        id: VehicleId,
        record: &VehicleRecord,
    ) -> Result<(), SupabaseError> {
        let filter = format!("eq.{id}");
        let url = self.table_query(VEHICLES, &[("id", filter.as_str())])?;

        self.send(
            self.http()
                .patch(url)
                .header("Prefer", "return=minimal")
                .json(record),
        )
        .await?;

        info!(vehicle_id = %id, "Vehicle updated");
        Ok(())
    }

    /// List variant rows for a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the rows cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_variants(&self, vehicle_id: VehicleId) -> Result<Vec<VariantRow>, SupabaseError> {
        let filter = format!("eq.{vehicle_id}");
        let url = self.table_query(
            VEHICLE_VARIANTS,
            &[("select", "*"), ("vehicle_id", filter.as_str()), ("order", "id.asc")],
        )?;

        self.send_json(self.http().get(url)).await
    }

    /// Delete all variant rows for a vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if PostgREST rejects the delete.
    #[instrument(skip(self))]
    pub async fn delete_variants(&self, vehicle_id: VehicleId) -> Result<(), SupabaseError> {
        let filter = format!("eq.{vehicle_id}");
        let url = self.table_query(VEHICLE_VARIANTS, &[("vehicle_id", filter.as_str())])?;

        self.send(self.http().delete(url)).await?;
        info!(vehicle_id = %vehicle_id, "Old variants deleted");
        Ok(())
    }

    /// Bulk insert variant rows in one request.
    ///
    /// # Errors
    ///
    /// Returns an error if PostgREST rejects any row (the batch is atomic on
    /// the server side).
    #[instrument(skip(self, rows), fields(count = rows.len()))]
    pub async fn create_variants(&self, rows: &[NewVariantRow]) -> Result<(), SupabaseError> {
        if rows.is_empty() {
            return Ok(());
        }

        self.send(
            self.http()
                .post(self.table_url(VEHICLE_VARIANTS))
                .header("Prefer", "return=minimal")
                .json(rows),
        )
        .await?;

        info!(count = rows.len(), "Variants inserted");
        Ok(())
    }
}

impl FleetBackend for SupabaseClient {
    async fn active_owners(&self) -> Result<Vec<Owner>, SupabaseError> {
        self.list_active_owners().await
    }

    async fn vehicle(&self, id: VehicleId) -> Result<Vehicle, SupabaseError> {
        self.get_vehicle(id).await
    }

    async fn insert_vehicle(&self, record: &VehicleRecord) -> Result<Vehicle, SupabaseError> {
        self.create_vehicle(record).await
    }

    async fn update_vehicle(
        &self,
        id: VehicleId,
        record: &VehicleRecord,
    ) -> Result<(), SupabaseError> {
        self.patch_vehicle(id, record).await
    }

    async fn variants_for_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Vec<VariantRow>, SupabaseError> {
        self.list_variants(vehicle_id).await
    }

    async fn delete_variants_for_vehicle(&self, vehicle_id: VehicleId) -> Result<(), SupabaseError> {
        self.delete_variants(vehicle_id).await
    }

    async fn insert_variants(&self, rows: &[NewVariantRow]) -> Result<(), SupabaseError> {
        self.create_variants(rows).await
    }
}

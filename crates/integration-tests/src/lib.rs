//! Integration tests for Fleet Admin.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fleet-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `listing_submit` - Vehicle and variant writes, photo uploads
//! - `listing_screen` - Screen bootstrap and submit state machine
//!
//! Tests run against [`MemoryFleet`], an in-memory [`FleetBackend`] and
//! [`ObjectStorage`] that records every call and can be told to fail.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use fleet_admin::models::{NewVariantRow, Owner, VariantRow, Vehicle, VehicleRecord};
use fleet_admin::{FleetBackend, ObjectStorage, SupabaseError};
use fleet_core::{DailyRate, OwnerId, OwnerStatus, VariantId, VehicleId, VehicleType};

/// Base of the public URLs handed out by [`MemoryFleet`].
pub const PUBLIC_BASE: &str = "https://storage.test/vehicle-images";

/// One backend call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ActiveOwners,
    Vehicle(VehicleId),
    InsertVehicle(VehicleRecord),
    UpdateVehicle(VehicleId, VehicleRecord),
    VariantsForVehicle(VehicleId),
    DeleteVariants(VehicleId),
    InsertVariants(Vec<NewVariantRow>),
    Upload { key: String, content_type: String },
}

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ActiveOwners,
    InsertVehicle,
    UpdateVehicle,
    VariantsForVehicle,
    DeleteVariants,
    InsertVariants,
    Upload,
}

#[derive(Debug, Default)]
struct State {
    owners: Vec<Owner>,
    vehicles: BTreeMap<VehicleId, Vehicle>,
    variants: Vec<VariantRow>,
    objects: HashMap<String, Vec<u8>>,
    calls: Vec<Call>,
    failures: HashMap<Op, String>,
    upload_delays: Vec<(String, Duration)>,
    next_vehicle_id: i64,
    next_variant_id: i64,
}

/// In-memory fleet backend.
#[derive(Debug, Default)]
pub struct MemoryFleet {
    state: Mutex<State>,
}

impl MemoryFleet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed active and inactive owners.
    #[must_use]
    pub fn with_owners(self, owners: Vec<Owner>) -> Self {
        self.lock().owners = owners;
        self
    }

    /// Seed a stored vehicle with its variant rows.
    #[must_use]
    pub fn with_vehicle(self, vehicle: Vehicle, variants: Vec<VariantRow>) -> Self {
        {
            let mut state = self.lock();
            state.next_vehicle_id = state.next_vehicle_id.max(vehicle.id.as_i64());
            for row in &variants {
                state.next_variant_id = state.next_variant_id.max(row.id.as_i64());
            }
            state.vehicles.insert(vehicle.id, vehicle);
            state.variants.extend(variants);
        }
        self
    }

    /// Make every later call of `op` fail with `message`.
    pub fn fail(&self, op: Op, message: &str) {
        self.lock().failures.insert(op, message.to_string());
    }

    /// Hold uploads whose key ends with `suffix` for `delay` before they
    /// are recorded.
    pub fn delay_uploads(&self, suffix: &str, delay: Duration) {
        self.lock().upload_delays.push((suffix.to_string(), delay));
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Calls that write rows or objects.
    #[must_use]
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                !matches!(
                    c,
                    Call::ActiveOwners | Call::Vehicle(_) | Call::VariantsForVehicle(_)
                )
            })
            .collect()
    }

    #[must_use]
    pub fn vehicles(&self) -> Vec<Vehicle> {
        self.lock().vehicles.values().cloned().collect()
    }

    #[must_use]
    pub fn variants_of(&self, vehicle_id: VehicleId) -> Vec<VariantRow> {
        self.lock()
            .variants
            .iter()
            .filter(|v| v.vehicle_id == vehicle_id)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().objects.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: Call, op: Op) -> Result<MutexGuard<'_, State>, SupabaseError> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(message) = state.failures.get(&op).cloned() {
            return Err(SupabaseError::Request(message));
        }
        Ok(state)
    }
}

impl FleetBackend for MemoryFleet {
    async fn active_owners(&self) -> Result<Vec<Owner>, SupabaseError> {
        let state = self.record(Call::ActiveOwners, Op::ActiveOwners)?;
        let mut owners: Vec<Owner> = state
            .owners
            .iter()
            .filter(|o| o.status == OwnerStatus::Active)
            .cloned()
            .collect();
        owners.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(owners)
    }

    async fn vehicle(&self, id: VehicleId) -> Result<Vehicle, SupabaseError> {
        let mut state = self.lock();
        state.calls.push(Call::Vehicle(id));
        state
            .vehicles
            .get(&id)
            .cloned()
            .ok_or_else(|| SupabaseError::NotFound(format!("vehicle {id}")))
    }

    async fn insert_vehicle(&self, record: &VehicleRecord) -> Result<Vehicle, SupabaseError> {
        let mut state = self.record(Call::InsertVehicle(record.clone()), Op::InsertVehicle)?;
        state.next_vehicle_id += 1;
        let vehicle = vehicle_from_record(VehicleId::new(state.next_vehicle_id), record);
        state.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn update_vehicle(
        &self,
        id: VehicleId,
        record: &VehicleRecord,
    ) -> Result<(), SupabaseError> {
        let mut state = self.record(Call::UpdateVehicle(id, record.clone()), Op::UpdateVehicle)?;
        let created_at = state.vehicles.get(&id).and_then(|v| v.created_at);
        let mut vehicle = vehicle_from_record(id, record);
        vehicle.created_at = created_at;
        state.vehicles.insert(id, vehicle);
        Ok(())
    }

    async fn variants_for_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Vec<VariantRow>, SupabaseError> {
        let state = self.record(Call::VariantsForVehicle(vehicle_id), Op::VariantsForVehicle)?;
        Ok(state
            .variants
            .iter()
            .filter(|v| v.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }

    async fn delete_variants_for_vehicle(&self, vehicle_id: VehicleId) -> Result<(), SupabaseError> {
        let mut state = self.record(Call::DeleteVariants(vehicle_id), Op::DeleteVariants)?;
        state.variants.retain(|v| v.vehicle_id != vehicle_id);
        Ok(())
    }

    async fn insert_variants(&self, rows: &[NewVariantRow]) -> Result<(), SupabaseError> {
        let mut state = self.record(Call::InsertVariants(rows.to_vec()), Op::InsertVariants)?;
        for row in rows {
            state.next_variant_id += 1;
            let id = VariantId::new(state.next_variant_id);
            state.variants.push(VariantRow {
                id,
                vehicle_id: row.vehicle_id,
                color: row.color.clone(),
                image_url: row.image_url.clone(),
                total_quantity: row.total_quantity,
                available_quantity: row.available_quantity,
                created_at: Some(row.created_at),
                updated_at: Some(row.updated_at),
            });
        }
        Ok(())
    }
}

impl ObjectStorage for MemoryFleet {
    async fn upload_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SupabaseError> {
        let delay = self
            .lock()
            .upload_delays
            .iter()
            .find(|(suffix, _)| key.ends_with(suffix.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let call = Call::Upload {
            key: key.to_string(),
            content_type: content_type.to_string(),
        };
        let mut state = self.record(call, Op::Upload)?;
        if state.objects.contains_key(key) {
            return Err(SupabaseError::Api {
                status: 409,
                code: Some("Duplicate".to_string()),
                message: "The resource already exists".to_string(),
            });
        }
        state.objects.insert(key.to_string(), bytes);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{PUBLIC_BASE}/{key}")
    }
}

fn vehicle_from_record(id: VehicleId, record: &VehicleRecord) -> Vehicle {
    Vehicle {
        id,
        make: record.make.clone(),
        model: record.model.clone(),
        year: record.year,
        vehicle_type: record.vehicle_type,
        seats: record.seats,
        price_per_day: record.price_per_day,
        mileage: record.mileage,
        description: Some(record.description.clone()),
        available: record.available,
        owner_id: record.owner_id,
        total_quantity: record.total_quantity,
        available_quantity: record.available_quantity,
        image_url: record.image_url.clone(),
        created_at: record.created_at,
        updated_at: Some(record.updated_at),
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// An owner with the given status.
#[must_use]
pub fn owner(id: i64, name: &str, status: OwnerStatus) -> Owner {
    Owner {
        id: OwnerId::new(id),
        name: name.to_string(),
        email: Some(format!("{}@fleet.test", name.to_ascii_lowercase())),
        status,
    }
}

/// A stored BMW X5 with the given id.
#[must_use]
pub fn stored_vehicle(id: i64) -> Vehicle {
    Vehicle {
        id: VehicleId::new(id),
        make: "BMW".to_string(),
        model: "X5".to_string(),
        year: 2021,
        vehicle_type: Some(VehicleType::Suv),
        seats: 7,
        price_per_day: DailyRate::parse("120").expect("literal rate"),
        mileage: Some(25_000),
        description: Some("Family SUV".to_string()),
        available: true,
        owner_id: Some(OwnerId::new(1)),
        total_quantity: 3,
        available_quantity: 2,
        image_url: Some(format!("{PUBLIC_BASE}/vehicle-variants/old_white.jpg")),
        created_at: None,
        updated_at: None,
    }
}

/// A stored variant row.
#[must_use]
pub fn stored_variant(id: i64, vehicle_id: i64, color: &str, total: u32, available: u32) -> VariantRow {
    VariantRow {
        id: VariantId::new(id),
        vehicle_id: VehicleId::new(vehicle_id),
        color: color.to_string(),
        image_url: Some(format!("{PUBLIC_BASE}/vehicle-variants/old_{id}.jpg")),
        total_quantity: total,
        available_quantity: available,
        created_at: None,
        updated_at: None,
    }
}

/// Write `bytes` to a fresh file under the system temp dir and return its
/// path as an image reference.
#[must_use]
pub fn temp_image(extension: &str, bytes: &[u8]) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);

    let path: PathBuf = std::env::temp_dir().join(format!(
        "fleet-it-{}-{n}.{extension}",
        std::process::id()
    ));
    if let Err(e) = std::fs::write(&path, bytes) {
        panic!("failed to write {}: {e}", path.display());
    }
    path.display().to_string()
}

/// A reference to a file that does not exist.
#[must_use]
pub fn missing_image() -> String {
    std::env::temp_dir()
        .join(format!("fleet-it-missing-{}.jpg", std::process::id()))
        .display()
        .to_string()
}

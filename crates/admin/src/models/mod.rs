//! Domain models for the fleet tables.
//!
//! Row types mirror the Supabase tables column-for-column so they can be
//! (de)serialized straight from PostgREST JSON:
//!
//! - `vehicles` - [`Vehicle`] (read) and [`VehicleRecord`] (write)
//! - `vehicle_variants` - [`VariantRow`] (read) and [`NewVariantRow`] (write)
//! - `car_owners` - [`Owner`]

pub mod owner;
pub mod variant;
pub mod vehicle;

pub use owner::Owner;
pub use variant::{NewVariantRow, VariantRow};
pub use vehicle::{Vehicle, VehicleDraft, VehicleRecord};

//! Color variant rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleet_core::{VariantId, VehicleId};

/// A row of the `vehicle_variants` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRow {
    pub id: VariantId,
    pub vehicle_id: VehicleId,
    pub color: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub total_quantity: u32,
    pub available_quantity: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for one row of the bulk insert into `vehicle_variants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVariantRow {
    pub vehicle_id: VehicleId,
    pub color: String,
    pub image_url: Option<String>,
    pub total_quantity: u32,
    pub available_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

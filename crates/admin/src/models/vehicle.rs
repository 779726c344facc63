//! Vehicle listing models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use fleet_core::{DailyRate, OwnerId, VehicleId, VehicleType};

/// A row of the `vehicles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Generated identity.
    pub id: VehicleId,
    /// Manufacturer, e.g. "Toyota".
    pub make: String,
    /// Model name, e.g. "Camry".
    pub model: String,
    /// Model year.
    pub year: i32,
    /// Body type. Legacy rows may hold an empty string, read as `None`.
    #[serde(rename = "type", default, deserialize_with = "lenient_vehicle_type")]
    pub vehicle_type: Option<VehicleType>,
    /// Seat count.
    pub seats: u32,
    /// Rental price per day.
    pub price_per_day: DailyRate,
    /// Odometer reading, if known.
    #[serde(default)]
    pub mileage: Option<u32>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the listing is open for booking.
    pub available: bool,
    /// Owner supplying the vehicle.
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
    /// Sum of variant total quantities.
    #[serde(default)]
    pub total_quantity: u32,
    /// Sum of variant available quantities.
    #[serde(default)]
    pub available_quantity: u32,
    /// Primary photo (first variant's image).
    #[serde(default)]
    pub image_url: Option<String>,
    /// Row creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated vehicle fields, ready to be turned into a [`VehicleRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleDraft {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vehicle_type: Option<VehicleType>,
    pub seats: u32,
    pub price_per_day: DailyRate,
    pub mileage: Option<u32>,
    pub description: String,
    pub available: bool,
    pub owner_id: Option<OwnerId>,
}

/// Payload written to `vehicles` on insert or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRecord {
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub vehicle_type: Option<VehicleType>,
    pub seats: u32,
    pub price_per_day: DailyRate,
    pub mileage: Option<u32>,
    pub description: String,
    pub available: bool,
    pub total_quantity: u32,
    pub available_quantity: u32,
    pub image_url: Option<String>,
    pub owner_id: Option<OwnerId>,
    pub updated_at: DateTime<Utc>,
    /// Only sent on insert; updates leave the original timestamp alone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl VehicleRecord {
    /// Build the row payload from a draft and the aggregates computed over
    /// the submitted variants.
    #[must_use]
    pub fn from_draft(
        draft: &VehicleDraft,
        total_quantity: u32,
        available_quantity: u32,
        image_url: Option<String>,
        now: DateTime<Utc>,
        is_new: bool,
    ) -> Self {
        Self {
            make: draft.make.clone(),
            model: draft.model.clone(),
            year: draft.year,
            vehicle_type: draft.vehicle_type,
            seats: draft.seats,
            price_per_day: draft.price_per_day,
            mileage: draft.mileage,
            description: draft.description.clone(),
            available: draft.available,
            total_quantity,
            available_quantity,
            image_url,
            owner_id: draft.owner_id,
            updated_at: now,
            created_at: is_new.then_some(now),
        }
    }
}

/// Read `type`, mapping empty or unknown values to `None` instead of failing
/// the whole row.
fn lenient_vehicle_type<'de, D>(deserializer: D) -> Result<Option<VehicleType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> VehicleDraft {
        VehicleDraft {
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2023,
            vehicle_type: Some(VehicleType::Sedan),
            seats: 5,
            price_per_day: DailyRate::parse("50").unwrap(),
            mileage: None,
            description: String::new(),
            available: true,
            owner_id: Some(OwnerId::new(3)),
        }
    }

    #[test]
    fn test_vehicle_row_deserializes_legacy_empty_type() {
        let row = json!({
            "id": 9,
            "make": "Honda",
            "model": "Civic",
            "year": 2020,
            "type": "",
            "seats": 5,
            "price_per_day": 42.5,
            "mileage": null,
            "description": null,
            "available": true,
            "owner_id": null,
            "total_quantity": 3,
            "available_quantity": 1,
            "image_url": null,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00+00:00"
        });

        let vehicle: Vehicle = serde_json::from_value(row).unwrap();
        assert_eq!(vehicle.id, VehicleId::new(9));
        assert_eq!(vehicle.vehicle_type, None);
        assert_eq!(vehicle.price_per_day.to_string(), "42.50");
        assert_eq!(vehicle.total_quantity, 3);
    }

    #[test]
    fn test_record_for_insert_carries_created_at() {
        let now = Utc::now();
        let record = VehicleRecord::from_draft(&draft(), 2, 2, None, now, true);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["type"], "Sedan");
        assert_eq!(value["price_per_day"], 50.0);
        assert_eq!(value["owner_id"], 3);
        assert!(value["image_url"].is_null());
        assert!(value.get("created_at").is_some());
    }

    #[test]
    fn test_record_for_update_omits_created_at() {
        let record = VehicleRecord::from_draft(&draft(), 4, 1, None, Utc::now(), false);
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("created_at").is_none());
        assert_eq!(value["total_quantity"], 4);
        assert_eq!(value["available_quantity"], 1);
    }
}

//! Enums for vehicle classification and owner status.

use serde::{Deserialize, Serialize};

/// Body type of a vehicle listing.
///
/// Stored in `vehicles.type` using the display names below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Hatchback,
    Convertible,
    Truck,
    Van,
    Luxury,
}

impl VehicleType {
    /// All vehicle types in selector order.
    pub const ALL: [Self; 7] = [
        Self::Sedan,
        Self::Suv,
        Self::Hatchback,
        Self::Convertible,
        Self::Truck,
        Self::Van,
        Self::Luxury,
    ];

    /// Display name, identical to the stored value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sedan => "Sedan",
            Self::Suv => "SUV",
            Self::Hatchback => "Hatchback",
            Self::Convertible => "Convertible",
            Self::Truck => "Truck",
            Self::Van => "Van",
            Self::Luxury => "Luxury",
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid vehicle type: {s}"))
    }
}

/// Lifecycle status of a car owner.
///
/// Only active owners are offered in the owner picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OwnerStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl OwnerStatus {
    /// Value stored in `car_owners.status`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for OwnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OwnerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "suspended" => Ok(Self::Suspended),
            _ => Err(format!("invalid owner status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_type_round_trips_through_str() {
        for vehicle_type in VehicleType::ALL {
            assert_eq!(vehicle_type.as_str().parse::<VehicleType>(), Ok(vehicle_type));
        }
        assert_eq!("suv".parse::<VehicleType>(), Ok(VehicleType::Suv));
        assert!("Spaceship".parse::<VehicleType>().is_err());
    }

    #[test]
    fn test_vehicle_type_serde_uses_display_names() {
        assert_eq!(serde_json::to_string(&VehicleType::Suv).unwrap(), "\"SUV\"");
        assert_eq!(
            serde_json::from_str::<VehicleType>("\"Convertible\"").unwrap(),
            VehicleType::Convertible
        );
    }

    #[test]
    fn test_owner_status_serde() {
        assert_eq!(
            serde_json::to_string(&OwnerStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!("suspended".parse::<OwnerStatus>(), Ok(OwnerStatus::Suspended));
    }
}

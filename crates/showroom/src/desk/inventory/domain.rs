use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub String);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sales availability of a vehicle, owned by the inventory subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    Reserved,
    Negotiating,
    Sold,
}

impl VehicleStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Available,
            Self::Reserved,
            Self::Negotiating,
            Self::Sold,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Reserved => "Reserved",
            Self::Negotiating => "In Negotiation",
            Self::Sold => "Sold",
        }
    }
}

/// Catalog entry consumed by the desk as a read-only lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub list_price: u32,
    pub status: VehicleStatus,
}

use super::domain::{Vehicle, VehicleId};

/// Read-only view of the dealership inventory. The desk never mutates
/// vehicles; it only resolves identifiers and enriches its own records.
pub trait VehicleCatalog: Send + Sync {
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, CatalogError>;
    fn all(&self) -> Result<Vec<Vehicle>, CatalogError>;
}

/// Error enumeration for catalog lookups.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("inventory catalog unavailable: {0}")]
    Unavailable(String),
}

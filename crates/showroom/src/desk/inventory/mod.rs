pub mod catalog;
pub mod domain;

pub use catalog::{CatalogError, VehicleCatalog};
pub use domain::{Vehicle, VehicleId, VehicleStatus};

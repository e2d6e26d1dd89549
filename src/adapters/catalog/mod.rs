//! Stock catalog adapters: remote inventory source plus a TTL cache.

mod cached;
mod remote;

pub use cached::CachedCatalog;
pub use remote::{CatalogError, HttpVehicleSource, VehicleSource};

//! Vehicle stock model, filtering and pagination.
//!
//! The stock itself is owned by an external inventory source; this module
//! only describes vehicles and provides pure query functions over a
//! snapshot of them.

mod filter;
mod vehicle;

pub use filter::{find_by_id, query, CatalogPage, VehicleFilter, PAGE_SIZE};
pub use vehicle::{
    format_brl, group_thousands, BodyType, PriceTier, Vehicle, VehicleId, MAX_IMAGES,
};

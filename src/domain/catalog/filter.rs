//! Stock filtering and pagination.
//!
//! Pure functions over a stock snapshot. Pagination is 1-indexed with a
//! fixed page size of five, matching what a list menu comfortably shows.

use super::vehicle::{BodyType, Vehicle, VehicleId};

/// Vehicles shown per list page.
pub const PAGE_SIZE: usize = 5;

/// A stock filter the customer can pick from the category menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleFilter {
    /// Priced up to R$ 30.000 inclusive.
    Under30,
    /// Priced up to R$ 50.000 inclusive.
    Under50,
    /// Priced up to R$ 80.000 inclusive.
    Under80,
    Automatic,
    Economic,
    /// No filtering at all.
    All,
}

impl VehicleFilter {
    /// Resolves a wire key (`filter:<key>` selections) into a filter.
    ///
    /// Unknown keys fall back to [`VehicleFilter::All`] so a stale or
    /// malformed selection still produces a sensible listing.
    pub fn from_key(key: &str) -> Self {
        match key {
            "ate30" => Self::Under30,
            "ate50" => Self::Under50,
            "ate80" => Self::Under80,
            "automatico" => Self::Automatic,
            "economico" => Self::Economic,
            "todos" => Self::All,
            _ => Self::All,
        }
    }

    /// The wire key used in menu selection ids.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Under30 => "ate30",
            Self::Under50 => "ate50",
            Self::Under80 => "ate80",
            Self::Automatic => "automatico",
            Self::Economic => "economico",
            Self::All => "todos",
        }
    }

    /// Customer-facing label for the category menu.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Under30 => "Até R$30 mil",
            Self::Under50 => "Até R$50 mil",
            Self::Under80 => "Até R$80 mil",
            Self::Automatic => "Automático",
            Self::Economic => "Econômico",
            Self::All => "Ver todos veículos",
        }
    }

    /// Inclusive price ceiling for the price-band filters.
    pub fn price_ceiling(&self) -> Option<i64> {
        match self {
            Self::Under30 => Some(30_000),
            Self::Under50 => Some(50_000),
            Self::Under80 => Some(80_000),
            _ => None,
        }
    }

    fn matches(&self, vehicle: &Vehicle) -> bool {
        match self {
            Self::All => true,
            Self::Automatic => vehicle.body_type == BodyType::Automatic,
            Self::Economic => vehicle.body_type == BodyType::Economic,
            Self::Under30 | Self::Under50 | Self::Under80 => {
                let ceiling = self.price_ceiling().unwrap_or(i64::MAX);
                vehicle.price >= 0 && vehicle.price <= ceiling
            }
        }
    }
}

/// One page of matching vehicles plus pagination metadata.
#[derive(Debug, Clone)]
pub struct CatalogPage<'a> {
    /// At most [`PAGE_SIZE`] vehicles, in snapshot order.
    pub items: Vec<&'a Vehicle>,
    /// Total vehicles matching the filter, across all pages.
    pub total: usize,
    /// The 1-indexed page this slice represents.
    pub page: u32,
    /// Whether further matching vehicles exist beyond this page.
    pub has_more: bool,
    /// Total page count for the filter.
    pub total_pages: u32,
}

/// Returns the given page of vehicles matching the filter.
///
/// Pages are 1-indexed; a page beyond the end yields an empty `items`
/// with `has_more == false`.
pub fn query<'a>(vehicles: &'a [Vehicle], filter: VehicleFilter, page: u32) -> CatalogPage<'a> {
    let page = page.max(1);
    let matching: Vec<&Vehicle> = vehicles.iter().filter(|v| filter.matches(v)).collect();
    let total = matching.len();

    let start = (page as usize - 1) * PAGE_SIZE;
    let items: Vec<&Vehicle> = matching.into_iter().skip(start).take(PAGE_SIZE).collect();
    let has_more = start + items.len() < total;
    let total_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE) as u32;

    CatalogPage {
        items,
        total,
        page,
        has_more,
        total_pages,
    }
}

/// Finds a vehicle by id within the snapshot.
pub fn find_by_id<'a>(vehicles: &'a [Vehicle], id: &VehicleId) -> Option<&'a Vehicle> {
    vehicles.iter().find(|v| &v.id == id)
}

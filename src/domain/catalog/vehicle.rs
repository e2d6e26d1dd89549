//! Vehicle record and its derived categories.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Images kept per vehicle; anything beyond this is discarded at mapping.
pub const MAX_IMAGES: usize = 5;

/// Stable identifier of a vehicle within the stock snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VehicleId(String);

impl VehicleId {
    /// Creates an id from the raw stock value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Price band a vehicle falls into, derived from its price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    /// Up to R$ 30.000 inclusive.
    Under30,
    /// Up to R$ 50.000 inclusive.
    Under50,
    /// Up to R$ 80.000 inclusive.
    Under80,
    /// Above R$ 80.000.
    Premium,
}

impl PriceTier {
    /// Derives the tier from a price in whole reais.
    pub fn from_price(price: i64) -> Self {
        if price <= 30_000 {
            Self::Under30
        } else if price <= 50_000 {
            Self::Under50
        } else if price <= 80_000 {
            Self::Under80
        } else {
            Self::Premium
        }
    }
}

/// Rough vehicle category derived from the model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Automatic,
    Economic,
}

// Model names carry the gearbox as free text ("Onix 1.0 Aut.", "HB20
// Automático"); anything matching `aut` is treated as automatic.
static AUTOMATIC_MODEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)aut").expect("automatic model pattern"));

impl BodyType {
    /// Classifies a model name.
    pub fn from_model(model: &str) -> Self {
        if AUTOMATIC_MODEL.is_match(model) {
            Self::Automatic
        } else {
            Self::Economic
        }
    }

    /// Gearbox label shown on the detail card.
    pub fn transmission_label(&self) -> &'static str {
        match self {
            Self::Automatic => "Automático",
            Self::Economic => "Manual",
        }
    }
}

/// One vehicle of the stock snapshot.
///
/// Built by the inventory adapter from raw stock items; the conversation
/// flow never mutates vehicles, it only filters and renders them.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Brand, model and optionally year, joined for display.
    pub display_name: String,
    /// Price in whole reais (promotional price when one is set).
    pub price: i64,
    /// Odometer reading in km, when the stock item carries one.
    pub mileage: Option<u64>,
    pub color: Option<String>,
    /// Gearbox label, derived from the model name.
    pub transmission: Option<String>,
    pub price_tier: PriceTier,
    pub body_type: BodyType,
    /// Up to [`MAX_IMAGES`] photo URLs.
    pub images: Vec<String>,
}

impl Vehicle {
    /// Price formatted for display (`R$ 59.900`).
    pub fn formatted_price(&self) -> String {
        format_brl(self.price)
    }
}

/// Formats a whole-real amount the Brazilian way, without cents.
pub fn format_brl(value: i64) -> String {
    if value < 0 {
        return format!("-{}", format_brl(-value));
    }
    format!("R$ {}", group_thousands(value as u64))
}

/// Groups digits with `.` as thousands separator (`85000` -> `85.000`).
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

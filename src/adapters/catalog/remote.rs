//! Remote stock source and raw item mapping.
//!
//! The stock API returns loosely-typed items; mapping turns each into a
//! domain [`Vehicle`]: promotional price wins when set, categories are
//! derived, and the `photos` field (a JSON-encoded string) is parsed
//! defensively, yielding no images when invalid.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::catalog::{BodyType, PriceTier, Vehicle, VehicleId, MAX_IMAGES};

/// Errors from the stock API. Callers treat all of them as transient.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("stock API returned status {0}")]
    Status(u16),

    #[error("stock API transport error: {0}")]
    Transport(String),

    #[error("stock API payload could not be decoded: {0}")]
    Malformed(String),
}

/// Source of the full stock list.
#[async_trait]
pub trait VehicleSource: Send + Sync {
    /// Fetches and maps the complete stock.
    async fn fetch(&self) -> Result<Vec<Vehicle>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct StockResponse {
    #[serde(default)]
    items: Vec<RawStockItem>,
}

/// One item as the stock API ships it.
#[derive(Debug, Deserialize)]
pub struct RawStockItem {
    #[serde(default)]
    id: Value,
    brand: Option<String>,
    model: Option<String>,
    year: Option<Value>,
    value: Option<f64>,
    #[serde(rename = "promotionValue")]
    promotion_value: Option<f64>,
    km: Option<Value>,
    color: Option<String>,
    photos: Option<String>,
}

impl RawStockItem {
    /// Maps a raw item into a domain vehicle.
    pub fn into_vehicle(self) -> Vehicle {
        let id = VehicleId::new(loose_string(&self.id).unwrap_or_default());

        let brand = self.brand.unwrap_or_default();
        let model = self.model.unwrap_or_default();
        let base_name = format!("{} {}", brand, model).trim().to_string();
        let display_name = match self.year.as_ref().and_then(loose_string) {
            Some(year) => format!("{} {}", base_name, year),
            None => base_name,
        };

        let price = match self.promotion_value {
            Some(promo) if promo > 0.0 => promo as i64,
            _ => self.value.unwrap_or(0.0) as i64,
        };

        let body_type = BodyType::from_model(&model);

        Vehicle {
            id,
            display_name,
            price,
            mileage: self.km.as_ref().and_then(loose_u64),
            color: self.color,
            transmission: Some(body_type.transmission_label().to_string()),
            price_tier: PriceTier::from_price(price),
            body_type,
            images: parse_photos(self.photos.as_deref()),
        }
    }
}

/// Decodes the JSON-encoded photo list, keeping at most [`MAX_IMAGES`]
/// non-empty URL strings. Invalid JSON yields no images.
fn parse_photos(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(url) if !url.is_empty() => Some(url),
                _ => None,
            })
            .take(MAX_IMAGES)
            .collect(),
        _ => Vec::new(),
    }
}

fn loose_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn loose_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Stock source backed by the dealership's inventory API.
pub struct HttpVehicleSource {
    http: reqwest::Client,
    url: String,
}

impl HttpVehicleSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl VehicleSource for HttpVehicleSource {
    async fn fetch(&self) -> Result<Vec<Vehicle>, CatalogError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let stock: StockResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;

        Ok(stock.items.into_iter().map(RawStockItem::into_vehicle).collect())
    }
}

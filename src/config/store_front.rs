//! Dealership identity used in customer-facing copy.

use serde::Deserialize;

use super::error::ValidationError;

/// Name, address and opening hours of the dealership.
///
/// These values appear verbatim in the welcome message, menu footers,
/// the address card and the `/health` response.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreFrontConfig {
    /// Dealership display name.
    #[serde(default = "default_name")]
    pub name: String,

    /// Street address, newline separated.
    #[serde(default = "default_address")]
    pub address: String,

    /// Opening hours line.
    #[serde(default = "default_opening_hours")]
    pub opening_hours: String,
}

impl StoreFrontConfig {
    /// Validate store front configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "store_front.name",
            });
        }
        Ok(())
    }
}

impl Default for StoreFrontConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            address: default_address(),
            opening_hours: default_opening_hours(),
        }
    }
}

fn default_name() -> String {
    "Andrade Veículos".to_string()
}

fn default_address() -> String {
    "Av. Santos Dumont, 1250\nFeira de Santana - BA, 44001-000".to_string()
}

fn default_opening_hours() -> String {
    "Seg - Sáb: 8h às 18h".to_string()
}

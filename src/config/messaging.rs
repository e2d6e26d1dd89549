//! Messaging provider configuration (Uazapi-style HTTP API).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Configuration for the outbound messaging provider.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Base URL of the provider instance (e.g. `https://acme.uazapi.com`).
    pub base_url: String,

    /// Separate base URL for menu/button sends. Falls back to `base_url`.
    pub menu_base_url: Option<String>,

    /// Instance token sent as both bearer and `token` header.
    pub instance_token: SecretString,

    /// Path for plain text sends.
    #[serde(default = "default_send_text_path")]
    pub send_text_path: String,

    /// Path for media sends.
    #[serde(default = "default_send_image_path")]
    pub send_image_path: String,
}

impl MessagingConfig {
    /// Base URL used for menu and button sends.
    pub fn menu_base_url(&self) -> &str {
        self.menu_base_url.as_deref().unwrap_or(&self.base_url)
    }

    /// Validate messaging configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http") {
            return Err(ValidationError::InvalidUrl {
                field: "messaging.base_url",
                value: self.base_url.clone(),
            });
        }
        if let Some(url) = &self.menu_base_url {
            if !url.starts_with("http") {
                return Err(ValidationError::InvalidUrl {
                    field: "messaging.menu_base_url",
                    value: url.clone(),
                });
            }
        }
        if self.instance_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "messaging.instance_token",
            });
        }
        Ok(())
    }
}

fn default_send_text_path() -> String {
    "/send/text".to_string()
}

fn default_send_image_path() -> String {
    "/send/media".to_string()
}

//! Uazapi HTTP client implementing the [`Messenger`] port.
//!
//! Provider instances differ in which text-send route they expose, so
//! text goes through a fallback chain: the configured path first, then
//! the legacy `/send-message` shapes, advancing only on HTTP 405.
//! Menus and buttons share the `/send/menu` route with a `type` field.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use tracing::warn;

use crate::config::MessagingConfig;
use crate::domain::conversation::{ButtonMenu, ListMenu};
use crate::domain::foundation::PhoneNumber;
use crate::ports::{Messenger, MessengerError};

/// Route shared by list and button sends.
const MENU_PATH: &str = "/send/menu";

/// Messenger backed by a Uazapi-style provider instance.
pub struct UazapiMessenger {
    http: reqwest::Client,
    config: MessagingConfig,
}

impl UazapiMessenger {
    pub fn new(config: MessagingConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// POSTs a JSON body and maps non-success statuses to errors.
    async fn post(&self, base_url: &str, path: &str, body: &Value) -> Result<(), MessengerError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), path);
        let token = self.config.instance_token.expose_secret();

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header("token", token)
            .json(body)
            .send()
            .await
            .map_err(|e| MessengerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MessengerError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Serializes list choices as `label|id|description`.
    fn list_choices(menu: &ListMenu) -> Vec<String> {
        menu.choices
            .iter()
            .map(|c| format!("{}|{}|{}", c.label, c.id, c.description))
            .collect()
    }

    /// Serializes button choices as `label|id`.
    fn button_choices(menu: &ButtonMenu) -> Vec<String> {
        menu.choices
            .iter()
            .map(|c| format!("{}|{}", c.label, c.id))
            .collect()
    }
}

#[async_trait]
impl Messenger for UazapiMessenger {
    async fn send_text(&self, to: &PhoneNumber, body: &str) -> Result<(), MessengerError> {
        let number = to.as_str();
        let attempts = [
            (
                self.config.send_text_path.as_str(),
                json!({"number": number, "text": body}),
            ),
            ("/send-message", json!({"number": number, "message": body})),
            ("/send-message", json!({"phone": number, "message": body})),
        ];

        let mut last_err = None;
        for (path, payload) in &attempts {
            match self.post(&self.config.base_url, path, payload).await {
                Ok(()) => return Ok(()),
                Err(err) if err.is_method_not_allowed() => {
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        Err(last_err.unwrap_or_else(|| MessengerError::Transport("no send path".to_string())))
    }

    async fn send_image(
        &self,
        to: &PhoneNumber,
        uri: &str,
        caption: Option<&str>,
    ) -> Result<(), MessengerError> {
        // The provider renders captions poorly, so they go out as a
        // separate text first; a failed caption must not block the photo.
        if let Some(caption) = caption.filter(|c| !c.is_empty()) {
            if let Err(err) = self.send_text(to, caption).await {
                warn!(identity = %to, error = %err, "caption send failed");
            }
        }

        let body = json!({"number": to.as_str(), "type": "image", "file": uri});
        self.post(&self.config.base_url, &self.config.send_image_path, &body)
            .await
    }

    async fn send_list_menu(
        &self,
        to: &PhoneNumber,
        menu: &ListMenu,
    ) -> Result<(), MessengerError> {
        let body = json!({
            "number": to.as_str(),
            "type": "list",
            "text": menu.text,
            "choices": Self::list_choices(menu),
            "footerText": menu.footer_text,
            "listButton": menu.list_button_label,
        });
        self.post(self.config.menu_base_url(), MENU_PATH, &body).await
    }

    async fn send_button_menu(
        &self,
        to: &PhoneNumber,
        menu: &ButtonMenu,
    ) -> Result<(), MessengerError> {
        let body = json!({
            "number": to.as_str(),
            "type": "button",
            "text": menu.text,
            "choices": Self::button_choices(menu),
        });
        self.post(self.config.menu_base_url(), MENU_PATH, &body).await
    }
}

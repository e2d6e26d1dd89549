//! Outbound messaging port.
//!
//! One method per message shape the conversation flow produces. The
//! application layer decides what a failed send means (abort or log)
//! based on the effect's delivery policy; implementations just report
//! honestly.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::{ButtonMenu, ListMenu};
use crate::domain::foundation::PhoneNumber;

/// Errors from the messaging provider.
#[derive(Debug, Clone, Error)]
pub enum MessengerError {
    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never got a proper answer.
    #[error("transport error: {0}")]
    Transport(String),
}

impl MessengerError {
    /// True for an HTTP 405, the signal to try the next send path.
    pub fn is_method_not_allowed(&self) -> bool {
        matches!(self, Self::Status { status: 405, .. })
    }
}

/// Port for sending messages to a customer.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends plain text.
    async fn send_text(&self, to: &PhoneNumber, body: &str) -> Result<(), MessengerError>;

    /// Sends one image. A caption, when given, goes out as a separate
    /// text message before the image; a failed caption is logged and
    /// does not stop the image send.
    async fn send_image(
        &self,
        to: &PhoneNumber,
        uri: &str,
        caption: Option<&str>,
    ) -> Result<(), MessengerError>;

    /// Sends a list menu.
    async fn send_list_menu(&self, to: &PhoneNumber, menu: &ListMenu)
        -> Result<(), MessengerError>;

    /// Sends a button menu (at most three buttons).
    async fn send_button_menu(
        &self,
        to: &PhoneNumber,
        menu: &ButtonMenu,
    ) -> Result<(), MessengerError>;
}

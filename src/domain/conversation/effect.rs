//! Outbound effects produced by the stage router.
//!
//! Dispatch returns effects as data; the application layer executes them
//! through the [`Messenger`](crate::ports::Messenger) port. Each effect
//! kind carries an explicit delivery policy, so "photo sends are
//! best-effort" is a stated rule instead of an unchecked call.

/// Reply buttons a provider will render, at most [`MAX_BUTTONS`].
pub const MAX_BUTTONS: usize = 3;

/// One row of a list menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuChoice {
    pub label: String,
    /// Selection id echoed back in the customer's tap.
    pub id: String,
    /// Secondary line; empty is fine.
    pub description: String,
}

impl MenuChoice {
    pub fn new(
        label: impl Into<String>,
        id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
            description: description.into(),
        }
    }
}

/// A list menu: header text, footer, the button that opens the list and
/// its choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMenu {
    pub text: String,
    pub footer_text: String,
    pub list_button_label: String,
    pub choices: Vec<MenuChoice>,
}

/// One reply button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonChoice {
    pub label: String,
    pub id: String,
}

impl ButtonChoice {
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
        }
    }
}

/// A button menu. Providers cap reply buttons at three; the constructor
/// enforces the cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonMenu {
    pub text: String,
    pub choices: Vec<ButtonChoice>,
}

impl ButtonMenu {
    pub fn new(text: impl Into<String>, mut choices: Vec<ButtonChoice>) -> Self {
        choices.truncate(MAX_BUTTONS);
        Self {
            text: text.into(),
            choices,
        }
    }
}

/// Whether a failed send aborts the reply or is merely logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Failure aborts the remaining effects of this event.
    Required,
    /// Failure is logged and the remaining effects still run.
    BestEffort,
}

/// One outbound send, in the order the router emitted it.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SendText {
        body: String,
    },
    /// Photo send. The caption, when present, goes out as a separate
    /// text message before the photo.
    SendImage {
        uri: String,
        caption: Option<String>,
    },
    SendListMenu(ListMenu),
    SendButtonMenu(ButtonMenu),
}

impl Effect {
    /// Convenience constructor for plain text.
    pub fn text(body: impl Into<String>) -> Self {
        Self::SendText { body: body.into() }
    }

    /// Delivery policy for this effect kind. Photos are decoration; the
    /// conversation must not die because one of them failed to upload.
    pub fn delivery_policy(&self) -> DeliveryPolicy {
        match self {
            Self::SendImage { .. } => DeliveryPolicy::BestEffort,
            _ => DeliveryPolicy::Required,
        }
    }

    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SendText { .. } => "text",
            Self::SendImage { .. } => "image",
            Self::SendListMenu(_) => "list_menu",
            Self::SendButtonMenu(_) => "button_menu",
        }
    }
}

//! Conversation stages.

use serde::{Deserialize, Serialize};

/// Where a customer currently is within the menu flow.
///
/// Every conversation starts at `Menu`. `Transfer` marks the hand-off to
/// a human seller; the bot resumes with the welcome menu on the next
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Main menu shown, waiting for an option.
    Menu,
    /// Category filter menu shown.
    Filter,
    /// Paged vehicle list shown.
    List,
    /// Single vehicle card shown.
    VehicleDetail,
    /// Waiting for financing details before hand-off.
    Financing,
    /// Waiting for trade-in details before hand-off.
    Trade,
    /// A human seller has taken over.
    Transfer,
}

impl Stage {
    /// All stages, for table-driven tests.
    pub fn all() -> [Stage; 7] {
        [
            Stage::Menu,
            Stage::Filter,
            Stage::List,
            Stage::VehicleDetail,
            Stage::Financing,
            Stage::Trade,
            Stage::Transfer,
        ]
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Menu
    }
}

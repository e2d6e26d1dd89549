//! Per-customer conversation state.

use crate::domain::catalog::{VehicleFilter, VehicleId};
use crate::domain::foundation::PhoneNumber;

use super::stage::Stage;

/// Everything the bot remembers about one customer.
///
/// Owned by the conversation store; the router only ever sees immutable
/// references and proposes changes through [`RecordPatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRecord {
    pub identity: PhoneNumber,
    pub stage: Stage,
    /// Filter picked on the category menu, kept while browsing.
    pub active_filter: Option<VehicleFilter>,
    /// 1-indexed page of the current listing.
    pub active_page: u32,
    /// Vehicle last opened on the detail card.
    pub last_viewed: Option<VehicleId>,
    /// Ids shown on the most recent list page, in menu order.
    pub current_list: Vec<VehicleId>,
}

impl ConversationRecord {
    /// Fresh record for a first-contact customer.
    pub fn new(identity: PhoneNumber) -> Self {
        Self {
            identity,
            stage: Stage::Menu,
            active_filter: None,
            active_page: 1,
            last_viewed: None,
            current_list: Vec::new(),
        }
    }

    /// Applies a partial update; fields the patch leaves unset keep
    /// their current values.
    pub fn apply(&mut self, patch: RecordPatch) {
        if let Some(stage) = patch.stage {
            self.stage = stage;
        }
        if let Some(filter) = patch.active_filter {
            self.active_filter = Some(filter);
        }
        if let Some(page) = patch.active_page {
            self.active_page = page;
        }
        if let Some(id) = patch.last_viewed {
            self.last_viewed = Some(id);
        }
        if let Some(list) = patch.current_list {
            self.current_list = list;
        }
    }
}

/// Partial update to a [`ConversationRecord`].
///
/// `None` means "keep the current value"; the flow never clears a field
/// once set, it only overwrites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub stage: Option<Stage>,
    pub active_filter: Option<VehicleFilter>,
    pub active_page: Option<u32>,
    pub last_viewed: Option<VehicleId>,
    pub current_list: Option<Vec<VehicleId>>,
}

impl RecordPatch {
    /// Patch that only moves the conversation to another stage.
    pub fn stage(stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            ..Self::default()
        }
    }

    /// True when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

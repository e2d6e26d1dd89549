//! Conversation store port.
//!
//! Keyed by normalized customer identity. Lookup never reports "absent":
//! the store lazily creates a fresh record on first access, so callers
//! always work against a real record.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::{ConversationRecord, RecordPatch};
use crate::domain::foundation::PhoneNumber;

/// Errors from a conversation store backend.
///
/// The in-process implementation never fails; the variants exist for
/// external key-value backends in multi-process deployments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("conversation store backend failure: {0}")]
    Backend(String),
}

/// Port for per-customer conversation state.
///
/// Implementations must apply `merge` as a partial overwrite: fields the
/// patch leaves unset keep their stored values.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Returns the record for the identity, creating a fresh one in the
    /// initial stage on first access.
    async fn get_or_create(&self, identity: &PhoneNumber)
        -> Result<ConversationRecord, StoreError>;

    /// Merges a partial update into the record and returns the result.
    ///
    /// Creates the record first when the identity is new.
    async fn merge(
        &self,
        identity: &PhoneNumber,
        patch: RecordPatch,
    ) -> Result<ConversationRecord, StoreError>;

    /// Drops the record; the next `get_or_create` starts fresh.
    async fn reset(&self, identity: &PhoneNumber) -> Result<(), StoreError>;
}

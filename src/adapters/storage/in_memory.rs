//! In-memory conversation store.
//!
//! Conversation state is ephemeral by design: it lives for the process
//! lifetime and is lost on restart, which just means returning customers
//! get the welcome menu again.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{ConversationRecord, RecordPatch};
use crate::domain::foundation::PhoneNumber;
use crate::ports::{ConversationStore, StoreError};

/// In-memory store keyed by normalized identity.
///
/// Cloning shares the underlying map. Concurrent merges for the same
/// identity are last-write-wins; per-customer traffic is low enough that
/// the simplicity wins over serialization.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    records: Arc<RwLock<HashMap<PhoneNumber, ConversationRecord>>>,
}

impl InMemoryConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked conversations (useful for tests).
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// True when no conversation is tracked.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get_or_create(
        &self,
        identity: &PhoneNumber,
    ) -> Result<ConversationRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .entry(identity.clone())
            .or_insert_with(|| ConversationRecord::new(identity.clone()));
        Ok(record.clone())
    }

    async fn merge(
        &self,
        identity: &PhoneNumber,
        patch: RecordPatch,
    ) -> Result<ConversationRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .entry(identity.clone())
            .or_insert_with(|| ConversationRecord::new(identity.clone()));
        record.apply(patch);
        Ok(record.clone())
    }

    async fn reset(&self, identity: &PhoneNumber) -> Result<(), StoreError> {
        self.records.write().await.remove(identity);
        Ok(())
    }
}

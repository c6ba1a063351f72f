use std::collections::HashMap;

use tracing::warn;

use crate::common::MemberId;
use super::message::{MessageId, Payload};

/// A received CONTENT waiting in the hold-back store for its
/// announcement and in-order predecessors.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Buffered {
    pub sender: MemberId,
    pub payload: Payload,
    pub arrived_at: u64,
}

/// Per-member buffer of received-but-not-yet-deliverable messages.
///
/// Each identity enters at most once and is removed exactly once,
/// when the member releases it for delivery.
pub struct HoldBackStore {
    entries: HashMap<MessageId, Buffered>,
}

impl HoldBackStore {
    pub fn new() -> Self {
        HoldBackStore {
            entries: HashMap::new(),
        }
    }

    /// Returns false and leaves the store untouched when the identity
    /// is already buffered. The transport is assumed non-duplicating,
    /// so a duplicate is tolerated as a no-op rather than an error.
    pub fn insert(&mut self, id: MessageId, entry: Buffered) -> bool {
        if self.entries.contains_key(&id) {
            warn!(sender = entry.sender, "duplicate content receipt ignored");
            return false;
        }
        self.entries.insert(id, entry);
        true
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn remove(&mut self, id: &MessageId) -> Option<Buffered> {
        self.entries.remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use std::collections::HashMap;

use tracing::warn;

use super::holdback::{Buffered, HoldBackStore};
use super::message::MessageId;

/// Per-member view of the sequencer's announcement stream.
///
/// Maps each announced delivery number to the identity it authorizes,
/// and remembers how far local delivery has progressed. A number is
/// released only after every lower number, so `next_expected` is the
/// delivered-so-far count and is never skipped.
pub struct DeliveryTracker {
    announced: HashMap<u64, MessageId>,
    next_expected: u64,
}

impl DeliveryTracker {
    pub fn new() -> Self {
        DeliveryTracker {
            announced: HashMap::new(),
            next_expected: 0,
        }
    }

    pub fn next_expected(&self) -> u64 {
        self.next_expected
    }

    /// Records one announcement. A duplicate number is tolerated as a
    /// no-op; an announcement may reference an identity this member has
    /// not yet seen as CONTENT, it simply waits.
    pub fn record(&mut self, number: u64, id: MessageId) -> bool {
        if self.announced.contains_key(&number) {
            warn!(number, "duplicate announcement ignored");
            return false;
        }
        self.announced.insert(number, id);
        true
    }

    /// The release step: while the next expected number is announced and
    /// its identity is buffered, move the entry out of the hold-back
    /// store. Returns the released messages strictly in delivery order.
    pub fn release(&mut self, holdback: &mut HoldBackStore) -> Vec<(u64, MessageId, Buffered)> {
        let mut ready = Vec::new();
        while let Some(id) = self.announced.get(&self.next_expected).copied() {
            let Some(entry) = holdback.remove(&id) else {
                break;
            };
            self.announced.remove(&self.next_expected);
            ready.push((self.next_expected, id, entry));
            self.next_expected += 1;
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multicast::message::{Content, Hashable};

    fn buffer(holdback: &mut HoldBackStore, sender: u64, seq: u64) -> MessageId {
        let content = Content::new(sender, seq, format!("m{seq}").into_bytes());
        let id = content.hash();
        holdback.insert(
            id,
            Buffered {
                sender,
                payload: content.payload,
                arrived_at: 0,
            },
        );
        id
    }

    #[test]
    fn test_release_waits_for_contiguous_numbers() {
        let mut holdback = HoldBackStore::new();
        let mut tracker = DeliveryTracker::new();

        let first = buffer(&mut holdback, 1, 0);
        let second = buffer(&mut holdback, 1, 1);

        // Announcement for number 1 alone releases nothing.
        tracker.record(1, second);
        assert!(tracker.release(&mut holdback).is_empty());
        assert_eq!(tracker.next_expected(), 0);

        tracker.record(0, first);
        let released = tracker.release(&mut holdback);
        let ids: Vec<_> = released.iter().map(|(n, id, _)| (*n, *id)).collect();
        assert_eq!(ids, vec![(0, first), (1, second)]);
        assert_eq!(tracker.next_expected(), 2);
        assert!(holdback.is_empty());
    }

    #[test]
    fn test_release_waits_for_buffered_content() {
        let mut holdback = HoldBackStore::new();
        let mut tracker = DeliveryTracker::new();

        // Announcement arrives before the content it references.
        let id = Content::new(1, 0, b"m0".to_vec()).hash();
        tracker.record(0, id);
        assert!(tracker.release(&mut holdback).is_empty());

        holdback.insert(
            id,
            Buffered {
                sender: 1,
                payload: b"m0".to_vec(),
                arrived_at: 5,
            },
        );
        let released = tracker.release(&mut holdback);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].0, 0);
        assert_eq!(released[0].1, id);
    }

    #[test]
    fn test_duplicate_announcement_is_noop() {
        let mut tracker = DeliveryTracker::new();
        let id = Content::new(1, 0, b"m0".to_vec()).hash();

        assert!(tracker.record(0, id));
        assert!(!tracker.record(0, id));
    }
}

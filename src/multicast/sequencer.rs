use std::collections::{HashMap, VecDeque};

use crate::common::MemberId;
use super::holdback::HoldBackStore;
use super::message::{Announce, MessageId};

/// State held only by the sequencer member.
///
/// Tracks, per original sender, the identities observed from that
/// sender but not yet assigned a delivery number, and hands out the
/// numbers themselves: dense and monotonically increasing, one per
/// identity. Cross-sender order is simply first-observed-first-assigned;
/// FIFO per sender is the only additional guarantee.
pub struct SequencerState {
    pending: HashMap<MemberId, VecDeque<MessageId>>,
    next_number: u64,
}

impl SequencerState {
    pub fn new() -> Self {
        SequencerState {
            pending: HashMap::new(),
            next_number: 0,
        }
    }

    pub fn next_number(&self) -> u64 {
        self.next_number
    }

    /// Records one freshly observed identity. The per-sender queue is
    /// created lazily on first reference.
    pub fn observe(&mut self, sender: MemberId, id: MessageId) {
        self.pending.entry(sender).or_default().push_back(id);
    }

    /// The assignment step: while the head of some sender's pending
    /// queue is buffered in the hold-back store, pop it and bind it to
    /// the next delivery number. Returns the announcements to broadcast,
    /// in assignment order.
    pub fn assign_ready(&mut self, holdback: &HoldBackStore) -> Vec<Announce> {
        let mut assigned = Vec::new();
        loop {
            let ready = self.pending.iter().find_map(|(sender, queue)| {
                queue
                    .front()
                    .filter(|id| holdback.contains(id))
                    .map(|id| (*sender, *id))
            });
            let Some((sender, id)) = ready else { break };

            let Some(queue) = self.pending.get_mut(&sender) else {
                break;
            };
            let popped = queue.pop_front();
            // Numbering anything but the pending head is a logic fault.
            assert_eq!(popped, Some(id), "assignment must pop the pending head");
            if queue.is_empty() {
                self.pending.remove(&sender);
            }

            assigned.push(Announce {
                id,
                number: self.next_number,
            });
            self.next_number += 1;
        }
        assigned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multicast::holdback::Buffered;
    use crate::multicast::message::{Content, Hashable};

    fn buffer(holdback: &mut HoldBackStore, sender: MemberId, seq: u64) -> MessageId {
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
    fn test_numbers_follow_observation_order() {
        let mut holdback = HoldBackStore::new();
        let mut state = SequencerState::new();

        // One observe-then-assign round per arrival, as the member runs it.
        let a1 = buffer(&mut holdback, 1, 0);
        state.observe(1, a1);
        let mut assigned = state.assign_ready(&holdback);
        let b1 = buffer(&mut holdback, 2, 0);
        state.observe(2, b1);
        assigned.extend(state.assign_ready(&holdback));

        assert_eq!(assigned.len(), 2);
        assert_eq!(assigned[0], Announce { id: a1, number: 0 });
        assert_eq!(assigned[1], Announce { id: b1, number: 1 });
        assert_eq!(state.next_number(), 2);
    }

    #[test]
    fn test_head_must_be_buffered_before_assignment() {
        let mut holdback = HoldBackStore::new();
        let mut state = SequencerState::new();

        // Observed but not buffered: nothing may be assigned.
        let id = Content::new(1, 0, b"m0".to_vec()).hash();
        state.observe(1, id);
        assert!(state.assign_ready(&holdback).is_empty());
        assert_eq!(state.next_number(), 0);

        holdback.insert(
            id,
            Buffered {
                sender: 1,
                payload: b"m0".to_vec(),
                arrived_at: 0,
            },
        );
        let assigned = state.assign_ready(&holdback);
        assert_eq!(assigned, vec![Announce { id, number: 0 }]);
    }

    #[test]
    fn test_per_sender_fifo_blocks_later_messages() {
        let mut holdback = HoldBackStore::new();
        let mut state = SequencerState::new();

        let first = Content::new(1, 0, b"first".to_vec()).hash();
        state.observe(1, first);
        // Second message from the same sender arrives and is buffered,
        // but the head is still missing from the hold-back store.
        let second = buffer(&mut holdback, 1, 1);
        state.observe(1, second);

        assert!(state.assign_ready(&holdback).is_empty());

        holdback.insert(
            first,
            Buffered {
                sender: 1,
                payload: b"first".to_vec(),
                arrived_at: 0,
            },
        );
        let assigned = state.assign_ready(&holdback);
        assert_eq!(
            assigned,
            vec![
                Announce {
                    id: first,
                    number: 0
                },
                Announce {
                    id: second,
                    number: 1
                },
            ]
        );
    }
}

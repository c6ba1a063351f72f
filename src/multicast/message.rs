use sha2::{Digest as ShaDigest, Sha512};

use crate::common::{Digest, MemberId};

/*
    Two message kinds flow through the group. CONTENT carries an
    application payload from its original sender to every member,
    where it waits in the hold-back store. ANNOUNCE is broadcast by
    the sequencer and binds one CONTENT identity to the global
    delivery number it was assigned; a member may deliver a buffered
    CONTENT only once it holds the matching ANNOUNCE and has already
    delivered every lower number.
*/

/// Unique identity of one multicast, derived from the sender, the
/// sender's private multicast counter, and the payload bytes.
pub type MessageId = Digest;

pub type Payload = Vec<u8>;

pub trait Hashable {
    fn hash(&self) -> Digest;
}

#[derive(Clone, Debug)]
pub enum Message {
    Content(Content),
    Announce(Announce),
}

/// An application multicast, immutable once created.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Content {
    pub sender: MemberId,
    pub seq: u64,
    pub payload: Payload,
}

/// The sequencer's binding of a message identity to its delivery number.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Announce {
    pub id: MessageId,
    pub number: u64,
}

/// Transport envelope: one message plus arrival metadata.
#[derive(Clone, Debug)]
pub struct Received {
    pub from: MemberId,
    pub message: Message,
    pub at: u64,
}

/// The terminal record handed to the delivery sink.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Delivered {
    pub number: u64,
    pub id: MessageId,
    pub sender: MemberId,
    pub payload: Payload,
    pub at: u64,
}

impl Content {
    pub fn new(sender: MemberId, seq: u64, payload: Payload) -> Self {
        Content {
            sender,
            seq,
            payload,
        }
    }
}

impl Hashable for Content {
    fn hash(&self) -> Digest {
        let mut hasher = Sha512::new();
        hasher.update(self.sender.to_be_bytes());
        hasher.update(self.seq.to_be_bytes());
        hasher.update(&self.payload);
        let result = hasher.finalize();
        let mut digest = [0u8; 64];
        digest.copy_from_slice(&result[..]);
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_unique_per_multicast() {
        let a = Content::new(1, 0, b"hello".to_vec());
        let b = Content::new(1, 1, b"hello".to_vec());
        let c = Content::new(2, 0, b"hello".to_vec());

        assert_ne!(a.hash(), b.hash());
        assert_ne!(a.hash(), c.hash());
        assert_eq!(a.hash(), Content::new(1, 0, b"hello".to_vec()).hash());
    }
}

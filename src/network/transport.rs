use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::common::{error::MulticastError, MemberId};
use crate::multicast::{Event, Received};

/// Moves one message envelope from one member to another.
///
/// Implementations are assumed reliable and non-duplicating, and FIFO
/// per (sender, receiver) pair; ordering across distinct pairs is not
/// guaranteed and the protocol must not rely on it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, to: MemberId, received: Received) -> Result<(), MulticastError>;
}

/// In-process transport: one mpsc mailbox per member.
#[derive(Clone)]
pub struct ChannelTransport {
    mailboxes: HashMap<MemberId, Sender<Event>>,
}

impl ChannelTransport {
    pub fn new(mailboxes: HashMap<MemberId, Sender<Event>>) -> Self {
        ChannelTransport { mailboxes }
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, to: MemberId, received: Received) -> Result<(), MulticastError> {
        let mailbox = self
            .mailboxes
            .get(&to)
            .ok_or(MulticastError::UnknownMember(to))?;
        mailbox
            .send(Event::Received(received))
            .await
            .map_err(|_| MulticastError::MailboxClosed(to))
    }
}

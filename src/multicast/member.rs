use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{debug, info, warn};

use crate::common::{error::MulticastError, MemberId};
use crate::network::transport::Transport;
use super::holdback::{Buffered, HoldBackStore};
use super::members::GroupMembers;
use super::message::{Content, Delivered, Hashable, Message, Payload, Received};
use super::sequencer::SequencerState;
use super::tracker::DeliveryTracker;

/// Capability flag: every member runs the same logic, the sequencer
/// additionally assigns delivery numbers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MemberRole {
    Sequencer,
    Regular,
}

/// One inbound mailbox event: a protocol message from the transport,
/// or a scheduled multicast trigger from the driver.
#[derive(Clone, Debug)]
pub enum Event {
    Trigger { at: u64, payload: Payload },
    Received(Received),
}

/// The protocol actor. One per node; all state is confined to the
/// task running `run()`, and each event is handled to completion
/// (including the full release/drain cascade) before the next.
pub struct GroupMember<T: Transport> {
    pub id: MemberId,
    pub role: MemberRole,
    pub members: GroupMembers,
    pub holdback: HoldBackStore,
    pub sequencer: SequencerState,
    pub tracker: DeliveryTracker,
    pub msg_rx: Receiver<Event>,
    pub transport: T,
    pub delivery_tx: Sender<Delivered>,
    next_seq: u64,
}

impl<T: Transport> GroupMember<T> {
    pub fn new(
        id: MemberId,
        members: GroupMembers,
        msg_rx: Receiver<Event>,
        transport: T,
        delivery_tx: Sender<Delivered>,
    ) -> Self {
        let role = if members.sequencer() == id {
            MemberRole::Sequencer
        } else {
            MemberRole::Regular
        };
        GroupMember {
            id,
            role,
            members,
            holdback: HoldBackStore::new(),
            sequencer: SequencerState::new(),
            tracker: DeliveryTracker::new(),
            msg_rx,
            transport,
            delivery_tx,
            next_seq: 0,
        }
    }

    /// Processes mailbox events until the channel closes.
    pub async fn run(&mut self) -> Result<(), MulticastError> {
        while let Some(event) = self.msg_rx.recv().await {
            match event {
                Event::Trigger { at, payload } => self.multicast(at, payload).await?,
                Event::Received(received) => self.on_receive(received).await?,
            }
        }
        Ok(())
    }

    /// Multicasts one application payload: mints a CONTENT with a fresh
    /// identity and sends a copy to every member, including self. No
    /// local protocol state changes until the copy comes back in.
    pub async fn multicast(&mut self, at: u64, payload: Payload) -> Result<(), MulticastError> {
        let content = Content::new(self.id, self.next_seq, payload);
        self.next_seq += 1;
        debug!(member = self.id, at, seq = content.seq, "multicasting");

        for to in self.members.iter() {
            self.transport
                .send(
                    to,
                    Received {
                        from: self.id,
                        message: Message::Content(content.clone()),
                        at,
                    },
                )
                .await?;
        }
        Ok(())
    }

    /// Handles one inbound protocol message, then runs the release and
    /// drain steps.
    pub async fn on_receive(&mut self, received: Received) -> Result<(), MulticastError> {
        let Received { from, message, at } = received;
        match message {
            Message::Content(content) => {
                debug!(member = self.id, from, sender = content.sender, at, "received content");
                if !self.members.is_member(content.sender) {
                    // Tolerated: buffered like any other content.
                    warn!(member = self.id, sender = content.sender, "content from unknown sender");
                }
                let id = content.hash();
                let fresh = self.holdback.insert(
                    id,
                    Buffered {
                        sender: content.sender,
                        payload: content.payload,
                        arrived_at: at,
                    },
                );
                // A duplicate never reaches the sequencing step, so an
                // identity cannot be queued for assignment twice.
                if fresh && self.role == MemberRole::Sequencer {
                    self.sequencer.observe(content.sender, id);
                    self.assign(at).await?;
                }
            }
            Message::Announce(announce) => {
                debug!(member = self.id, from, number = announce.number, at, "received announcement");
                self.tracker.record(announce.number, announce.id);
            }
        }
        self.drain().await
    }

    /// Sequencer-only: numbers every newly assignable message and
    /// broadcasts the bindings to the whole group, including self.
    async fn assign(&mut self, at: u64) -> Result<(), MulticastError> {
        for announce in self.sequencer.assign_ready(&self.holdback) {
            debug!(member = self.id, number = announce.number, "assigned delivery number");
            for to in self.members.iter() {
                self.transport
                    .send(
                        to,
                        Received {
                            from: self.id,
                            message: Message::Announce(announce.clone()),
                            at,
                        },
                    )
                    .await?;
            }
        }
        Ok(())
    }

    /// Delivers everything the release step freed, strictly in
    /// delivery-number order.
    async fn drain(&mut self) -> Result<(), MulticastError> {
        for (number, id, entry) in self.tracker.release(&mut self.holdback) {
            self.deliver(Delivered {
                number,
                id,
                sender: entry.sender,
                payload: entry.payload,
                at: entry.arrived_at,
            })
            .await?;
        }
        Ok(())
    }

    /// Terminal action: hands the message to the delivery sink.
    async fn deliver(&self, delivered: Delivered) -> Result<(), MulticastError> {
        info!(
            member = self.id,
            number = delivered.number,
            sender = delivered.sender,
            "delivered"
        );
        self.delivery_tx
            .send(delivered)
            .await
            .map_err(|_| MulticastError::DeliverySinkClosed(self.id))
    }
}

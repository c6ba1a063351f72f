use std::collections::HashMap;

use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::common::{error::MulticastError, MemberId};
use crate::multicast::{Delivered, Event, GroupMember, GroupMembers, Payload};
use super::transport::ChannelTransport;

const MAILBOX_CAPACITY: usize = 100;

/// One configured multicast trigger: at virtual time `at`, member
/// `sender` multicasts `payload`.
#[derive(Clone, Debug)]
pub struct ScheduledMulticast {
    pub at: u64,
    pub sender: MemberId,
    pub payload: Payload,
}

/// The full trigger configuration for a run, passed to the driver
/// explicitly rather than held as shared global state.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    triggers: Vec<ScheduledMulticast>,
}

impl Schedule {
    pub fn new(triggers: Vec<ScheduledMulticast>) -> Self {
        Schedule { triggers }
    }

    /// Triggers in virtual-time order; equal times keep schedule order.
    pub fn in_order(&self) -> Vec<&ScheduledMulticast> {
        let mut ordered: Vec<_> = self.triggers.iter().collect();
        ordered.sort_by_key(|trigger| trigger.at);
        ordered
    }
}

/// A running group: one spawned actor task per member, plus the
/// handles the environment keeps (trigger mailboxes in, delivery
/// streams out).
pub struct Group {
    pub members: GroupMembers,
    mailboxes: HashMap<MemberId, Sender<Event>>,
    deliveries: HashMap<MemberId, Receiver<Delivered>>,
    pub tasks: Vec<JoinHandle<Result<(), MulticastError>>>,
}

/// Builds the channels, wires every member to the shared channel
/// transport, and spawns one task per member.
pub fn spawn_group(ids: Vec<MemberId>) -> Group {
    let members = GroupMembers::new(ids);
    debug!(
        members = members.len(),
        sequencer = members.sequencer(),
        "spawning group"
    );

    let mut mailboxes = HashMap::new();
    let mut inboxes = Vec::new();
    for id in members.iter() {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        mailboxes.insert(id, tx);
        inboxes.push((id, rx));
    }
    let transport = ChannelTransport::new(mailboxes.clone());

    let mut deliveries = HashMap::new();
    let mut tasks = Vec::new();
    for (id, msg_rx) in inboxes {
        let (delivery_tx, delivery_rx) = mpsc::channel(MAILBOX_CAPACITY);
        deliveries.insert(id, delivery_rx);

        let mut member =
            GroupMember::new(id, members.clone(), msg_rx, transport.clone(), delivery_tx);
        tasks.push(tokio::spawn(async move { member.run().await }));
    }

    Group {
        members,
        mailboxes,
        deliveries,
        tasks,
    }
}

impl Group {
    /// Fires one multicast trigger on the named member.
    pub async fn trigger(&self, trigger: &ScheduledMulticast) -> Result<(), MulticastError> {
        debug!(sender = trigger.sender, at = trigger.at, "firing trigger");
        let mailbox = self
            .mailboxes
            .get(&trigger.sender)
            .ok_or(MulticastError::UnknownMember(trigger.sender))?;
        mailbox
            .send(Event::Trigger {
                at: trigger.at,
                payload: trigger.payload.clone(),
            })
            .await
            .map_err(|_| MulticastError::MailboxClosed(trigger.sender))
    }

    /// Fires every trigger in the schedule, in virtual-time order.
    pub async fn run_schedule(&self, schedule: &Schedule) -> Result<(), MulticastError> {
        for trigger in schedule.in_order() {
            self.trigger(trigger).await?;
        }
        Ok(())
    }

    /// Awaits `count` deliveries from one member's delivery stream.
    pub async fn collect(&mut self, member: MemberId, count: usize) -> Vec<Delivered> {
        let mut out = Vec::with_capacity(count);
        if let Some(rx) = self.deliveries.get_mut(&member) {
            while out.len() < count {
                match rx.recv().await {
                    Some(delivered) => out.push(delivered),
                    None => break,
                }
            }
        }
        out
    }
}

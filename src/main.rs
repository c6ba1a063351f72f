/*
    Sequencer-based total-order group multicast. A fixed group of members exchanges multicast messages such that every member delivers every message in the same global order, and messages from one sender are delivered in that sender's send order (FIFO per sender, totalized by a sequencer).

    A sender multicasts a CONTENT message to all members, including itself. Each recipient parks it in a hold-back store. The distinguished sequencer member (lowest id) additionally assigns each message a dense, monotonically increasing delivery number, respecting FIFO per original sender, and broadcasts the binding as an ANNOUNCE message. A member delivers a buffered message once it holds the announcement for the next expected number and has delivered every lower number, so all members that consume the full announcement stream deliver the identical sequence.

    The transport is assumed reliable and non-duplicating, FIFO per sender/receiver pair. Membership is fixed for the run; crash recovery, retransmission and authentication are out of scope.
*/

mod common;
mod multicast;
mod network;

use common::error::MulticastError;
use network::{spawn_group, Schedule, ScheduledMulticast};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), MulticastError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Sample run: five members, two of them multicasting three
    // payloads each on an interleaved virtual-time schedule.
    let schedule = Schedule::new(vec![
        ScheduledMulticast {
            at: 10,
            sender: 1,
            payload: b"January".to_vec(),
        },
        ScheduledMulticast {
            at: 20,
            sender: 1,
            payload: b"February".to_vec(),
        },
        ScheduledMulticast {
            at: 30,
            sender: 1,
            payload: b"March".to_vec(),
        },
        ScheduledMulticast {
            at: 10,
            sender: 2,
            payload: b"One".to_vec(),
        },
        ScheduledMulticast {
            at: 20,
            sender: 2,
            payload: b"Two".to_vec(),
        },
        ScheduledMulticast {
            at: 30,
            sender: 2,
            payload: b"Three".to_vec(),
        },
    ]);
    let total = 6;

    let mut group = spawn_group((0..5).collect());
    group.run_schedule(&schedule).await?;

    for id in 0..5 {
        for delivered in group.collect(id, total).await {
            info!(
                member = id,
                number = delivered.number,
                sender = delivered.sender,
                payload = %String::from_utf8_lossy(&delivered.payload),
                "delivered"
            );
        }
    }

    Ok(())
}

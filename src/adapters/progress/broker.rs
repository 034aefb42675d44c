//! Subscription broker for live campaign progress.
//!
//! Each subscriber owns a bounded queue fed by its campaign's broadcast
//! channel. When a subscriber falls behind, the oldest queued snapshots are
//! dropped; since every snapshot is complete, the newest one alone restores
//! the correct view.
//!
//! # Lifecycle
//!
//! ```text
//! subscribe ──► initial snapshot ──► next_snapshot()* ──► drop(handle)
//!                                                           └── unsubscribe
//! ```

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::Instant;

use crate::domain::campaign::{CampaignSeed, CampaignSnapshot, ProgressError};
use crate::domain::foundation::{CampaignId, ConnectionId};

use super::store::{SnapshotStore, Subscriber};

/// Registers and removes subscribers, and fans snapshots out to them.
#[derive(Debug, Clone)]
pub struct SubscriptionBroker {
    store: Arc<SnapshotStore>,
}

impl SubscriptionBroker {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Attach a new subscriber to a campaign.
    ///
    /// Registration, queue creation, and the initial snapshot happen under
    /// one campaign lock, so no change can slip in between the initial
    /// snapshot and the first queued update.
    ///
    /// When `seed_total` is given and the campaign is unknown, a zeroed
    /// aggregate with that many pending recipients is created.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the campaign is unknown and no seed total was given
    pub fn subscribe(
        &self,
        campaign_id: &CampaignId,
        seed_total: Option<u64>,
    ) -> Result<(CampaignSnapshot, SubscriptionHandle), ProgressError> {
        let connection_id = ConnectionId::new();
        let register = |entry: &mut super::store::CampaignEntry| {
            entry.subscribers.insert(
                connection_id,
                Subscriber {
                    connection_id,
                    campaign_id: campaign_id.clone(),
                    subscribed_at: Instant::now(),
                },
            );
            entry.refresh_idle();
            (entry.aggregate.snapshot(), entry.sender.subscribe())
        };

        let (snapshot, receiver) = match seed_total {
            Some(total) => {
                let seed = CampaignSeed::total(total);
                self.store
                    .with_entry_or_insert(campaign_id, || seed.build(campaign_id.clone(), None), register)
                    .map(|(registered, _)| registered)?
            }
            None => self.store.with_entry(campaign_id, register)?,
        };

        tracing::debug!(
            campaign_id = %campaign_id,
            connection_id = %connection_id,
            sequence = snapshot.sequence,
            "Subscriber attached"
        );

        let handle = SubscriptionHandle {
            connection_id,
            campaign_id: campaign_id.clone(),
            receiver,
            last_sequence_sent: snapshot.sequence,
            broker: Some(self.clone()),
        };
        Ok((snapshot, handle))
    }

    /// Detach a subscriber. Unknown campaigns and connections are ignored.
    ///
    /// If a teardown was requested and this was the last subscriber, the
    /// campaign is evicted.
    pub fn unsubscribe(&self, campaign_id: &CampaignId, connection_id: &ConnectionId) {
        let outcome = self.store.with_entry(campaign_id, |entry| {
            let removed = entry.subscribers.remove(connection_id);
            entry.refresh_idle();
            (removed, entry.subscriber_count(), entry.teardown_due())
        });

        let Ok((removed, remaining, teardown_due)) = outcome else {
            return;
        };
        if let Some(subscriber) = removed {
            tracing::debug!(
                campaign_id = %campaign_id,
                connection_id = %connection_id,
                connected_ms = subscriber.subscribed_at.elapsed().as_millis() as u64,
                remaining,
                "Subscriber detached"
            );
        }
        if teardown_due {
            self.store.evict(campaign_id);
        }
    }

    /// Enqueue a snapshot for every subscriber of the campaign.
    ///
    /// Stale snapshots (sequence not newer than the last one published) are
    /// dropped. Returns how many queues received it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the campaign is unknown
    pub fn notify(
        &self,
        campaign_id: &CampaignId,
        snapshot: CampaignSnapshot,
    ) -> Result<usize, ProgressError> {
        self.store.with_entry(campaign_id, |entry| entry.publish(snapshot))
    }

    /// Number of subscribers currently attached to the campaign.
    pub fn subscriber_count(&self, campaign_id: &CampaignId) -> usize {
        self.store
            .with_entry(campaign_id, |entry| entry.subscriber_count())
            .unwrap_or(0)
    }
}

/// One subscriber's end of the fan-out.
///
/// Dropping the handle unsubscribes, which is how a transport disconnect
/// reaches the broker.
#[derive(Debug)]
pub struct SubscriptionHandle {
    connection_id: ConnectionId,
    campaign_id: CampaignId,
    receiver: broadcast::Receiver<CampaignSnapshot>,
    last_sequence_sent: u64,
    broker: Option<SubscriptionBroker>,
}

impl SubscriptionHandle {
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn campaign_id(&self) -> &CampaignId {
        &self.campaign_id
    }

    /// Sequence of the newest snapshot handed to this subscriber.
    pub fn last_sequence_sent(&self) -> u64 {
        self.last_sequence_sent
    }

    /// Wait for the next snapshot newer than the last one delivered.
    ///
    /// Returns `None` once the campaign has been evicted.
    pub async fn next_snapshot(&mut self) -> Option<CampaignSnapshot> {
        loop {
            match self.receiver.recv().await {
                Ok(snapshot) if snapshot.sequence <= self.last_sequence_sent => continue,
                Ok(snapshot) => {
                    self.last_sequence_sent = snapshot.sequence;
                    return Some(snapshot);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        campaign_id = %self.campaign_id,
                        connection_id = %self.connection_id,
                        skipped,
                        "Subscriber lagged, older snapshots coalesced"
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Unsubscribe now rather than on drop.
    pub fn close(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(broker) = self.broker.take() {
            broker.unsubscribe(&self.campaign_id, &self.connection_id);
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

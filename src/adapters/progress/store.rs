//! Process-wide registry of live campaign aggregates.
//!
//! # Locking
//!
//! ```text
//! campaigns: RwLock<HashMap<CampaignId, Arc<Mutex<CampaignEntry>>>>
//!                                          └── one lock per campaign
//! ```
//!
//! The map lock is only held long enough to look up, insert, or remove an
//! entry handle. All reads and writes of an aggregate happen under that
//! campaign's own mutex, so campaigns never contend with each other.
//!
//! Lock order is always map → entry. Nothing acquires the map lock while
//! holding an entry lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::domain::campaign::{CampaignAggregate, CampaignSnapshot, ProgressError};
use crate::domain::foundation::{CampaignId, ConnectionId};

/// Default per-subscriber queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// A live client connection watching one campaign.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub connection_id: ConnectionId,
    pub campaign_id: CampaignId,
    pub subscribed_at: Instant,
}

/// Aggregate plus everything needed to fan its snapshots out.
#[derive(Debug)]
pub struct CampaignEntry {
    pub(crate) aggregate: CampaignAggregate,
    pub(crate) subscribers: HashMap<ConnectionId, Subscriber>,
    pub(crate) sender: broadcast::Sender<CampaignSnapshot>,
    last_published: u64,
    idle_since: Option<Instant>,
    teardown_requested: bool,
    evicted: bool,
}

impl CampaignEntry {
    fn new(aggregate: CampaignAggregate, queue_capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(queue_capacity);
        let last_published = aggregate.sequence();
        Self {
            aggregate,
            subscribers: HashMap::new(),
            sender,
            last_published,
            idle_since: None,
            teardown_requested: false,
            evicted: false,
        }
    }

    pub fn aggregate(&self) -> &CampaignAggregate {
        &self.aggregate
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Push a snapshot to every subscriber's queue without blocking.
    ///
    /// Snapshots not newer than the last published one are discarded, which
    /// keeps each subscriber's view monotonic. Returns the number of queues
    /// the snapshot reached.
    pub(crate) fn publish(&mut self, snapshot: CampaignSnapshot) -> usize {
        if snapshot.sequence <= self.last_published {
            return 0;
        }
        self.last_published = snapshot.sequence;
        // No receivers is fine: nobody is watching yet.
        self.sender.send(snapshot).unwrap_or(0)
    }

    /// Recompute when the grace timer should start after a state change.
    pub(crate) fn refresh_idle(&mut self) {
        if self.subscribers.is_empty() && self.aggregate.is_terminal() {
            if self.idle_since.is_none() {
                self.idle_since = Some(Instant::now());
            }
        } else {
            self.idle_since = None;
        }
    }

    pub(crate) fn request_teardown(&mut self) {
        self.teardown_requested = true;
    }

    /// Whether the entry should be removed right away.
    pub(crate) fn teardown_due(&self) -> bool {
        self.teardown_requested && self.subscribers.is_empty()
    }

    pub fn idle_since(&self) -> Option<Instant> {
        self.idle_since
    }

    fn idle_expired(&self, now: Instant, grace: Duration) -> bool {
        self.subscribers.is_empty()
            && self.aggregate.is_terminal()
            && self
                .idle_since
                .map(|since| now.saturating_duration_since(since) >= grace)
                .unwrap_or(false)
    }
}

type EntryHandle = Arc<Mutex<CampaignEntry>>;

fn lock(entry: &EntryHandle) -> MutexGuard<'_, CampaignEntry> {
    // Mutations validate before writing, so a poisoned entry is still consistent.
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry mapping campaign ID to its aggregate and subscriber set.
#[derive(Debug)]
pub struct SnapshotStore {
    campaigns: RwLock<HashMap<CampaignId, EntryHandle>>,
    queue_capacity: usize,
}

impl SnapshotStore {
    /// Create a store whose subscriber queues hold `queue_capacity` snapshots.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            campaigns: RwLock::new(HashMap::new()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }

    fn handle(&self, campaign_id: &CampaignId) -> Option<EntryHandle> {
        self.campaigns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(campaign_id)
            .cloned()
    }

    /// Return the existing aggregate or create a zeroed one with `total` pending.
    pub fn get_or_create(&self, campaign_id: &CampaignId, total: u64) -> CampaignSnapshot {
        loop {
            let made = self.with_entry_or_insert(
                campaign_id,
                || Ok(CampaignAggregate::new(campaign_id.clone(), total)),
                |entry| entry.aggregate.snapshot(),
            );
            if let Ok((snapshot, _)) = made {
                return snapshot;
            }
        }
    }

    /// Run `f` on the campaign's entry, inserting the aggregate built by
    /// `make` first if the campaign is unknown.
    ///
    /// `make` runs under the map lock so that two racing creators cannot both
    /// seed the campaign. The returned flag reports whether this call created
    /// the entry.
    ///
    /// # Errors
    ///
    /// - whatever `make` returns
    /// - `NotFound` if the freshly created entry was evicted before `f` ran
    pub(crate) fn with_entry_or_insert<R, M, F>(
        &self,
        campaign_id: &CampaignId,
        make: M,
        f: F,
    ) -> Result<(R, bool), ProgressError>
    where
        M: FnOnce() -> Result<CampaignAggregate, ProgressError>,
        F: FnOnce(&mut CampaignEntry) -> R,
    {
        let mut make = Some(make);
        let mut created = false;

        loop {
            let handle = match self.handle(campaign_id) {
                Some(handle) => handle,
                None => {
                    let make = make.take().ok_or_else(|| ProgressError::not_found(campaign_id))?;
                    let (handle, inserted) = self.insert_with(campaign_id, make)?;
                    created |= inserted;
                    handle
                }
            };

            let mut entry = lock(&handle);
            // Lost a race with eviction; look the campaign up again.
            if entry.evicted {
                continue;
            }
            return Ok((f(&mut entry), created));
        }
    }

    fn insert_with<M>(
        &self,
        campaign_id: &CampaignId,
        make: M,
    ) -> Result<(EntryHandle, bool), ProgressError>
    where
        M: FnOnce() -> Result<CampaignAggregate, ProgressError>,
    {
        let mut campaigns = self
            .campaigns
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = campaigns.get(campaign_id) {
            return Ok((existing.clone(), false));
        }

        let aggregate = make()?;
        let handle = Arc::new(Mutex::new(CampaignEntry::new(aggregate, self.queue_capacity)));
        campaigns.insert(campaign_id.clone(), handle.clone());
        tracing::debug!(campaign_id = %campaign_id, "Campaign aggregate created");
        Ok((handle, true))
    }

    /// Current snapshot of a campaign.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no aggregate exists for the campaign
    pub fn get(&self, campaign_id: &CampaignId) -> Result<CampaignSnapshot, ProgressError> {
        self.with_entry(campaign_id, |entry| entry.aggregate.snapshot())
    }

    /// Run `f` with the campaign's lock held.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no aggregate exists for the campaign
    pub(crate) fn with_entry<R, F>(&self, campaign_id: &CampaignId, f: F) -> Result<R, ProgressError>
    where
        F: FnOnce(&mut CampaignEntry) -> R,
    {
        loop {
            let handle = self
                .handle(campaign_id)
                .ok_or_else(|| ProgressError::not_found(campaign_id))?;
            let mut entry = lock(&handle);
            // Lost a race with eviction; look the campaign up again.
            if entry.evicted {
                continue;
            }
            return Ok(f(&mut entry));
        }
    }

    /// Remove the campaign unless subscribers are still attached.
    ///
    /// Returns whether the entry was removed.
    pub fn evict(&self, campaign_id: &CampaignId) -> bool {
        self.remove_if(campaign_id, |entry| entry.subscribers.is_empty())
    }

    fn remove_if<P>(&self, campaign_id: &CampaignId, predicate: P) -> bool
    where
        P: FnOnce(&CampaignEntry) -> bool,
    {
        let mut campaigns = self
            .campaigns
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(handle) = campaigns.get(campaign_id).cloned() else {
            return false;
        };

        let mut entry = lock(&handle);
        if !predicate(&entry) {
            return false;
        }
        entry.evicted = true;
        drop(entry);
        campaigns.remove(campaign_id);
        tracing::info!(campaign_id = %campaign_id, "Campaign evicted");
        true
    }

    /// Evict every terminal campaign that has been unwatched for `grace`.
    pub fn evict_idle(&self, now: Instant, grace: Duration) -> Vec<CampaignId> {
        let candidates: Vec<(CampaignId, EntryHandle)> = self
            .campaigns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, handle)| (id.clone(), handle.clone()))
            .collect();

        let mut evicted = Vec::new();
        for (campaign_id, handle) in candidates {
            let expired = lock(&handle).idle_expired(now, grace);
            if expired && self.remove_if(&campaign_id, |entry| entry.idle_expired(now, grace)) {
                evicted.push(campaign_id);
            }
        }
        evicted
    }

    /// Point-in-time copy of the active campaign IDs.
    pub fn campaign_ids(&self) -> Vec<CampaignId> {
        self.campaigns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Snapshot of every active campaign, ordered by campaign ID.
    ///
    /// The key set is copied first; each campaign is then locked on its own,
    /// so the overview may be marginally stale.
    pub fn snapshots(&self) -> Vec<CampaignSnapshot> {
        let mut ids = self.campaign_ids();
        ids.sort();
        ids.iter()
            .filter_map(|id| self.get(id).ok())
            .collect()
    }

    /// Number of subscribers across all campaigns.
    pub fn subscriber_count(&self) -> usize {
        self.campaign_ids()
            .iter()
            .filter_map(|id| self.with_entry(id, |entry| entry.subscriber_count()).ok())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.campaigns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

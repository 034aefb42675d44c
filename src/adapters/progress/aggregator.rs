//! Campaign aggregator - the only writer of campaign state.
//!
//! Every mutation runs to completion under the campaign lock: validate,
//! mutate, snapshot, then enqueue the snapshot for subscribers. Enqueueing
//! never waits on a subscriber, so a stalled client cannot hold the lock.

use std::sync::Arc;

use crate::domain::campaign::{CampaignSeed, CampaignSnapshot, DeliveryOutcome, ProgressError};
use crate::domain::foundation::{AccountId, CampaignId, CampaignStatus};

use super::store::{CampaignEntry, SnapshotStore};

/// Applies delivery events, allocations, and status changes.
#[derive(Debug, Clone)]
pub struct CampaignAggregator {
    store: Arc<SnapshotStore>,
}

impl CampaignAggregator {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }

    /// Apply one delivery outcome.
    ///
    /// When the campaign is unknown and `seed` is given, the aggregate is
    /// created from the seed before the event is applied; the event's account
    /// receives every recipient if the seed carries no distribution. When the
    /// campaign exists but the event's account holds no recipients yet, the
    /// seed settles unallocated recipients first (see [`CampaignSeed::settle`]),
    /// so a stream opened before the first event does not change the outcome.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the campaign is unknown and no seed was given
    /// - `InvalidTransition` if nothing is pending for the campaign or account
    pub fn apply_event(
        &self,
        campaign_id: &CampaignId,
        account_id: &AccountId,
        outcome: DeliveryOutcome,
        seed: Option<&CampaignSeed>,
    ) -> Result<CampaignSnapshot, ProgressError> {
        let apply = |entry: &mut CampaignEntry| -> Result<CampaignSnapshot, ProgressError> {
            if let Some(seed) = seed {
                seed.settle(&mut entry.aggregate, account_id)?;
            }
            entry.aggregate.apply_event(account_id, outcome)?;
            Ok(Self::publish(entry))
        };

        let result = match seed {
            Some(seed) => self
                .store
                .with_entry_or_insert(
                    campaign_id,
                    || seed.build(campaign_id.clone(), Some(account_id)),
                    apply,
                )
                .and_then(|(result, _)| result),
            None => self.store.with_entry(campaign_id, apply).and_then(|r| r),
        };

        match &result {
            Ok(snapshot) => tracing::trace!(
                campaign_id = %campaign_id,
                account_id = %account_id,
                outcome = %outcome,
                sequence = snapshot.sequence,
                "Delivery event applied"
            ),
            Err(e) => tracing::warn!(
                campaign_id = %campaign_id,
                account_id = %account_id,
                outcome = %outcome,
                error = %e,
                "Delivery event rejected"
            ),
        }
        result
    }

    /// Assign unallocated recipients to a sending account.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the campaign is unknown
    /// - `InvalidTransition` if too few recipients remain unallocated
    /// - `Validation` if `recipients` is zero
    pub fn allocate(
        &self,
        campaign_id: &CampaignId,
        account_id: &AccountId,
        recipients: u64,
    ) -> Result<CampaignSnapshot, ProgressError> {
        let result = self
            .store
            .with_entry(campaign_id, |entry| {
                entry.aggregate.allocate(account_id, recipients)?;
                Ok(Self::publish(entry))
            })
            .and_then(|r| r);

        if let Err(e) = &result {
            tracing::warn!(
                campaign_id = %campaign_id,
                account_id = %account_id,
                recipients,
                error = %e,
                "Allocation rejected"
            );
        }
        result
    }

    /// Record the executor's status for a campaign.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the campaign is unknown
    pub fn set_status(
        &self,
        campaign_id: &CampaignId,
        status: CampaignStatus,
    ) -> Result<CampaignSnapshot, ProgressError> {
        let snapshot = self.store.with_entry(campaign_id, |entry| {
            entry.aggregate.set_status(status);
            entry.refresh_idle();
            Self::publish(entry)
        })?;

        tracing::info!(
            campaign_id = %campaign_id,
            status = %status,
            sequence = snapshot.sequence,
            "Campaign status updated"
        );
        Ok(snapshot)
    }

    /// Explicit teardown from the executor.
    ///
    /// The campaign is evicted now if nobody is watching, otherwise as soon
    /// as its last subscriber disconnects. Returns whether it was evicted now.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the campaign is unknown
    pub fn teardown(&self, campaign_id: &CampaignId) -> Result<bool, ProgressError> {
        let due = self.store.with_entry(campaign_id, |entry| {
            entry.request_teardown();
            entry.teardown_due()
        })?;

        let evicted = due && self.store.evict(campaign_id);
        tracing::info!(campaign_id = %campaign_id, evicted, "Campaign teardown requested");
        Ok(evicted)
    }

    fn publish(entry: &mut CampaignEntry) -> CampaignSnapshot {
        let snapshot = entry.aggregate.snapshot();
        entry.publish(snapshot.clone());
        snapshot
    }
}

//! Campaign aggregate: running delivery totals for one campaign.
//!
//! The aggregate is plain data with synchronous mutations. Locking and
//! notification live in the progress store; this type only guarantees that
//! every mutation either fully applies or leaves the state untouched.

use std::collections::BTreeMap;

use crate::domain::foundation::{AccountId, CampaignId, CampaignStatus, Timestamp, ValidationError};

use super::{CampaignSnapshot, DeliveryCounts, DeliveryOutcome, ProgressError};

/// Campaign aggregate - authoritative counters for one campaign.
///
/// # Invariants
///
/// - `counts.total() == total` after every mutation
/// - `Σ per_account.sent == counts.sent`, `Σ per_account.failed == counts.failed`
/// - `Σ per_account.pending + unallocated == counts.pending`
/// - `sequence` strictly increases on every successful mutation
/// - `started_at` / `completed_at` are set at most once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignAggregate {
    campaign_id: CampaignId,
    status: CampaignStatus,
    total: u64,
    counts: DeliveryCounts,
    unallocated: u64,
    per_account: BTreeMap<AccountId, DeliveryCounts>,
    started_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    sequence: u64,
}

impl CampaignAggregate {
    /// Create a zeroed aggregate with every recipient pending and unallocated.
    pub fn new(campaign_id: CampaignId, total: u64) -> Self {
        Self {
            campaign_id,
            status: CampaignStatus::default(),
            total,
            counts: DeliveryCounts::pending(total),
            unallocated: total,
            per_account: BTreeMap::new(),
            started_at: None,
            completed_at: None,
            sequence: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn campaign_id(&self) -> &CampaignId {
        &self.campaign_id
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn counts(&self) -> DeliveryCounts {
        self.counts
    }

    pub fn unallocated(&self) -> u64 {
        self.unallocated
    }

    pub fn account(&self, account_id: &AccountId) -> Option<DeliveryCounts> {
        self.per_account.get(account_id).copied()
    }

    pub fn accounts(&self) -> &BTreeMap<AccountId, DeliveryCounts> {
        &self.per_account
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply one pending→sent or pending→failed transition.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the campaign or the account has nothing pending
    pub fn apply_event(
        &mut self,
        account_id: &AccountId,
        outcome: DeliveryOutcome,
    ) -> Result<u64, ProgressError> {
        if !self.counts.has_pending() {
            return Err(ProgressError::invalid_transition(
                &self.campaign_id,
                Some(account_id),
                "campaign has no pending recipients",
            ));
        }

        let account = match self.per_account.get_mut(account_id) {
            Some(account) if account.has_pending() => account,
            Some(_) => {
                return Err(ProgressError::invalid_transition(
                    &self.campaign_id,
                    Some(account_id),
                    "account has no pending recipients",
                ))
            }
            None => {
                return Err(ProgressError::invalid_transition(
                    &self.campaign_id,
                    Some(account_id),
                    "account has no allocated recipients",
                ))
            }
        };

        account.record(outcome);
        self.counts.record(outcome);
        Ok(self.bump_sequence())
    }

    /// Assign `recipients` unallocated pending recipients to an account.
    ///
    /// # Errors
    ///
    /// - `Validation` if `recipients` is zero
    /// - `InvalidTransition` if fewer than `recipients` remain unallocated
    pub fn allocate(
        &mut self,
        account_id: &AccountId,
        recipients: u64,
    ) -> Result<u64, ProgressError> {
        if recipients == 0 {
            return Err(ValidationError::out_of_range("recipients", 1, self.unallocated.max(1), 0).into());
        }
        if recipients > self.unallocated {
            return Err(ProgressError::invalid_transition(
                &self.campaign_id,
                Some(account_id),
                format!(
                    "cannot allocate {} recipients, only {} unallocated",
                    recipients, self.unallocated
                ),
            ));
        }

        self.unallocated -= recipients;
        self.per_account
            .entry(account_id.clone())
            .or_default()
            .add_pending(recipients);
        Ok(self.bump_sequence())
    }

    /// Record the executor's status. No transition validation is performed.
    ///
    /// Entering `sending` stamps `started_at`; entering a terminal status
    /// stamps `completed_at`. Neither is ever overwritten.
    pub fn set_status(&mut self, status: CampaignStatus) -> u64 {
        let now = Timestamp::now();
        if status.is_sending() && self.started_at.is_none() {
            self.started_at = Some(now);
        }
        if status.is_terminal() && self.completed_at.is_none() {
            self.completed_at = Some(now);
        }
        self.status = status;
        self.bump_sequence()
    }

    /// Immutable copy of the current state.
    pub fn snapshot(&self) -> CampaignSnapshot {
        CampaignSnapshot {
            campaign_id: self.campaign_id.clone(),
            status: self.status,
            total: self.total,
            counts: self.counts,
            unallocated: self.unallocated,
            accounts: self.per_account.clone(),
            started_at: self.started_at,
            completed_at: self.completed_at,
            sequence: self.sequence,
        }
    }

    /// Checks the counter invariants listed on the type.
    pub fn invariants_hold(&self) -> bool {
        let accounts: DeliveryCounts = self.per_account.values().copied().sum();
        self.counts.total() == self.total
            && accounts.sent == self.counts.sent
            && accounts.failed == self.counts.failed
            && accounts.pending + self.unallocated == self.counts.pending
    }

    fn bump_sequence(&mut self) -> u64 {
        self.sequence += 1;
        debug_assert!(self.invariants_hold(), "campaign invariants violated");
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn campaign_id() -> CampaignId {
        CampaignId::new("spring-launch").unwrap()
    }

    fn account(name: &str) -> AccountId {
        AccountId::new(name).unwrap()
    }

    fn allocated(total: u64, account_id: &AccountId) -> CampaignAggregate {
        let mut aggregate = CampaignAggregate::new(campaign_id(), total);
        if total > 0 {
            aggregate.allocate(account_id, total).unwrap();
        }
        aggregate
    }

    #[test]
    fn new_aggregate_is_all_pending() {
        let aggregate = CampaignAggregate::new(campaign_id(), 5);
        assert_eq!(aggregate.counts(), DeliveryCounts::pending(5));
        assert_eq!(aggregate.unallocated(), 5);
        assert_eq!(aggregate.sequence(), 0);
        assert_eq!(aggregate.status(), CampaignStatus::Draft);
        assert!(aggregate.invariants_hold());
    }

    #[test]
    fn three_events_then_overflow_is_rejected() {
        let a = account("A");
        let mut aggregate = allocated(3, &a);

        aggregate.apply_event(&a, DeliveryOutcome::Sent).unwrap();
        aggregate.apply_event(&a, DeliveryOutcome::Failed).unwrap();
        aggregate.apply_event(&a, DeliveryOutcome::Sent).unwrap();

        assert_eq!(
            aggregate.counts(),
            DeliveryCounts { sent: 2, failed: 1, pending: 0 }
        );

        let before = aggregate.clone();
        let err = aggregate.apply_event(&a, DeliveryOutcome::Sent).unwrap_err();
        assert!(matches!(err, ProgressError::InvalidTransition { .. }));
        assert_eq!(aggregate, before);
    }

    #[test]
    fn event_for_unallocated_account_is_rejected() {
        let mut aggregate = allocated(2, &account("A"));
        let before = aggregate.clone();

        let err = aggregate
            .apply_event(&account("B"), DeliveryOutcome::Sent)
            .unwrap_err();

        assert!(matches!(err, ProgressError::InvalidTransition { .. }));
        assert_eq!(aggregate, before);
    }

    #[test]
    fn drained_account_rejects_while_campaign_still_pending() {
        let a = account("A");
        let b = account("B");
        let mut aggregate = CampaignAggregate::new(campaign_id(), 3);
        aggregate.allocate(&a, 1).unwrap();
        aggregate.allocate(&b, 2).unwrap();

        aggregate.apply_event(&a, DeliveryOutcome::Sent).unwrap();
        let err = aggregate.apply_event(&a, DeliveryOutcome::Sent).unwrap_err();

        assert!(matches!(err, ProgressError::InvalidTransition { .. }));
        assert_eq!(aggregate.counts().pending, 2);
    }

    #[test]
    fn apply_increments_sequence() {
        let a = account("A");
        let mut aggregate = allocated(2, &a);
        let after_alloc = aggregate.sequence();

        let seq = aggregate.apply_event(&a, DeliveryOutcome::Sent).unwrap();

        assert_eq!(seq, after_alloc + 1);
        assert_eq!(aggregate.sequence(), seq);
    }

    #[test]
    fn allocation_beyond_unallocated_is_rejected() {
        let mut aggregate = CampaignAggregate::new(campaign_id(), 4);
        aggregate.allocate(&account("A"), 3).unwrap();

        let err = aggregate.allocate(&account("B"), 2).unwrap_err();

        assert!(matches!(err, ProgressError::InvalidTransition { .. }));
        assert_eq!(aggregate.unallocated(), 1);
        assert!(aggregate.account(&account("B")).is_none());
    }

    #[test]
    fn zero_allocation_is_a_validation_error() {
        let mut aggregate = CampaignAggregate::new(campaign_id(), 4);
        let err = aggregate.allocate(&account("A"), 0).unwrap_err();
        assert!(matches!(err, ProgressError::Validation(_)));
        assert_eq!(aggregate.sequence(), 0);
    }

    #[test]
    fn repeated_allocation_accumulates() {
        let a = account("A");
        let mut aggregate = CampaignAggregate::new(campaign_id(), 4);
        aggregate.allocate(&a, 1).unwrap();
        aggregate.allocate(&a, 2).unwrap();
        assert_eq!(aggregate.account(&a), Some(DeliveryCounts::pending(3)));
        assert_eq!(aggregate.unallocated(), 1);
    }

    #[test]
    fn sending_stamps_started_at_once() {
        let mut aggregate = CampaignAggregate::new(campaign_id(), 1);
        aggregate.set_status(CampaignStatus::Sending);
        let first = aggregate.started_at().unwrap();

        aggregate.set_status(CampaignStatus::Paused);
        aggregate.set_status(CampaignStatus::Sending);

        assert_eq!(aggregate.started_at(), Some(first));
        assert!(aggregate.completed_at().is_none());
    }

    #[test]
    fn terminal_status_stamps_completed_at_once() {
        let mut aggregate = CampaignAggregate::new(campaign_id(), 1);
        aggregate.set_status(CampaignStatus::Failed);
        let first = aggregate.completed_at().unwrap();

        aggregate.set_status(CampaignStatus::Completed);

        assert_eq!(aggregate.completed_at(), Some(first));
        assert!(aggregate.is_terminal());
    }

    #[test]
    fn status_change_is_not_validated() {
        let mut aggregate = CampaignAggregate::new(campaign_id(), 1);
        aggregate.set_status(CampaignStatus::Completed);
        aggregate.set_status(CampaignStatus::Draft);
        assert_eq!(aggregate.status(), CampaignStatus::Draft);
        assert!(aggregate.completed_at().is_some());
    }

    #[test]
    fn snapshot_copies_state() {
        let a = account("A");
        let mut aggregate = allocated(2, &a);
        aggregate.apply_event(&a, DeliveryOutcome::Failed).unwrap();

        let snapshot = aggregate.snapshot();

        assert_eq!(snapshot.failed(), 1);
        assert_eq!(snapshot.pending(), 1);
        assert_eq!(snapshot.sequence, aggregate.sequence());
        assert_eq!(snapshot.accounts.get(&a), aggregate.account(&a).as_ref());
        assert_eq!(snapshot.percent_complete(), 50);
    }

    #[test]
    fn zero_total_campaign_rejects_events() {
        let mut aggregate = CampaignAggregate::new(campaign_id(), 0);
        let err = aggregate
            .apply_event(&account("A"), DeliveryOutcome::Sent)
            .unwrap_err();
        assert!(matches!(err, ProgressError::InvalidTransition { .. }));
        assert_eq!(aggregate.snapshot().percent_complete(), 100);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Allocate(usize, u64),
        Apply(usize, DeliveryOutcome),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..3, 1u64..5).prop_map(|(a, n)| Op::Allocate(a, n)),
            (0usize..3, prop_oneof![Just(DeliveryOutcome::Sent), Just(DeliveryOutcome::Failed)])
                .prop_map(|(a, o)| Op::Apply(a, o)),
        ]
    }

    proptest! {
        #[test]
        fn counters_always_balance(total in 0u64..30, ops in prop::collection::vec(op_strategy(), 0..80)) {
            let accounts = [account("A"), account("B"), account("C")];
            let mut aggregate = CampaignAggregate::new(campaign_id(), total);

            for op in ops {
                let before = aggregate.clone();
                let result = match op {
                    Op::Allocate(i, n) => aggregate.allocate(&accounts[i], n),
                    Op::Apply(i, outcome) => aggregate.apply_event(&accounts[i], outcome),
                };

                prop_assert!(aggregate.invariants_hold());
                prop_assert_eq!(aggregate.counts().total(), total);
                match result {
                    Ok(seq) => prop_assert_eq!(seq, before.sequence() + 1),
                    Err(_) => prop_assert_eq!(&aggregate, &before),
                }
            }
        }

        #[test]
        fn fully_allocated_accounts_sum_to_campaign(total in 1u64..20, outcomes in prop::collection::vec(any::<bool>(), 0..25)) {
            let a = account("A");
            let mut aggregate = allocated(total, &a);

            for sent in outcomes {
                let outcome = if sent { DeliveryOutcome::Sent } else { DeliveryOutcome::Failed };
                let _ = aggregate.apply_event(&a, outcome);
            }

            let sum: DeliveryCounts = aggregate.accounts().values().copied().sum();
            prop_assert_eq!(sum, aggregate.counts());
        }
    }
}

//! Initial shape of a campaign supplied by whoever creates its aggregate.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::foundation::{AccountId, CampaignId};

use super::{CampaignAggregate, ProgressError};

/// Recipient total plus an optional distribution over sending accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CampaignSeed {
    pub total: u64,
    #[serde(default)]
    pub accounts: BTreeMap<AccountId, u64>,
}

impl CampaignSeed {
    /// Seed with no account distribution.
    pub fn total(total: u64) -> Self {
        Self {
            total,
            accounts: BTreeMap::new(),
        }
    }

    pub fn with_account(mut self, account_id: AccountId, recipients: u64) -> Self {
        self.accounts.insert(account_id, recipients);
        self
    }

    /// Build the aggregate, applying the account distribution.
    ///
    /// With no distribution, every recipient goes to `fallback` when given
    /// and stays unallocated otherwise.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the distribution exceeds `total`
    /// - `Validation` if an account is given zero recipients
    pub fn build(
        &self,
        campaign_id: CampaignId,
        fallback: Option<&AccountId>,
    ) -> Result<CampaignAggregate, ProgressError> {
        let mut aggregate = CampaignAggregate::new(campaign_id, self.total);

        if self.accounts.is_empty() {
            if let (Some(account_id), true) = (fallback, self.total > 0) {
                aggregate.allocate(account_id, self.total)?;
            }
            return Ok(aggregate);
        }

        for (account_id, recipients) in &self.accounts {
            aggregate.allocate(account_id, *recipients)?;
        }
        Ok(aggregate)
    }

    /// Hand recipients to `account_id` on an aggregate created without a
    /// distribution, such as one opened by a dashboard stream.
    ///
    /// Only acts while recipients remain unallocated and `account_id` holds
    /// none. With no distribution the whole remainder goes to `account_id`.
    /// Otherwise each listed account without an allocation takes its share,
    /// capped by what remains, and nothing changes unless `account_id` ends
    /// up with recipients. Returns whether anything was allocated.
    ///
    /// # Errors
    ///
    /// Propagates allocation errors from the aggregate.
    pub fn settle(
        &self,
        aggregate: &mut CampaignAggregate,
        account_id: &AccountId,
    ) -> Result<bool, ProgressError> {
        let mut remaining = aggregate.unallocated();
        if remaining == 0 || aggregate.account(account_id).is_some() {
            return Ok(false);
        }

        if self.accounts.is_empty() {
            aggregate.allocate(account_id, remaining)?;
            return Ok(true);
        }

        let plan: Vec<(&AccountId, u64)> = self
            .accounts
            .iter()
            .filter(|(account, _)| aggregate.account(account).is_none())
            .map(|(account, recipients)| {
                let share = (*recipients).min(remaining);
                remaining -= share;
                (account, share)
            })
            .filter(|(_, share)| *share > 0)
            .collect();

        if !plan.iter().any(|(account, _)| *account == account_id) {
            return Ok(false);
        }
        for (account, share) in plan {
            aggregate.allocate(account, share)?;
        }
        Ok(true)
    }
}

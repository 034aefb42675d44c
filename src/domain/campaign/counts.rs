//! Sent/failed/pending counter triple.

use serde::{Deserialize, Serialize};

use super::DeliveryOutcome;

/// Delivery counters for a campaign or a single sending account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryCounts {
    pub sent: u64,
    pub failed: u64,
    pub pending: u64,
}

impl DeliveryCounts {
    /// Counters for `pending` recipients not yet dispatched.
    pub fn pending(pending: u64) -> Self {
        Self {
            sent: 0,
            failed: 0,
            pending,
        }
    }

    /// Sum of all three counters; constant across `record` calls.
    pub fn total(&self) -> u64 {
        self.sent + self.failed + self.pending
    }

    /// Whether another outcome can be recorded.
    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    /// Moves one recipient from pending to `outcome`.
    ///
    /// Callers must check [`has_pending`](Self::has_pending) first.
    pub(crate) fn record(&mut self, outcome: DeliveryOutcome) {
        debug_assert!(self.pending > 0, "record called with nothing pending");
        self.pending -= 1;
        match outcome {
            DeliveryOutcome::Sent => self.sent += 1,
            DeliveryOutcome::Failed => self.failed += 1,
        }
    }

    pub(crate) fn add_pending(&mut self, recipients: u64) {
        self.pending += recipients;
    }
}

impl std::ops::Add for DeliveryCounts {
    type Output = DeliveryCounts;

    fn add(self, rhs: Self) -> Self::Output {
        DeliveryCounts {
            sent: self.sent + rhs.sent,
            failed: self.failed + rhs.failed,
            pending: self.pending + rhs.pending,
        }
    }
}

impl std::iter::Sum for DeliveryCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(DeliveryCounts::default(), |acc, c| acc + c)
    }
}

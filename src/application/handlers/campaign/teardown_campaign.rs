//! TeardownCampaignHandler - Command handler for explicit teardown from the
//! send executor.

use crate::adapters::progress::CampaignAggregator;
use crate::domain::campaign::ProgressError;
use crate::domain::foundation::CampaignId;

/// Command to tear a campaign down.
#[derive(Debug, Clone)]
pub struct TeardownCampaignCommand {
    pub campaign_id: CampaignId,
}

/// Result of a teardown request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeardownCampaignResult {
    /// False when eviction waits for attached subscribers to leave.
    pub evicted: bool,
}

/// Handler for teardown requests.
pub struct TeardownCampaignHandler {
    aggregator: CampaignAggregator,
}

impl TeardownCampaignHandler {
    pub fn new(aggregator: CampaignAggregator) -> Self {
        Self { aggregator }
    }

    pub async fn handle(
        &self,
        cmd: TeardownCampaignCommand,
    ) -> Result<TeardownCampaignResult, ProgressError> {
        let evicted = self.aggregator.teardown(&cmd.campaign_id)?;
        Ok(TeardownCampaignResult { evicted })
    }
}

//! Campaign progress command and query handlers.

mod allocate_account;
mod apply_delivery_event;
mod get_campaign_progress;
mod list_active_campaigns;
mod set_campaign_status;
mod teardown_campaign;

pub use allocate_account::{AllocateAccountCommand, AllocateAccountHandler};
pub use apply_delivery_event::{ApplyDeliveryEventCommand, ApplyDeliveryEventHandler};
pub use get_campaign_progress::{GetCampaignProgressHandler, GetCampaignProgressQuery};
pub use list_active_campaigns::{
    ActiveCampaigns, ListActiveCampaignsHandler, ListActiveCampaignsQuery,
};
pub use set_campaign_status::{SetCampaignStatusCommand, SetCampaignStatusHandler};
pub use teardown_campaign::{
    TeardownCampaignCommand, TeardownCampaignHandler, TeardownCampaignResult,
};

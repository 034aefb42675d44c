//! Application handlers.
//!
//! Command and query handlers that orchestrate the progress engine.

pub mod campaign;

pub use campaign::{
    // Commands
    AllocateAccountCommand, AllocateAccountHandler,
    ApplyDeliveryEventCommand, ApplyDeliveryEventHandler,
    SetCampaignStatusCommand, SetCampaignStatusHandler,
    TeardownCampaignCommand, TeardownCampaignHandler, TeardownCampaignResult,
    // Queries
    ActiveCampaigns, GetCampaignProgressHandler, GetCampaignProgressQuery,
    ListActiveCampaignsHandler, ListActiveCampaignsQuery,
};

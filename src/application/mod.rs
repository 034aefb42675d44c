//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer sits between the HTTP adapters and the progress engine.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    AllocateAccountCommand, AllocateAccountHandler, ApplyDeliveryEventCommand,
    ApplyDeliveryEventHandler, GetCampaignProgressHandler, GetCampaignProgressQuery,
    ListActiveCampaignsHandler, ListActiveCampaignsQuery, SetCampaignStatusCommand,
    SetCampaignStatusHandler, TeardownCampaignCommand, TeardownCampaignHandler,
};

//! Campaign progress domain.
//!
//! Pure aggregation of delivery outcomes into per-campaign and per-account
//! counters. No I/O and no locking here.

mod aggregate;
mod counts;
mod errors;
mod outcome;
mod seed;
mod snapshot;

pub use aggregate::CampaignAggregate;
pub use counts::DeliveryCounts;
pub use errors::ProgressError;
pub use outcome::DeliveryOutcome;
pub use seed::CampaignSeed;
pub use snapshot::CampaignSnapshot;

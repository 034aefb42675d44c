//! In-memory campaign progress engine.
//!
//! - `store` - registry of live aggregates, one lock per campaign
//! - `aggregator` - applies events, allocations, and status changes
//! - `broker` - subscriber registration and snapshot fan-out
//! - `eviction` - background removal of finished, unwatched campaigns

mod aggregator;
mod broker;
mod eviction;
mod store;

pub use aggregator::CampaignAggregator;
pub use broker::{SubscriptionBroker, SubscriptionHandle};
pub use eviction::{EvictionConfig, EvictionSweeper};
pub use store::{CampaignEntry, SnapshotStore, Subscriber, DEFAULT_QUEUE_CAPACITY};

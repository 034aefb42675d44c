//! Adapters - the progress engine and the transports around it.
//!
//! - `progress` - Snapshot store, aggregator, subscription broker, eviction
//! - `sse` - Server-sent events stream for dashboard clients
//! - `http` - REST endpoints for the send executor and dashboard reads

pub mod http;
pub mod progress;
pub mod sse;

pub use progress::{
    CampaignAggregator, EvictionConfig, EvictionSweeper, SnapshotStore, SubscriptionBroker,
    SubscriptionHandle,
};

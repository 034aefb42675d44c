//! Background sweeper that evicts finished, unwatched campaigns.
//!
//! A campaign becomes a candidate once it is terminal and has no
//! subscribers. It is removed after the grace period passes without anyone
//! reattaching.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::domain::foundation::CampaignId;

use super::store::SnapshotStore;

/// Timing for the eviction sweeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionConfig {
    /// How long a terminal, unwatched campaign is kept.
    pub grace: Duration,

    /// How often the store is swept.
    pub sweep_interval: Duration,
}

impl Default for EvictionConfig {
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(5),
        }
    }
}

impl EvictionConfig {
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Periodically removes campaigns whose grace period has expired.
pub struct EvictionSweeper {
    store: Arc<SnapshotStore>,
    config: EvictionConfig,
}

impl EvictionSweeper {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self {
            store,
            config: EvictionConfig::default(),
        }
    }

    pub fn with_config(store: Arc<SnapshotStore>, config: EvictionConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EvictionConfig {
        &self.config
    }

    /// Sweep until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.sweep_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("Eviction sweeper stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep_once();
                }
            }
        }
    }

    /// Run one sweep and return the evicted campaigns.
    pub fn sweep_once(&self) -> Vec<CampaignId> {
        let evicted = self.store.evict_idle(Instant::now(), self.config.grace);
        if !evicted.is_empty() {
            tracing::info!(count = evicted.len(), "Evicted idle campaigns");
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::progress::{CampaignAggregator, SubscriptionBroker};
    use crate::domain::foundation::CampaignStatus;

    fn campaign() -> CampaignId {
        CampaignId::new("spring-launch").unwrap()
    }

    fn config() -> EvictionConfig {
        EvictionConfig::default()
            .with_grace(Duration::from_secs(30))
            .with_sweep_interval(Duration::from_secs(5))
    }

    fn completed_campaign(store: &Arc<SnapshotStore>) {
        store.get_or_create(&campaign(), 1);
        CampaignAggregator::new(store.clone())
            .set_status(&campaign(), CampaignStatus::Completed)
            .unwrap();
    }

    #[test]
    fn config_builders_override_defaults() {
        let config = EvictionConfig::default()
            .with_grace(Duration::from_secs(1))
            .with_sweep_interval(Duration::from_millis(10));

        assert_eq!(config.grace, Duration::from_secs(1));
        assert_eq!(config.sweep_interval, Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn completed_campaign_survives_grace_then_goes() {
        let store = Arc::new(SnapshotStore::default());
        completed_campaign(&store);
        let sweeper = EvictionSweeper::with_config(store.clone(), config());

        time::advance(Duration::from_secs(29)).await;
        assert!(sweeper.sweep_once().is_empty());

        time::advance(Duration::from_secs(2)).await;
        assert_eq!(sweeper.sweep_once(), vec![campaign()]);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn watched_campaign_is_kept() {
        let store = Arc::new(SnapshotStore::default());
        completed_campaign(&store);
        let (_, _handle) = SubscriptionBroker::new(store.clone())
            .subscribe(&campaign(), None)
            .unwrap();
        let sweeper = EvictionSweeper::with_config(store.clone(), config());

        time::advance(Duration::from_secs(120)).await;

        assert!(sweeper.sweep_once().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reattaching_resets_grace_timer() {
        let store = Arc::new(SnapshotStore::default());
        completed_campaign(&store);
        let broker = SubscriptionBroker::new(store.clone());
        let sweeper = EvictionSweeper::with_config(store.clone(), config());

        time::advance(Duration::from_secs(20)).await;
        broker.subscribe(&campaign(), None).unwrap().1.close();
        time::advance(Duration::from_secs(20)).await;

        assert!(sweeper.sweep_once().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown_signal() {
        let store = Arc::new(SnapshotStore::default());
        completed_campaign(&store);
        let sweeper = EvictionSweeper::with_config(store.clone(), config());
        let (tx, rx) = watch::channel(false);

        let task = tokio::spawn(async move { sweeper.run(rx).await });
        time::sleep(Duration::from_secs(40)).await;
        assert!(store.is_empty());

        tx.send(true).unwrap();
        task.await.unwrap();
    }
}

//! Fixed-interval scheduling of sync passes.

use crate::client::{ConsumerClient, ProviderClient};
use crate::coordinator::SyncCoordinator;
use crate::error::{SyncError, SyncResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Smallest polling interval the scheduler accepts.
pub const MIN_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Handle for stopping a running scheduler from another task.
///
/// The stop request takes effect at the next tick boundary; a pass that is
/// already in flight always finishes.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests the scheduler to stop.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Drives the coordinator: one initial full pass, then one change-detected
/// pass per interval, until stopped.
///
/// The loop is strictly sequential, so passes never overlap: the next
/// interval sleep only starts once the previous pass has finished. Failures
/// inside a pass are already absorbed per vehicle and never end the loop.
pub struct Scheduler<P: ProviderClient, C: ConsumerClient> {
    coordinator: SyncCoordinator<P, C>,
    interval: Duration,
    stop: StopHandle,
}

impl<P: ProviderClient, C: ConsumerClient> std::fmt::Debug for Scheduler<P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("interval", &self.interval)
            .field("stop", &self.stop)
            .finish_non_exhaustive()
    }
}

impl<P: ProviderClient, C: ConsumerClient> Scheduler<P, C> {
    /// Creates a scheduler, rejecting intervals below [`MIN_SYNC_INTERVAL`].
    pub fn new(coordinator: SyncCoordinator<P, C>, interval: Duration) -> SyncResult<Self> {
        if interval < MIN_SYNC_INTERVAL {
            return Err(SyncError::configuration(format!(
                "sync interval must be at least {} seconds, got {}",
                MIN_SYNC_INTERVAL.as_secs(),
                interval.as_secs()
            )));
        }

        Ok(Self {
            coordinator,
            interval,
            stop: StopHandle::default(),
        })
    }

    /// The configured polling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The coordinator driven by this scheduler.
    pub fn coordinator(&self) -> &SyncCoordinator<P, C> {
        &self.coordinator
    }

    /// Returns a handle that stops the run loop from another task.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Runs the initial sync, then a sync pass per interval until stopped.
    pub async fn run(&self) {
        let result = self.coordinator.initial_sync().await;
        info!(
            pushed = result.pushed,
            failed = result.failed,
            "initial sync finished"
        );

        info!(interval_secs = self.interval.as_secs(), "starting sync loop");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // An interval yields its first tick immediately; consume it so the
        // first cycle runs one full interval after the initial sync.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if self.stop.is_stopped() {
                info!("sync loop stopped");
                return;
            }

            info!("running sync cycle");
            let result = self.coordinator.sync().await;
            debug!(
                pushed = result.pushed,
                skipped = result.skipped,
                failed = result.failed,
                "sync cycle finished"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockConsumer, MockProvider};
    use crate::mapping::VehicleMapping;
    use fleetsync_protocol::VehicleStatus;

    fn coordinator(
        provider: Arc<MockProvider>,
        consumer: Arc<MockConsumer>,
    ) -> SyncCoordinator<Arc<MockProvider>, Arc<MockConsumer>> {
        let mapping =
            VehicleMapping::from_lists(vec!["d1".to_string()], vec!["c1".to_string()]).unwrap();
        SyncCoordinator::new(mapping, provider, consumer)
    }

    fn status(code: i64) -> VehicleStatus {
        VehicleStatus {
            status: code,
            lat: 1.0,
            lng: 2.0,
            status_ts: 0,
        }
    }

    #[test]
    fn interval_below_minimum_is_rejected() {
        let provider = Arc::new(MockProvider::new());
        let consumer = Arc::new(MockConsumer::new());

        let err = Scheduler::new(coordinator(provider, consumer), Duration::from_secs(10))
            .unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn minimum_interval_is_accepted() {
        let provider = Arc::new(MockProvider::new());
        let consumer = Arc::new(MockConsumer::new());

        let scheduler =
            Scheduler::new(coordinator(provider, consumer), MIN_SYNC_INTERVAL).unwrap();
        assert_eq!(scheduler.interval(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_the_run_loop_after_the_initial_sync() {
        let provider = Arc::new(MockProvider::new());
        let consumer = Arc::new(MockConsumer::new());
        provider.set_status("d1", status(1));

        let scheduler = Scheduler::new(
            coordinator(Arc::clone(&provider), Arc::clone(&consumer)),
            Duration::from_secs(30),
        )
        .unwrap();

        let handle = scheduler.stop_handle();
        handle.stop();

        // With the stop flag already set, run() performs the initial sync
        // and exits at the first tick. Paused time advances automatically.
        tokio::time::timeout(Duration::from_secs(120), scheduler.run())
            .await
            .unwrap();

        assert_eq!(consumer.push_count(), 1);
        assert_eq!(scheduler.coordinator().stats().passes_completed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cycles_repeat_at_the_configured_interval() {
        let provider = Arc::new(MockProvider::new());
        let consumer = Arc::new(MockConsumer::new());
        provider.set_status("d1", status(1));

        let scheduler = Arc::new(
            Scheduler::new(
                coordinator(Arc::clone(&provider), Arc::clone(&consumer)),
                Duration::from_secs(30),
            )
            .unwrap(),
        );
        let handle = scheduler.stop_handle();

        let runner = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.run().await })
        };

        // Initial sync at t=0, then cycles at t=30/60/90.
        tokio::time::sleep(Duration::from_secs(95)).await;
        handle.stop();
        runner.await.unwrap();

        let stats = scheduler.coordinator().stats();
        assert_eq!(stats.passes_completed, 4);
        // The status never changed, so only the initial pass pushed.
        assert_eq!(consumer.push_count(), 1);
        assert_eq!(stats.vehicles_skipped, 3);
    }
}

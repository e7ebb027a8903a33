//! The sync coordinator: change detection and per-vehicle orchestration.

use crate::client::{ConsumerClient, ProviderClient};
use crate::convert::convert;
use crate::error::SyncResult;
use crate::mapping::VehicleMapping;
use fleetsync_protocol::StatusSnapshot;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace};

/// Summary of one full pass over the mapped vehicles.
#[derive(Debug, Clone, Default)]
pub struct SyncPassResult {
    /// Vehicles whose status was pushed to the consumer.
    pub pushed: u64,
    /// Vehicles skipped because their triple was unchanged.
    pub skipped: u64,
    /// Vehicles that failed and were isolated.
    pub failed: u64,
    /// Wall-clock duration of the pass.
    pub duration: Duration,
}

/// Cumulative counters across all passes.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Completed passes, including the initial one.
    pub passes_completed: u64,
    /// Total pushes to the consumer.
    pub vehicles_pushed: u64,
    /// Total vehicles skipped as unchanged.
    pub vehicles_skipped: u64,
    /// Total isolated per-vehicle failures.
    pub vehicles_failed: u64,
    /// Message of the most recent per-vehicle failure.
    pub last_error: Option<String>,
    /// When the last pass finished.
    pub last_pass_time: Option<Instant>,
}

/// What happened to one vehicle within a pass.
enum VehicleOutcome {
    /// A new value was pushed; carries the status code for the log line.
    Pushed { status: i64 },
    /// The cached triple matched; nothing was sent.
    Unchanged,
}

/// Orchestrates fetch → compare → convert → push for every mapped vehicle.
///
/// The coordinator owns the only long-lived mutable state of the bridge: the
/// per-vehicle cache of last-observed (status, latitude, longitude) triples
/// used for change detection. Clients, mapping, and the coordinator itself
/// are injected explicitly; there is no ambient state.
///
/// Every failure during one vehicle's processing is caught at the vehicle
/// boundary, logged with the vehicle id, and never affects the remaining
/// vehicles of the pass.
pub struct SyncCoordinator<P: ProviderClient, C: ConsumerClient> {
    mapping: VehicleMapping,
    provider: P,
    consumer: C,
    cache: RwLock<HashMap<String, StatusSnapshot>>,
    stats: RwLock<SyncStats>,
}

impl<P: ProviderClient, C: ConsumerClient> SyncCoordinator<P, C> {
    /// Creates a coordinator over a validated mapping and the two clients.
    pub fn new(mapping: VehicleMapping, provider: P, consumer: C) -> Self {
        Self {
            mapping,
            provider,
            consumer,
            cache: RwLock::new(HashMap::new()),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// The vehicle mapping this coordinator iterates.
    pub fn mapping(&self) -> &VehicleMapping {
        &self.mapping
    }

    /// Snapshot of the cumulative counters.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// The cached triple for a provider id, if any pass recorded one.
    pub fn cached_snapshot(&self, provider_id: &str) -> Option<StatusSnapshot> {
        self.cache.read().get(provider_id).copied()
    }

    /// Primes the cache and the consumer with a fresh value for every
    /// mapped vehicle, regardless of prior state.
    pub async fn initial_sync(&self) -> SyncPassResult {
        let vehicles: Vec<&str> = self.mapping.provider_ids().collect();
        info!(?vehicles, "initial sync started");
        self.run_pass(true).await
    }

    /// One change-detected pass: pushes only vehicles whose triple differs
    /// from the cached one.
    pub async fn sync(&self) -> SyncPassResult {
        debug!("sync pass started");
        self.run_pass(false).await
    }

    async fn run_pass(&self, prime: bool) -> SyncPassResult {
        let start = Instant::now();
        let mut result = SyncPassResult::default();

        for (provider_id, consumer_id) in self.mapping.pairs() {
            trace!(vehicle = provider_id, "processing vehicle");
            match self.sync_vehicle(provider_id, consumer_id, prime).await {
                Ok(VehicleOutcome::Pushed { status }) => {
                    result.pushed += 1;
                    info!(vehicle = provider_id, status, "status pushed");
                }
                Ok(VehicleOutcome::Unchanged) => {
                    result.skipped += 1;
                    trace!(vehicle = provider_id, "status unchanged, skipped");
                }
                Err(e) => {
                    result.failed += 1;
                    self.stats.write().last_error = Some(e.to_string());
                    error!(
                        vehicle = provider_id,
                        consumer = consumer_id,
                        error = %e,
                        "vehicle sync failed"
                    );
                }
            }
        }

        result.duration = start.elapsed();

        let mut stats = self.stats.write();
        stats.passes_completed += 1;
        stats.vehicles_pushed += result.pushed;
        stats.vehicles_skipped += result.skipped;
        stats.vehicles_failed += result.failed;
        stats.last_pass_time = Some(Instant::now());

        result
    }

    /// One vehicle's fetch-compare-convert-push. Any error aborts this
    /// vehicle only; the caller isolates it.
    async fn sync_vehicle(
        &self,
        provider_id: &str,
        consumer_id: &str,
        prime: bool,
    ) -> SyncResult<VehicleOutcome> {
        let status = self.provider.fetch_status(provider_id).await?;
        let snapshot = status.snapshot();

        if !prime {
            let unchanged = self.cache.read().get(provider_id) == Some(&snapshot);
            if unchanged {
                return Ok(VehicleOutcome::Unchanged);
            }
        }

        // The cache is updated before the push and is not rolled back if the
        // push fails: the next pass then sees an unchanged triple and will
        // not retry until the source value changes again. Known limitation,
        // kept for parity with the deployed behavior.
        self.cache
            .write()
            .insert(provider_id.to_string(), snapshot);

        let report = convert(&status);
        self.consumer.push_status(consumer_id, &report).await?;

        Ok(VehicleOutcome::Pushed {
            status: status.status,
        })
    }
}

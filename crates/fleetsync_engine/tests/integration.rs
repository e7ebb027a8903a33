//! Integration tests for the coordinator and scheduler over mock clients.

use fleetsync_engine::{MockConsumer, MockProvider, Scheduler, SyncCoordinator, VehicleMapping};
use fleetsync_protocol::VehicleStatus;
use std::sync::Arc;
use std::time::Duration;

fn status(code: i64, lat: f64, lng: f64, status_ts: i64) -> VehicleStatus {
    VehicleStatus {
        status: code,
        lat,
        lng,
        status_ts,
    }
}

fn mapping(pairs: &[(&str, &str)]) -> VehicleMapping {
    VehicleMapping::from_lists(
        pairs.iter().map(|(p, _)| p.to_string()).collect(),
        pairs.iter().map(|(_, c)| c.to_string()).collect(),
    )
    .unwrap()
}

#[tokio::test]
async fn single_vehicle_bridge_lifecycle() {
    let provider = Arc::new(MockProvider::new());
    let consumer = Arc::new(MockConsumer::new());
    let coordinator = SyncCoordinator::new(
        mapping(&[("d1", "c1")]),
        Arc::clone(&provider),
        Arc::clone(&consumer),
    );

    // Initial sync pushes unconditionally.
    provider.set_status("d1", status(1, 1.0, 2.0, 0));
    let result = coordinator.initial_sync().await;
    assert_eq!(result.pushed, 1);
    assert_eq!(consumer.pushes()[0].0, "c1");
    assert_eq!(consumer.pushes()[0].1.status, 1);

    // Same triple again: nothing is sent.
    let result = coordinator.sync().await;
    assert_eq!(result.skipped, 1);
    assert_eq!(consumer.push_count(), 1);

    // Status code changes: exactly one push with the new value.
    provider.set_status("d1", status(2, 1.0, 2.0, 0));
    let result = coordinator.sync().await;
    assert_eq!(result.pushed, 1);
    assert_eq!(consumer.push_count(), 2);
    assert_eq!(consumer.pushes()[1].1.status, 2);

    let snapshot = coordinator.cached_snapshot("d1").unwrap();
    assert_eq!(snapshot.status, 2);
}

#[tokio::test]
async fn failing_vehicle_never_blocks_the_fleet() {
    let provider = Arc::new(MockProvider::new());
    let consumer = Arc::new(MockConsumer::new());
    let coordinator = SyncCoordinator::new(
        mapping(&[("d1", "c1"), ("d2", "c2"), ("d3", "c3")]),
        Arc::clone(&provider),
        Arc::clone(&consumer),
    );

    provider.set_status("d1", status(1, 1.0, 1.0, 0));
    provider.set_status("d3", status(3, 3.0, 3.0, 0));
    provider.set_failing("d2", true);

    let result = coordinator.initial_sync().await;
    assert_eq!(result.pushed, 2);
    assert_eq!(result.failed, 1);

    // d2 keeps failing on every cycle while the others sync normally.
    provider.set_status("d1", status(2, 1.0, 1.0, 0));
    let result = coordinator.sync().await;
    assert_eq!(result.pushed, 1);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.failed, 1);

    let pushes = consumer.pushes();
    let targets: Vec<&str> = pushes.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(targets, vec!["c1", "c3", "c1"]);
}

#[tokio::test(start_paused = true)]
async fn scheduler_picks_up_changes_between_cycles() {
    let provider = Arc::new(MockProvider::new());
    let consumer = Arc::new(MockConsumer::new());
    let coordinator = SyncCoordinator::new(
        mapping(&[("d1", "c1")]),
        Arc::clone(&provider),
        Arc::clone(&consumer),
    );

    provider.set_status("d1", status(1, 1.0, 2.0, 0));
    let scheduler = Arc::new(Scheduler::new(coordinator, Duration::from_secs(30)).unwrap());
    let handle = scheduler.stop_handle();

    let runner = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move { scheduler.run().await })
    };

    // Initial sync at t=0; the cycle at t=30 sees no change.
    tokio::time::sleep(Duration::from_secs(35)).await;
    assert_eq!(consumer.push_count(), 1);

    // A status change before t=60 is pushed by the next cycle.
    provider.set_status("d1", status(6, 1.0, 2.0, 0));
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(consumer.push_count(), 2);
    assert_eq!(consumer.pushes()[1].1.status, 6);

    handle.stop();
    runner.await.unwrap();

    let stats = scheduler.coordinator().stats();
    assert_eq!(stats.vehicles_pushed, 2);
    assert_eq!(stats.vehicles_skipped, 1);
}

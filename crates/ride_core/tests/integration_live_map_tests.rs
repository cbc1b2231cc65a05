mod support;

use std::time::Duration;

use ride_core::geo::{Coordinate, FALLBACK_REGION};
use ride_core::matching::find_nearest;
use ride_core::projection::MarkerCategory;
use ride_core::roster::{RosterJitter, RosterSimulator};

use support::{settle, Harness};

const TICK: Duration = Duration::from_secs(10);

#[tokio::test(start_paused = true)]
async fn map_tracks_location_and_roster_ticks() {
    let user = Coordinate::new(37.7760, -122.4180);
    let harness = Harness::new(user);
    let snapshots = harness.map.snapshot();
    let mut projector = harness.map.spawn_projector();
    let simulator = RosterSimulator::new(
        harness.drivers.clone(),
        harness.location.clone(),
        TICK,
        RosterJitter::new(Some(5)),
    );
    let mut roster_timer = simulator.attach();

    settle().await;
    assert_eq!(snapshots.read(|s| s.region), FALLBACK_REGION);
    assert!(snapshots.read(|s| s.nearest.is_none()));

    harness.controller.start().await;
    settle().await;

    for _ in 0..3 {
        let (markers, nearest) = snapshots.read(|s| {
            (
                s.markers.clone(),
                s.nearest.as_ref().map(|n| n.driver.clone()),
            )
        });
        assert_eq!(markers[0].category, MarkerCategory::User);
        assert_eq!(markers.len(), 4);

        let roster = harness.drivers.drivers();
        let expected = find_nearest(user, &roster).cloned();
        assert_eq!(nearest, expected);

        tokio::time::sleep(TICK).await;
    }

    assert!(roster_timer.cancel());
    assert!(projector.cancel());
    harness.controller.stop();
}

#[tokio::test(start_paused = true)]
async fn losing_the_user_stops_roster_updates() {
    let harness = Harness::new(Coordinate::new(37.7749, -122.4194));
    let simulator = RosterSimulator::new(
        harness.drivers.clone(),
        harness.location.clone(),
        TICK,
        RosterJitter::new(Some(9)),
    );
    let _roster_timer = simulator.attach();

    harness.controller.start().await;
    settle().await;
    tokio::time::sleep(TICK * 2).await;

    harness.controller.stop();
    harness.location.clear_user_location();
    settle().await;

    let frozen = harness.drivers.drivers();
    tokio::time::sleep(TICK * 5).await;
    assert_eq!(harness.drivers.drivers(), frozen);
}

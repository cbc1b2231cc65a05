mod support;

use ride_core::geo::Coordinate;
use ride_core::location::{LocationError, LocationNotice, TrackingState, WatchThresholds};

use support::fakes::AddressBook;
use support::{settle, Harness};

fn downtown() -> Coordinate {
    Coordinate::new(37.7749, -122.4194)
}

#[tokio::test(start_paused = true)]
async fn first_fix_is_resolved_and_written() {
    let harness = Harness::new(downtown());

    assert_eq!(harness.controller.start().await, TrackingState::Tracking);
    let state = harness.location.snapshot();
    assert_eq!(state.user, Some(downtown()));
    assert_eq!(state.user_address, Some(AddressBook::address_for(downtown())));
    assert_eq!(harness.provider.subscriptions(), 1);
    assert_eq!(
        harness.provider.last_thresholds(),
        Some(WatchThresholds::default())
    );
    harness.controller.stop();
}

#[tokio::test(start_paused = true)]
async fn subscription_survives_failed_updates() {
    let harness = Harness::new(downtown());
    harness.controller.start().await;

    let next = downtown().offset(0.001, 0.0);
    assert!(harness.provider.push_error(LocationError::Fix("lost signal".into())));
    settle().await;
    assert!(matches!(
        harness.controller.status().get().notice,
        Some(LocationNotice::LocationUnavailable(_))
    ));
    assert_eq!(harness.controller.state(), TrackingState::Tracking);

    assert!(harness.provider.push_fix(next));
    settle().await;
    assert_eq!(harness.location.user(), Some(next));
    assert!(harness.controller.is_subscribed());
    harness.controller.stop();
}

#[tokio::test(start_paused = true)]
async fn lookup_failure_still_updates_position() {
    let harness = Harness::new(downtown());
    harness.geocoder.set_offline(true);
    harness.controller.start().await;

    let state = harness.location.snapshot();
    assert_eq!(state.user, Some(downtown()));
    assert_eq!(state.user_address, None);
    assert_eq!(harness.geocoder.lookups(), 1);
    harness.controller.stop();
}

#[tokio::test(start_paused = true)]
async fn double_cancel_produces_no_further_writes() {
    let harness = Harness::new(downtown());
    harness.controller.start().await;
    let mut updates = harness.location.subscribe();
    let _ = updates.borrow_and_update();

    assert!(harness.controller.stop());
    assert!(!harness.controller.stop());
    settle().await;

    assert!(harness.provider.is_released());
    assert!(!harness.provider.push_fix(downtown().offset(0.01, 0.01)));
    settle().await;
    assert!(!updates.has_changed().expect("store alive"));
    assert_eq!(harness.location.user(), Some(downtown()));
    assert_eq!(harness.controller.state(), TrackingState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn restart_after_stop_opens_a_new_subscription() {
    let harness = Harness::new(downtown());
    harness.controller.start().await;
    harness.controller.stop();
    settle().await;

    assert_eq!(harness.controller.start().await, TrackingState::Tracking);
    assert_eq!(harness.provider.subscriptions(), 2);
    assert!(harness.provider.push_fix(downtown().offset(0.002, 0.0)));
    settle().await;
    assert_eq!(harness.location.user(), Some(downtown().offset(0.002, 0.0)));
    harness.controller.stop();
}

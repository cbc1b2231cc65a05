use ride_core::geo::haversine_distance_km;
use ride_core::matching::find_nearest;
use ride_core::projection::build_markers;
use ride_core::location::LocationState;
use ride_core::roster::RosterJitter;
use ride_core::test_helpers::{spread_roster, TEST_USER};

#[test]
fn nearest_over_large_roster_matches_brute_force() {
    let mut jitter = RosterJitter::new(Some(17));
    let mut roster = spread_roster(5_000);

    for _ in 0..20 {
        roster = jitter.perturb(&roster);
        let nearest = find_nearest(TEST_USER, &roster).expect("available drivers exist");
        let best = roster
            .iter()
            .filter(|d| d.is_available)
            .map(|d| haversine_distance_km(TEST_USER, d.coordinate()))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(haversine_distance_km(TEST_USER, nearest.coordinate()), best);
    }
}

#[test]
fn markers_scale_with_available_drivers() {
    let roster = spread_roster(2_000);
    let state = LocationState {
        user: Some(TEST_USER),
        ..Default::default()
    };
    let available = roster.iter().filter(|d| d.is_available).count();
    assert_eq!(build_markers(&state, &roster).len(), available + 1);
}

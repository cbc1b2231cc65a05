//! Performance benchmarks for ride_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ride_core::location::LocationState;
use ride_core::matching::find_nearest;
use ride_core::projection::build_markers;
use ride_core::roster::RosterJitter;
use ride_core::test_helpers::{spread_roster, TEST_DESTINATION, TEST_USER};

const ROSTER_SIZES: [(&str, usize); 3] = [("small", 50), ("medium", 1_000), ("large", 20_000)];

fn bench_find_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_nearest");
    for (name, size) in ROSTER_SIZES {
        let roster = spread_roster(size);
        group.bench_with_input(BenchmarkId::from_parameter(name), &roster, |b, roster| {
            b.iter(|| black_box(find_nearest(black_box(TEST_USER), roster)));
        });
    }
    group.finish();
}

fn bench_roster_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("roster_tick");
    for (name, size) in ROSTER_SIZES {
        let roster = spread_roster(size);
        let mut jitter = RosterJitter::new(Some(42));
        group.bench_with_input(BenchmarkId::from_parameter(name), &roster, |b, roster| {
            b.iter(|| black_box(jitter.perturb(roster)));
        });
    }
    group.finish();
}

fn bench_build_markers(c: &mut Criterion) {
    let state = LocationState {
        user: Some(TEST_USER),
        user_address: Some("Market St San Francisco CA".to_string()),
        destination: Some(TEST_DESTINATION),
        destination_address: None,
    };
    let mut group = c.benchmark_group("build_markers");
    for (name, size) in ROSTER_SIZES {
        let roster = spread_roster(size);
        group.bench_with_input(BenchmarkId::from_parameter(name), &roster, |b, roster| {
            b.iter(|| black_box(build_markers(&state, roster)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_find_nearest, bench_roster_tick, bench_build_markers);
criterion_main!(benches);

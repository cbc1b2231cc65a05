//! Test helpers for common test setup and utilities.
//!
//! Shared by unit tests, integration tests and benches to keep fixtures consistent.

use crate::driver::{Driver, DriverLocation, Vehicle};
use crate::geo::Coordinate;

/// Downtown San Francisco, the default user position in tests.
pub const TEST_USER: Coordinate = Coordinate::new(37.7749, -122.4194);

/// Ferry Building, a short ride from [`TEST_USER`].
pub const TEST_DESTINATION: Coordinate = Coordinate::new(37.7955, -122.3937);

/// Builder for drivers with sensible defaults.
#[derive(Debug, Clone)]
pub struct DriverBuilder {
    driver: Driver,
}

impl DriverBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            driver: Driver {
                id: id.to_string(),
                name: format!("Driver {id}"),
                vehicle: Vehicle {
                    model: "Test Car".to_string(),
                    plate_number: format!("TST-{id}"),
                    color: "Grey".to_string(),
                },
                rating: 4.5,
                is_available: true,
                current_location: DriverLocation {
                    latitude: TEST_USER.latitude,
                    longitude: TEST_USER.longitude,
                    address: "San Francisco, CA".to_string(),
                },
                estimated_arrival_minutes: 5,
                price_per_km: 2.0,
            },
        }
    }

    pub fn at(mut self, coordinate: Coordinate) -> Self {
        self.driver.current_location.latitude = coordinate.latitude;
        self.driver.current_location.longitude = coordinate.longitude;
        self
    }

    pub fn available(mut self, is_available: bool) -> Self {
        self.driver.is_available = is_available;
        self
    }

    pub fn eta(mut self, minutes: u32) -> Self {
        self.driver.estimated_arrival_minutes = minutes;
        self
    }

    pub fn price_per_km(mut self, price: f64) -> Self {
        self.driver.price_per_km = price;
        self
    }

    pub fn build(self) -> Driver {
        self.driver
    }
}

/// Point `km` kilometres due north of `origin`.
pub fn north_of(origin: Coordinate, km: f64) -> Coordinate {
    origin.offset(km / 111.195, 0.0)
}

/// Roster of `count` available drivers spread around [`TEST_USER`].
pub fn spread_roster(count: usize) -> Vec<Driver> {
    (0..count)
        .map(|i| {
            let step = i as f64 * 0.0007;
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            DriverBuilder::new(&i.to_string())
                .at(TEST_USER.offset(sign * step, step / 2.0))
                .available(i % 5 != 0)
                .build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::haversine_distance_km;

    #[test]
    fn north_of_is_close_to_requested_distance() {
        let point = north_of(TEST_USER, 2.0);
        let distance = haversine_distance_km(TEST_USER, point);
        assert!((distance - 2.0).abs() < 0.01, "got {distance}");
    }

    #[test]
    fn spread_roster_has_unique_ids() {
        let roster = spread_roster(50);
        let mut ids: Vec<_> = roster.iter().map(|d| d.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 50);
        assert!(roster.iter().any(|d| !d.is_available));
    }
}

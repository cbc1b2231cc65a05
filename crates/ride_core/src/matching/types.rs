use serde::Serialize;

use crate::driver::Driver;
use crate::geo::{estimate_drive_time_minutes, haversine_distance_km, AverageSpeed, Coordinate};

/// The driver currently closest to the user, with the figures shown next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestDriver {
    pub driver: Driver,
    pub distance_km: f64,
    pub drive_time_minutes: u32,
}

impl NearestDriver {
    pub fn measure(user: Coordinate, driver: &Driver, speed: AverageSpeed) -> Self {
        let position = driver.coordinate();
        Self {
            driver: driver.clone(),
            distance_km: haversine_distance_km(user, position),
            drive_time_minutes: estimate_drive_time_minutes(position, user, speed),
        }
    }
}

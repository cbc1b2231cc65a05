use crate::driver::Driver;
use crate::geo::{haversine_distance_km, Coordinate};

use super::algorithm::DriverSelector;

/// Closest available driver by great-circle distance.
///
/// Full linear scan over the roster on every call. Drivers without a usable
/// position are skipped. On equal distances the driver seen first in roster
/// order wins; rating and price are ignored.
pub fn find_nearest(user: Coordinate, roster: &[Driver]) -> Option<&Driver> {
    let mut best: Option<(&Driver, f64)> = None;

    for driver in roster
        .iter()
        .filter(|driver| driver.is_available && driver.coordinate().is_valid())
    {
        let distance = haversine_distance_km(user, driver.coordinate());
        match best {
            None => best = Some((driver, distance)),
            Some((_, best_distance)) if distance < best_distance => {
                best = Some((driver, distance))
            }
            _ => {}
        }
    }

    best.map(|(driver, _)| driver)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NearestAvailable;

impl DriverSelector for NearestAvailable {
    fn select<'a>(&self, user: Coordinate, roster: &'a [Driver]) -> Option<&'a Driver> {
        find_nearest(user, roster)
    }
}

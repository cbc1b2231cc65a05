//! Fare quotes for a pickup to destination trip.

use serde::Serialize;

use crate::driver::Driver;
use crate::geo::{haversine_distance_km, Coordinate};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FareQuote {
    pub distance_km: f64,
    /// `distance_km * price_per_km`
    pub base_fare: f64,
    pub service_fee: f64,
    pub total: f64,
}

impl FareQuote {
    /// Quote the straight-line trip from `pickup` to `destination` with the
    /// driver's per-km price plus `service_fee` (see `RideConfig::service_fee`).
    pub fn for_driver(
        driver: &Driver,
        pickup: Coordinate,
        destination: Coordinate,
        service_fee: f64,
    ) -> Self {
        calculate_fare(
            haversine_distance_km(pickup, destination),
            driver.price_per_km,
            service_fee,
        )
    }

    /// Total rounded to cents, as shown to the user.
    pub fn display_total(&self) -> String {
        format!("${:.2}", self.total)
    }
}

/// Formula: `total = distance_km * price_per_km + service_fee`
pub fn calculate_fare(distance_km: f64, price_per_km: f64, service_fee: f64) -> FareQuote {
    let base_fare = distance_km * price_per_km;
    FareQuote {
        distance_km,
        base_fare,
        service_fee,
        total: base_fare + service_fee,
    }
}

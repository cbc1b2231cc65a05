//! Ride booking payload handed to the ride-persistence service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::driver::Driver;
use crate::error::BookingError;
use crate::geo::Coordinate;
use crate::location::LocationState;
use crate::pricing::FareQuote;

/// ETA assumed for the completion time when the driver reports none.
pub const FALLBACK_TRIP_MINUTES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RideStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideBooking {
    pub user_id: String,
    pub driver_id: String,
    pub start_location: String,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub destination_location: String,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    pub status: RideStatus,
    pub estimated_arrival_minutes: u32,
    pub price: f64,
}

fn describe(address: Option<&str>, coordinate: Coordinate) -> String {
    match address.map(str::trim).filter(|a| !a.is_empty()) {
        Some(address) => address.to_string(),
        None => format!("{:.6}, {:.6}", coordinate.latitude, coordinate.longitude),
    }
}

impl RideBooking {
    /// Build a pending booking for `driver` from the current location state.
    ///
    /// Unresolved addresses fall back to the formatted coordinate.
    pub fn prepare(
        user_id: &str,
        location: &LocationState,
        driver: &Driver,
        fare: &FareQuote,
    ) -> Result<Self, BookingError> {
        let start = location.user.ok_or(BookingError::MissingField("start_location"))?;
        let destination = location
            .destination
            .ok_or(BookingError::MissingField("destination_location"))?;

        let booking = Self {
            user_id: user_id.to_string(),
            driver_id: driver.id.clone(),
            start_location: describe(location.user_address.as_deref(), start),
            start_latitude: start.latitude,
            start_longitude: start.longitude,
            destination_location: describe(location.destination_address.as_deref(), destination),
            destination_latitude: destination.latitude,
            destination_longitude: destination.longitude,
            status: RideStatus::Pending,
            estimated_arrival_minutes: driver.estimated_arrival_minutes,
            price: fare.total,
        };
        booking.validate()?;
        Ok(booking)
    }

    pub fn validate(&self) -> Result<(), BookingError> {
        let required = [
            ("user_id", &self.user_id),
            ("driver_id", &self.driver_id),
            ("start_location", &self.start_location),
            ("destination_location", &self.destination_location),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(BookingError::MissingField(*field));
        }
        if !Coordinate::new(self.start_latitude, self.start_longitude).is_valid() {
            return Err(BookingError::MissingField("start_latitude"));
        }
        if !Coordinate::new(self.destination_latitude, self.destination_longitude).is_valid() {
            return Err(BookingError::MissingField("destination_latitude"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(BookingError::InvalidPrice(self.price));
        }
        Ok(())
    }

    pub fn with_status(mut self, status: RideStatus) -> Self {
        self.status = status;
        self
    }

    /// When the ride should end if it starts at `requested_at`.
    pub fn estimated_completion(&self, requested_at: DateTime<Utc>) -> DateTime<Utc> {
        let minutes = match self.estimated_arrival_minutes {
            0 => FALLBACK_TRIP_MINUTES,
            minutes => minutes,
        };
        requested_at + Duration::minutes(i64::from(minutes))
    }
}

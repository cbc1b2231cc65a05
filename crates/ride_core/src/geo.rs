//! Geographic primitives: coordinates, map regions, and distance calculations.
//!
//! This module provides:
//!
//! - **Coordinate**: WGS84 latitude/longitude pair in degrees
//! - **Distance calculations**: Haversine great-circle distance in kilometres
//! - **Drive-time estimation**: straight-line distance at an average speed
//! - **Region fitting**: map viewport that keeps user and destination visible
//!
//! Routes are never computed against a road network; every distance here is
//! the great-circle distance between two points.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average city speed used when no override is configured.
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 30.0;

/// Padding applied to the user/destination span when fitting a region.
pub const DEFAULT_PADDING_FACTOR: f64 = 1.5;

/// Smallest viewport span in degrees (the map never zooms past this).
pub const DEFAULT_MIN_DELTA: f64 = 0.01;

/// Fallback region shown before the first fix: downtown San Francisco.
pub const FALLBACK_REGION: Region = Region {
    latitude: 37.7749,
    longitude: -122.4194,
    latitude_delta: DEFAULT_MIN_DELTA,
    longitude_delta: DEFAULT_MIN_DELTA,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("average speed must be positive and finite, got {0} km/h")]
    InvalidSpeed(f64),
}

/// A WGS84 position in degrees. No altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Shift by the given number of degrees on each axis.
    pub fn offset(&self, d_latitude: f64, d_longitude: f64) -> Self {
        Self::new(self.latitude + d_latitude, self.longitude + d_longitude)
    }
}

/// Map viewport: a center plus the span shown on each axis, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Whether `point` falls inside the viewport (edges inclusive).
    pub fn contains(&self, point: Coordinate) -> bool {
        (point.latitude - self.latitude).abs() <= self.latitude_delta / 2.0
            && (point.longitude - self.longitude).abs() <= self.longitude_delta / 2.0
    }
}

/// Average travel speed, guaranteed positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageSpeed(f64);

impl AverageSpeed {
    pub fn new(kmh: f64) -> Result<Self, GeoError> {
        if kmh.is_finite() && kmh > 0.0 {
            Ok(Self(kmh))
        } else {
            Err(GeoError::InvalidSpeed(kmh))
        }
    }

    pub fn kmh(&self) -> f64 {
        self.0
    }
}

impl Default for AverageSpeed {
    fn default() -> Self {
        Self(DEFAULT_AVERAGE_SPEED_KMH)
    }
}

/// Padding and minimum span used by [`fit_region`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionFit {
    pub padding_factor: f64,
    pub min_delta: f64,
}

impl Default for RegionFit {
    fn default() -> Self {
        Self {
            padding_factor: DEFAULT_PADDING_FACTOR,
            min_delta: DEFAULT_MIN_DELTA,
        }
    }
}

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Estimated drive time in whole minutes, rounded to the nearest minute.
pub fn estimate_drive_time_minutes(a: Coordinate, b: Coordinate, speed: AverageSpeed) -> u32 {
    let hours = haversine_distance_km(a, b) / speed.kmh();
    (hours * 60.0).round() as u32
}

/// Compute the viewport for the current user and destination.
///
/// - no user: [`FALLBACK_REGION`]
/// - user only: centered on the user with `min_delta` span
/// - both: centered on the bounding box midpoint, each span padded by
///   `padding_factor` and never smaller than `min_delta`
pub fn fit_region(
    user: Option<Coordinate>,
    destination: Option<Coordinate>,
    fit: RegionFit,
) -> Region {
    let Some(user) = user else {
        return FALLBACK_REGION;
    };

    let Some(destination) = destination else {
        return Region {
            latitude: user.latitude,
            longitude: user.longitude,
            latitude_delta: fit.min_delta,
            longitude_delta: fit.min_delta,
        };
    };

    let min_lat = user.latitude.min(destination.latitude);
    let max_lat = user.latitude.max(destination.latitude);
    let min_lng = user.longitude.min(destination.longitude);
    let max_lng = user.longitude.max(destination.longitude);

    Region {
        latitude: (min_lat + max_lat) / 2.0,
        longitude: (min_lng + max_lng) / 2.0,
        latitude_delta: ((max_lat - min_lat) * fit.padding_factor).max(fit.min_delta),
        longitude_delta: ((max_lng - min_lng) * fit.padding_factor).max(fit.min_delta),
    }
}

//! Driver records and the default mock roster.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Smallest ETA a driver can report, in minutes.
pub const MIN_ESTIMATED_ARRIVAL_MINUTES: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub model: String,
    pub plate_number: String,
    pub color: String,
}

/// Last known position of a driver plus a human-readable address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl DriverLocation {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub vehicle: Vehicle,
    /// 0.0 to 5.0
    pub rating: f64,
    pub is_available: bool,
    pub current_location: DriverLocation,
    /// Never below [`MIN_ESTIMATED_ARRIVAL_MINUTES`].
    pub estimated_arrival_minutes: u32,
    pub price_per_km: f64,
}

impl Driver {
    pub fn coordinate(&self) -> Coordinate {
        self.current_location.coordinate()
    }

    /// Copy with the ETA floor and rating range enforced.
    pub fn normalized(mut self) -> Self {
        self.estimated_arrival_minutes = self
            .estimated_arrival_minutes
            .max(MIN_ESTIMATED_ARRIVAL_MINUTES);
        self.rating = self.rating.clamp(0.0, 5.0);
        self
    }

    /// Apply a partial update. The id is never changed and the ETA floor holds.
    pub fn apply(&mut self, patch: &DriverPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(vehicle) = &patch.vehicle {
            self.vehicle = vehicle.clone();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating.clamp(0.0, 5.0);
        }
        if let Some(is_available) = patch.is_available {
            self.is_available = is_available;
        }
        if let Some(location) = &patch.current_location {
            self.current_location = location.clone();
        }
        if let Some(eta) = patch.estimated_arrival_minutes {
            self.estimated_arrival_minutes = eta.max(MIN_ESTIMATED_ARRIVAL_MINUTES);
        }
        if let Some(price) = patch.price_per_km {
            self.price_per_km = price;
        }
    }
}

/// Partial driver update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverPatch {
    pub name: Option<String>,
    pub vehicle: Option<Vehicle>,
    pub rating: Option<f64>,
    pub is_available: Option<bool>,
    pub current_location: Option<DriverLocation>,
    pub estimated_arrival_minutes: Option<u32>,
    pub price_per_km: Option<f64>,
}

fn mock_driver(
    id: &str,
    name: &str,
    vehicle: (&str, &str, &str),
    rating: f64,
    position: (f64, f64),
    estimated_arrival_minutes: u32,
    price_per_km: f64,
) -> Driver {
    let (model, plate_number, color) = vehicle;
    Driver {
        id: id.to_string(),
        name: name.to_string(),
        vehicle: Vehicle {
            model: model.to_string(),
            plate_number: plate_number.to_string(),
            color: color.to_string(),
        },
        rating,
        is_available: true,
        current_location: DriverLocation {
            latitude: position.0,
            longitude: position.1,
            address: "San Francisco, CA".to_string(),
        },
        estimated_arrival_minutes,
        price_per_km,
    }
}

/// Three drivers around downtown San Francisco, used until a real feed exists.
pub fn mock_drivers() -> Vec<Driver> {
    vec![
        mock_driver(
            "1",
            "John Smith",
            ("Toyota Camry", "ABC-123", "Silver"),
            4.8,
            (37.7749, -122.4194),
            5,
            2.5,
        ),
        mock_driver(
            "2",
            "Sarah Johnson",
            ("Honda Civic", "XYZ-789", "Blue"),
            4.9,
            (37.7849, -122.4094),
            8,
            2.2,
        ),
        mock_driver(
            "3",
            "Mike Davis",
            ("Tesla Model 3", "TES-456", "White"),
            4.7,
            (37.7649, -122.4294),
            12,
            3.0,
        ),
    ]
}

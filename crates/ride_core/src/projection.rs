//! Map markers derived from location and roster state.

use serde::Serialize;

use crate::driver::Driver;
use crate::geo::Coordinate;
use crate::location::LocationState;

pub const USER_MARKER_ID: &str = "user";
pub const DESTINATION_MARKER_ID: &str = "destination";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerCategory {
    User,
    Destination,
    Driver,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub coordinate: Coordinate,
    pub title: String,
    pub description: String,
    pub category: MarkerCategory,
    /// Set for driver markers only.
    pub driver_id: Option<String>,
}

impl Marker {
    fn for_driver(driver: &Driver) -> Self {
        Self {
            id: format!("driver-{}", driver.id),
            coordinate: driver.coordinate(),
            title: format!("{} - {}", driver.name, driver.vehicle.model),
            description: format!(
                "{} {} \u{2022} {}\u{2605} \u{2022} {}min away",
                driver.vehicle.color,
                driver.vehicle.plate_number,
                driver.rating,
                driver.estimated_arrival_minutes
            ),
            category: MarkerCategory::Driver,
            driver_id: Some(driver.id.clone()),
        }
    }
}

/// Build the marker list: user first, then destination, then every available
/// driver with a usable position in roster order.
pub fn build_markers(location: &LocationState, roster: &[Driver]) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(roster.len() + 2);

    if let Some(user) = location.user {
        markers.push(Marker {
            id: USER_MARKER_ID.to_string(),
            coordinate: user,
            title: "Your Location".to_string(),
            description: location
                .user_address
                .clone()
                .unwrap_or_else(|| "Current location".to_string()),
            category: MarkerCategory::User,
            driver_id: None,
        });
    }

    if let Some(destination) = location.destination {
        markers.push(Marker {
            id: DESTINATION_MARKER_ID.to_string(),
            coordinate: destination,
            title: "Destination".to_string(),
            description: location
                .destination_address
                .clone()
                .unwrap_or_else(|| "Destination".to_string()),
            category: MarkerCategory::Destination,
            driver_id: None,
        });
    }

    markers.extend(
        roster
            .iter()
            .filter(|driver| driver.is_available && driver.coordinate().is_valid())
            .map(Marker::for_driver),
    );

    markers
}

#![allow(dead_code)]

pub mod fakes;

use std::sync::Arc;
use std::time::Duration;

use ride_core::geo::Coordinate;
use ride_core::live_map::LiveMap;
use ride_core::location::{
    LocationController, LocationStore, SimulatedLocationProvider, WatchThresholds,
};
use ride_core::roster::DriverStore;

use fakes::AddressBook;

/// Let spawned tasks drain their queues. Needs a paused clock.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Stores and collaborators wired the way a screen would wire them.
pub struct Harness {
    pub location: LocationStore,
    pub drivers: DriverStore,
    pub provider: Arc<SimulatedLocationProvider>,
    pub geocoder: Arc<AddressBook>,
    pub controller: LocationController,
    pub map: LiveMap,
}

impl Harness {
    pub fn new(first_fix: Coordinate) -> Self {
        let location = LocationStore::new();
        let drivers = DriverStore::with_mock_drivers();
        let provider = Arc::new(SimulatedLocationProvider::granted(first_fix));
        let geocoder = Arc::new(AddressBook::default());
        let controller = LocationController::new(
            provider.clone(),
            geocoder.clone(),
            location.clone(),
            WatchThresholds::default(),
        );
        let map = LiveMap::new(location.clone(), drivers.clone());
        Self {
            location,
            drivers,
            provider,
            geocoder,
            controller,
            map,
        }
    }
}

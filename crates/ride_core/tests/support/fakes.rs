use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use ride_core::geo::Coordinate;
use ride_core::geocoding::{GeocodeError, PlaceCandidate, PlaceSearch, ReverseGeocoder};

/// Reverse geocoder that names every coordinate after its rounded position.
#[derive(Debug, Default)]
pub struct AddressBook {
    lookups: AtomicUsize,
    offline: Mutex<bool>,
}

impl AddressBook {
    pub fn address_for(coordinate: Coordinate) -> String {
        format!("{:.4}, {:.4}", coordinate.latitude, coordinate.longitude)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().expect("lock") = offline;
    }
}

#[async_trait]
impl ReverseGeocoder for AddressBook {
    async fn resolve(&self, coordinate: Coordinate) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if *self.offline.lock().expect("lock") {
            return None;
        }
        Some(Self::address_for(coordinate))
    }
}

/// Place search over a fixed list, matching on a case-insensitive prefix.
#[derive(Debug)]
pub struct Gazetteer {
    places: Vec<PlaceCandidate>,
    calls: AtomicUsize,
}

impl Gazetteer {
    pub fn new(places: Vec<PlaceCandidate>) -> Self {
        Self {
            places,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlaceSearch for Gazetteer {
    async fn search(&self, text: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let needle = text.to_lowercase();
        let found: Vec<_> = self
            .places
            .iter()
            .filter(|place| place.name.to_lowercase().starts_with(&needle))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(GeocodeError::NoResults(text.to_string()));
        }
        Ok(found)
    }
}

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::geocoding::PlaceCandidate;
use crate::store::Store;

/// User and destination positions with their resolved addresses.
///
/// Everything starts out unset. The user half is written on each successful
/// fix, the destination half when the user picks a place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationState {
    pub user: Option<Coordinate>,
    pub user_address: Option<String>,
    pub destination: Option<Coordinate>,
    pub destination_address: Option<String>,
}

impl LocationState {
    pub fn has_user(&self) -> bool {
        self.user.is_some()
    }
}

/// Shared handle over the [`LocationState`].
#[derive(Debug, Clone, Default)]
pub struct LocationStore {
    state: Store<LocationState>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_user_location(&self, coordinate: Coordinate, address: Option<String>) {
        self.state.update(|state| {
            state.user = Some(coordinate);
            state.user_address = address;
        });
    }

    pub fn set_destination_location(&self, coordinate: Coordinate, address: Option<String>) {
        self.state.update(|state| {
            state.destination = Some(coordinate);
            state.destination_address = address;
        });
    }

    /// Use a search result as the destination.
    pub fn choose_destination(&self, candidate: &PlaceCandidate) {
        let address = candidate
            .address
            .clone()
            .or_else(|| Some(candidate.name.clone()))
            .filter(|a| !a.trim().is_empty());
        self.set_destination_location(candidate.coordinate, address);
    }

    /// The user position is no longer known (tracking lost or revoked).
    pub fn clear_user_location(&self) {
        self.state.update_if(|state| {
            let changed = state.user.is_some() || state.user_address.is_some();
            state.user = None;
            state.user_address = None;
            changed
        });
    }

    pub fn clear_destination(&self) {
        self.state.update_if(|state| {
            let changed = state.destination.is_some() || state.destination_address.is_some();
            state.destination = None;
            state.destination_address = None;
            changed
        });
    }

    /// Reset everything, e.g. on sign-out.
    pub fn clear(&self) {
        self.state.replace(LocationState::default());
    }

    pub fn snapshot(&self) -> LocationState {
        self.state.get()
    }

    pub fn user(&self) -> Option<Coordinate> {
        self.state.read(|state| state.user)
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<LocationState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = LocationStore::new();
        assert_eq!(store.snapshot(), LocationState::default());
        assert!(store.user().is_none());
    }

    #[test]
    fn user_and_destination_are_written_independently() {
        let store = LocationStore::new();
        store.set_user_location(Coordinate::new(37.7749, -122.4194), Some("Market St".into()));
        store.set_destination_location(Coordinate::new(37.7849, -122.4094), None);

        let state = store.snapshot();
        assert_eq!(state.user_address.as_deref(), Some("Market St"));
        assert_eq!(state.destination, Some(Coordinate::new(37.7849, -122.4094)));
        assert!(state.destination_address.is_none());

        store.clear_user_location();
        let state = store.snapshot();
        assert!(!state.has_user());
        assert!(state.destination.is_some());
    }

    #[test]
    fn choose_destination_prefers_address_then_name() {
        let store = LocationStore::new();
        let candidate = PlaceCandidate {
            name: "Ferry Building".into(),
            address: None,
            coordinate: Coordinate::new(37.7955, -122.3937),
        };
        store.choose_destination(&candidate);
        assert_eq!(
            store.snapshot().destination_address.as_deref(),
            Some("Ferry Building")
        );
    }

    #[test]
    fn clearing_an_empty_user_does_not_notify() {
        let store = LocationStore::new();
        let rx = store.subscribe();
        store.clear_user_location();
        assert!(!rx.has_changed().expect("sender alive"));
    }
}

//! Driver roster: the shared store and the movement simulator.

pub mod simulator;

use serde::Serialize;
use tokio::sync::watch;

use crate::driver::{mock_drivers, Driver, DriverLocation, DriverPatch};
use crate::error::RosterError;
use crate::store::Store;

pub use simulator::{advance_tick, RosterJitter, RosterSimulator, JITTER_MAX_DEGREES};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RosterState {
    /// Unique ids; order is the tie-break order for selection.
    pub drivers: Vec<Driver>,
    /// Driver picked by the user, kept in sync with roster updates.
    pub selected: Option<Driver>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl RosterState {
    pub fn driver(&self, id: &str) -> Option<&Driver> {
        self.drivers.iter().find(|driver| driver.id == id)
    }

    fn sync_selected(&mut self) {
        if let Some(selected) = &self.selected {
            self.selected = self.drivers.iter().find(|d| d.id == selected.id).cloned();
        }
    }
}

fn ensure_unique(drivers: &[Driver]) -> Result<(), RosterError> {
    for (index, driver) in drivers.iter().enumerate() {
        if drivers[..index].iter().any(|other| other.id == driver.id) {
            return Err(RosterError::DuplicateId(driver.id.clone()));
        }
    }
    Ok(())
}

/// Every driver entering the store goes through [`Driver::normalized`].
fn normalize(drivers: Vec<Driver>) -> Vec<Driver> {
    drivers.into_iter().map(Driver::normalized).collect()
}

/// Shared handle over the [`RosterState`].
#[derive(Debug, Clone, Default)]
pub struct DriverStore {
    state: Store<RosterState>,
}

impl DriverStore {
    pub fn new(drivers: Vec<Driver>) -> Result<Self, RosterError> {
        ensure_unique(&drivers)?;
        let drivers = normalize(drivers);
        Ok(Self {
            state: Store::new(RosterState {
                drivers,
                ..Default::default()
            }),
        })
    }

    /// Store seeded with [`mock_drivers`].
    pub fn with_mock_drivers() -> Self {
        Self {
            state: Store::new(RosterState {
                drivers: mock_drivers(),
                ..Default::default()
            }),
        }
    }

    pub fn snapshot(&self) -> RosterState {
        self.state.get()
    }

    pub fn drivers(&self) -> Vec<Driver> {
        self.state.read(|state| state.drivers.clone())
    }

    pub fn read<R>(&self, f: impl FnOnce(&RosterState) -> R) -> R {
        self.state.read(f)
    }

    pub fn subscribe(&self) -> watch::Receiver<RosterState> {
        self.state.subscribe()
    }

    /// Replace the whole roster.
    pub fn set_drivers(&self, drivers: Vec<Driver>) -> Result<(), RosterError> {
        ensure_unique(&drivers)?;
        let drivers = normalize(drivers);
        self.state.update(|state| {
            state.drivers = drivers;
            state.sync_selected();
        });
        Ok(())
    }

    /// Rewrite every driver at once; `f` must keep ids unchanged.
    pub(crate) fn map_drivers(&self, f: impl FnOnce(&[Driver]) -> Vec<Driver>) {
        self.state.update(|state| {
            state.drivers = normalize(f(&state.drivers));
            state.sync_selected();
        });
    }

    pub fn add_driver(&self, driver: Driver) -> Result<(), RosterError> {
        let mut result = Ok(());
        self.state.update_if(|state| {
            if state.driver(&driver.id).is_some() {
                result = Err(RosterError::DuplicateId(driver.id.clone()));
                return false;
            }
            state.drivers.push(driver.normalized());
            true
        });
        result
    }

    fn modify(&self, id: &str, f: impl FnOnce(&mut Driver)) -> Result<(), RosterError> {
        let found = self.state.update_if(|state| {
            let Some(driver) = state.drivers.iter_mut().find(|d| d.id == id) else {
                return false;
            };
            f(driver);
            state.sync_selected();
            true
        });
        if found {
            Ok(())
        } else {
            Err(RosterError::NotFound(id.to_string()))
        }
    }

    pub fn update_driver(&self, id: &str, patch: &DriverPatch) -> Result<(), RosterError> {
        self.modify(id, |driver| driver.apply(patch))
    }

    pub fn update_driver_location(
        &self,
        id: &str,
        location: DriverLocation,
    ) -> Result<(), RosterError> {
        self.modify(id, |driver| driver.current_location = location)
    }

    pub fn update_driver_availability(&self, id: &str, is_available: bool) -> Result<(), RosterError> {
        self.modify(id, |driver| driver.is_available = is_available)
    }

    pub fn remove_driver(&self, id: &str) -> Result<Driver, RosterError> {
        let mut removed = None;
        self.state.update_if(|state| {
            let Some(index) = state.drivers.iter().position(|d| d.id == id) else {
                return false;
            };
            removed = Some(state.drivers.remove(index));
            state.sync_selected();
            true
        });
        removed.ok_or_else(|| RosterError::NotFound(id.to_string()))
    }

    /// Select by id, or clear the selection with `None`.
    pub fn select_driver(&self, id: Option<&str>) -> Result<(), RosterError> {
        let Some(id) = id else {
            self.state.update(|state| state.selected = None);
            return Ok(());
        };
        let found = self.state.update_if(|state| match state.driver(id).cloned() {
            Some(driver) => {
                state.selected = Some(driver);
                true
            }
            None => false,
        });
        if found {
            Ok(())
        } else {
            Err(RosterError::NotFound(id.to_string()))
        }
    }

    pub fn selected(&self) -> Option<Driver> {
        self.state.read(|state| state.selected.clone())
    }

    pub fn set_loading(&self, is_loading: bool) {
        self.state.update(|state| state.is_loading = is_loading);
    }

    pub fn set_error(&self, error: impl Into<String>) {
        let error = error.into();
        self.state.update(|state| state.error = Some(error));
    }

    pub fn clear_error(&self) {
        self.state.update(|state| state.error = None);
    }
}

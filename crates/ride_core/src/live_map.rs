//! Live map engine.
//!
//! Joins the location and roster stores into one derived [`MapSnapshot`]:
//! viewport region, markers and the nearest available driver. The snapshot is
//! always rebuilt from the latest state of both stores and published as a
//! single replacement, so a roster tick racing a location update converges on
//! the next recomputation.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::RideConfig;
use crate::driver::Driver;
use crate::error::ConfigurationError;
use crate::geo::{fit_region, AverageSpeed, Region, RegionFit, FALLBACK_REGION};
use crate::location::{LocationState, LocationStore};
use crate::matching::{DriverSelector, NearestAvailable, NearestDriver};
use crate::projection::{build_markers, Marker};
use crate::roster::DriverStore;
use crate::store::Store;
use crate::task::TaskHandle;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub region: Region,
    pub markers: Vec<Marker>,
    pub nearest: Option<NearestDriver>,
    /// Blocking message for the map view only; the other fields stay live.
    pub map_error: Option<String>,
}

impl Default for MapSnapshot {
    fn default() -> Self {
        Self {
            region: FALLBACK_REGION,
            markers: Vec::new(),
            nearest: None,
            map_error: None,
        }
    }
}

#[derive(Clone)]
pub struct LiveMap {
    location: LocationStore,
    drivers: DriverStore,
    snapshot: Store<MapSnapshot>,
    selector: Arc<dyn DriverSelector>,
    speed: AverageSpeed,
    fit: RegionFit,
    map_error: Option<ConfigurationError>,
}

impl fmt::Debug for LiveMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveMap")
            .field("snapshot", &self.snapshot)
            .field("speed", &self.speed)
            .field("fit", &self.fit)
            .field("map_error", &self.map_error)
            .finish_non_exhaustive()
    }
}

impl LiveMap {
    pub fn new(location: LocationStore, drivers: DriverStore) -> Self {
        Self {
            location,
            drivers,
            snapshot: Store::default(),
            selector: Arc::new(NearestAvailable),
            speed: AverageSpeed::default(),
            fit: RegionFit::default(),
            map_error: None,
        }
    }

    /// Configured engine. A missing map key does not fail: it is carried as
    /// the snapshot's `map_error` while everything else keeps updating.
    pub fn from_config(
        location: LocationStore,
        drivers: DriverStore,
        config: &RideConfig,
    ) -> Result<Self, ConfigurationError> {
        let mut map = Self::new(location, drivers).with_speed(config.average_speed()?);
        if let Err(error) = config.require_maps_key() {
            map_error!("(from_config) {}", error);
            map.map_error = Some(error);
        }
        Ok(map)
    }

    pub fn with_speed(mut self, speed: AverageSpeed) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_fit(mut self, fit: RegionFit) -> Self {
        self.fit = fit;
        self
    }

    pub fn with_selector(mut self, selector: Arc<dyn DriverSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Observable snapshot for the presentation layer.
    pub fn snapshot(&self) -> Store<MapSnapshot> {
        self.snapshot.clone()
    }

    pub fn current(&self) -> MapSnapshot {
        self.snapshot.get()
    }

    pub fn location(&self) -> &LocationStore {
        &self.location
    }

    pub fn drivers(&self) -> &DriverStore {
        &self.drivers
    }

    fn project(&self, location: &LocationState, roster: &[Driver]) -> MapSnapshot {
        let nearest = location.user.and_then(|user| {
            self.selector
                .select(user, roster)
                .map(|driver| NearestDriver::measure(user, driver, self.speed))
        });

        MapSnapshot {
            region: fit_region(location.user, location.destination, self.fit),
            markers: build_markers(location, roster),
            nearest,
            map_error: self.map_error.as_ref().map(ToString::to_string),
        }
    }

    /// Derive a fresh snapshot from the latest state and publish it.
    pub fn recompute(&self) -> MapSnapshot {
        let location = self.location.snapshot();
        let next = self
            .drivers
            .read(|roster| self.project(&location, &roster.drivers));
        map_debug!(
            "(recompute) {} markers, nearest {:?}",
            next.markers.len(),
            next.nearest.as_ref().map(|n| n.driver.id.as_str())
        );
        self.snapshot.replace(next.clone());
        next
    }

    /// Recompute now and after every change of either store.
    pub fn spawn_projector(&self) -> TaskHandle {
        let map = self.clone();
        TaskHandle::spawn(move |token| map.project_changes(token))
    }

    async fn project_changes(self, token: CancellationToken) {
        let mut location = self.location.subscribe();
        let mut roster = self.drivers.subscribe();

        loop {
            // Mark both as seen first so writes made during recompute trigger another pass.
            drop(location.borrow_and_update());
            drop(roster.borrow_and_update());
            self.recompute();

            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                changed = location.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = roster.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        map_debug!("(project_changes) projector stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock_drivers;
    use crate::geo::Coordinate;
    use crate::matching::find_nearest;
    use crate::projection::MarkerCategory;
    use crate::test_helpers::TEST_DESTINATION;
    use std::time::Duration;

    fn engine() -> LiveMap {
        LiveMap::new(LocationStore::new(), DriverStore::with_mock_drivers())
    }

    #[test]
    fn without_user_shows_fallback_and_no_nearest() {
        let map = engine();
        let snapshot = map.recompute();
        assert_eq!(snapshot.region, FALLBACK_REGION);
        assert!(snapshot.nearest.is_none());
        assert_eq!(snapshot.markers.len(), 3);
        assert!(snapshot
            .markers
            .iter()
            .all(|m| m.category == MarkerCategory::Driver));
    }

    #[test]
    fn nearest_matches_selector_and_region_tracks_destination() {
        let map = engine();
        let user = Coordinate::new(37.7800, -122.4150);
        map.location().set_user_location(user, None);
        let snapshot = map.recompute();

        let roster = mock_drivers();
        let expected = find_nearest(user, &roster).map(|d| d.id.clone());
        assert_eq!(
            snapshot.nearest.as_ref().map(|n| n.driver.id.clone()),
            expected
        );
        assert_eq!(snapshot.region.latitude_delta, 0.01);

        map.location()
            .set_destination_location(TEST_DESTINATION, Some("Ferry Building".into()));
        let snapshot = map.recompute();
        assert!(snapshot.region.contains(user));
        assert!(snapshot.region.contains(TEST_DESTINATION));
        assert_eq!(snapshot.markers[1].category, MarkerCategory::Destination);
    }

    #[test]
    fn missing_map_key_only_blocks_the_map() {
        let map = LiveMap::from_config(
            LocationStore::new(),
            DriverStore::with_mock_drivers(),
            &RideConfig::default(),
        )
        .expect("valid speed");
        map.location()
            .set_user_location(Coordinate::new(37.7749, -122.4194), None);
        let snapshot = map.recompute();
        assert!(snapshot
            .map_error
            .as_deref()
            .is_some_and(|e| e.contains("GOOGLE_MAPS_API_KEY")));
        assert_eq!(snapshot.nearest.map(|n| n.driver.id), Some("1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn projector_follows_both_stores() {
        let map = engine();
        let snapshots = map.snapshot();
        let mut handle = map.spawn_projector();

        map.location()
            .set_user_location(Coordinate::new(37.7849, -122.4094), None);
        tokio::time::sleep(Duration::from_millis(1)).await;
        let nearest = snapshots.read(|s| s.nearest.as_ref().map(|n| n.driver.id.clone()));
        assert_eq!(nearest.as_deref(), Some("2"));

        map.drivers()
            .update_driver_availability("2", false)
            .expect("driver 2");
        tokio::time::sleep(Duration::from_millis(1)).await;
        let nearest = snapshots.read(|s| s.nearest.as_ref().map(|n| n.driver.id.clone()));
        assert_eq!(nearest.as_deref(), Some("1"));
        assert_eq!(snapshots.read(|s| s.markers.len()), 3);

        assert!(handle.cancel());
        map.drivers()
            .update_driver_availability("2", true)
            .expect("driver 2");
        tokio::time::sleep(Duration::from_millis(1)).await;
        let nearest = snapshots.read(|s| s.nearest.as_ref().map(|n| n.driver.id.clone()));
        assert_eq!(nearest.as_deref(), Some("1"));
    }
}

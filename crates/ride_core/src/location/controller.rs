//! Location tracking: permission, one-shot fix, and the recurring subscription.
//!
//! State machine:
//!
//! ```text
//! Unrequested -> PermissionRequested -> PermissionDenied
//!                                    -> PermissionGranted -> Tracking (self-loop per fix) -> Stopped
//! ```
//!
//! `retry` re-enters `PermissionRequested` from `PermissionDenied`. Every fix
//! runs the same pipeline: reverse-resolve the address, then write the
//! [`LocationStore`]. A failed fix or lookup is reported through the
//! [`TrackingStatus`] notice and never ends the subscription.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::error::LocationError;
use super::provider::{LocationProvider, PermissionStatus, PositionStream, WatchThresholds};
use super::state::LocationStore;
use crate::geo::Coordinate;
use crate::geocoding::ReverseGeocoder;
use crate::store::Store;
use crate::task::TaskHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TrackingState {
    #[default]
    Unrequested,
    PermissionRequested,
    PermissionDenied,
    PermissionGranted,
    Tracking,
    Stopped,
}

/// User-facing, non-blocking notice raised by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LocationNotice {
    /// Permission was refused; the user must enable it in settings.
    PermissionRequired,
    /// A position fix failed; the user can retry.
    LocationUnavailable(String),
    /// The recurring subscription could not be started.
    TrackingUnavailable(String),
}

impl LocationNotice {
    pub fn message(&self) -> String {
        match self {
            LocationNotice::PermissionRequired => "This app needs location access to show your \
                position on the map and find nearby drivers. Please enable location permissions \
                in your device settings."
                .to_string(),
            LocationNotice::LocationUnavailable(_) => "Unable to get your current location. \
                Please check your GPS settings and try again."
                .to_string(),
            LocationNotice::TrackingUnavailable(_) => {
                "Live location updates are unavailable right now.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackingStatus {
    pub state: TrackingState,
    pub notice: Option<LocationNotice>,
}

/// Resolve and write pipeline shared by the one-shot fix and the subscription.
#[derive(Clone)]
struct FixPipeline {
    geocoder: Arc<dyn ReverseGeocoder>,
    location: LocationStore,
    status: Store<TrackingStatus>,
}

impl FixPipeline {
    /// Resolve the address and write the fix unless `token` was cancelled meanwhile.
    async fn apply(&self, coordinate: Coordinate, token: Option<&CancellationToken>) -> bool {
        let address = self.geocoder.resolve(coordinate).await;
        if token.is_some_and(CancellationToken::is_cancelled) {
            return false;
        }
        self.location.set_user_location(coordinate, address.clone());
        location_debug!(
            "(apply) location updated: {:.6},{:.6} [{}]",
            coordinate.latitude,
            coordinate.longitude,
            address.as_deref().unwrap_or("no address")
        );
        true
    }

    fn notice(&self, notice: LocationNotice) {
        self.status.update(|status| status.notice = Some(notice));
    }

    async fn run_subscription(self, mut stream: PositionStream, token: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                update = stream.recv() => match update {
                    Some(Ok(coordinate)) => {
                        self.apply(coordinate, Some(&token)).await;
                    }
                    Some(Err(error)) => {
                        location_error!("(run_subscription) error updating location: {}", error);
                        if !token.is_cancelled() {
                            self.notice(LocationNotice::LocationUnavailable(error.to_string()));
                        }
                    }
                    None => {
                        location_warn!("(run_subscription) provider closed the position stream");
                        break;
                    }
                },
            }
        }
        // Dropping the stream here releases the provider side.
        drop(stream);
        location_debug!("(run_subscription) subscription released");
    }
}

pub struct LocationController {
    provider: Arc<dyn LocationProvider>,
    pipeline: FixPipeline,
    thresholds: WatchThresholds,
    subscription: Mutex<Option<TaskHandle>>,
    /// Cancelled by `stop`; a fix in flight under it is dropped.
    session: Mutex<CancellationToken>,
}

impl LocationController {
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        geocoder: Arc<dyn ReverseGeocoder>,
        location: LocationStore,
        thresholds: WatchThresholds,
    ) -> Self {
        Self {
            provider,
            pipeline: FixPipeline {
                geocoder,
                location,
                status: Store::default(),
            },
            thresholds,
            subscription: Mutex::new(None),
            session: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn status(&self) -> Store<TrackingStatus> {
        self.pipeline.status.clone()
    }

    pub fn state(&self) -> TrackingState {
        self.pipeline.status.read(|status| status.state)
    }

    fn set_state(&self, state: TrackingState) {
        self.pipeline.status.update(|status| status.state = state);
    }

    fn subscription(&self) -> MutexGuard<'_, Option<TaskHandle>> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn session(&self) -> CancellationToken {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn renew_session(&self) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = CancellationToken::new();
    }

    /// Mount: request permission, take one fix, and start the subscription.
    ///
    /// Only acts from `Unrequested` or `Stopped`; otherwise returns the current state.
    pub async fn start(&self) -> TrackingState {
        match self.state() {
            TrackingState::Unrequested | TrackingState::Stopped => self.acquire().await,
            state => state,
        }
    }

    /// Manual re-trigger after a denial.
    pub async fn retry(&self) -> TrackingState {
        match self.state() {
            TrackingState::PermissionDenied => self.acquire().await,
            state => state,
        }
    }

    async fn acquire(&self) -> TrackingState {
        self.renew_session();
        self.pipeline.status.update(|status| {
            status.state = TrackingState::PermissionRequested;
            status.notice = None;
        });

        let permission = self.provider.request_permission().await;
        if self.state() == TrackingState::Stopped {
            return TrackingState::Stopped;
        }
        match permission {
            Ok(PermissionStatus::Granted) => {}
            Ok(PermissionStatus::Denied) => {
                location_warn!("(acquire) foreground location permission denied");
                return self.deny();
            }
            Err(error) => {
                location_error!("(acquire) error in location setup: {}", error);
                return self.deny();
            }
        }

        self.set_state(TrackingState::PermissionGranted);
        location_info!("(acquire) location permission granted");

        self.refresh().await;
        self.subscribe().await
    }

    fn deny(&self) -> TrackingState {
        self.pipeline.status.update(|status| {
            status.state = TrackingState::PermissionDenied;
            status.notice = Some(LocationNotice::PermissionRequired);
        });
        TrackingState::PermissionDenied
    }

    /// One immediate fix + resolve + write. Failures become a notice.
    pub async fn refresh(&self) -> bool {
        let session = self.session();
        match self.provider.current_fix().await {
            Ok(coordinate) => {
                if session.is_cancelled() {
                    return false;
                }
                self.pipeline.apply(coordinate, Some(&session)).await
            }
            Err(error) => {
                location_error!("(refresh) error getting current location: {}", error);
                self.pipeline
                    .notice(LocationNotice::LocationUnavailable(error.to_string()));
                false
            }
        }
    }

    async fn subscribe(&self) -> TrackingState {
        let stream = match self.provider.watch_position(self.thresholds).await {
            Ok(stream) => stream,
            Err(error) => {
                location_error!("(subscribe) error starting location watching: {}", error);
                self.pipeline
                    .notice(LocationNotice::TrackingUnavailable(error.to_string()));
                return self.state();
            }
        };

        let mut slot = self.subscription();
        // stop() may have run while the provider was answering.
        if self.state() == TrackingState::Stopped {
            return TrackingState::Stopped;
        }
        if let Some(mut previous) = slot.take() {
            previous.cancel();
        }
        let pipeline = self.pipeline.clone();
        *slot = Some(TaskHandle::spawn(move |token| {
            pipeline.run_subscription(stream, token)
        }));
        drop(slot);

        self.set_state(TrackingState::Tracking);
        location_info!("(subscribe) location watching started");
        TrackingState::Tracking
    }

    /// Unmount: release the subscription. Safe to call any number of times.
    ///
    /// Returns `true` only when this call released an active subscription.
    pub fn stop(&self) -> bool {
        self.session().cancel();
        let released = match self.subscription().take() {
            Some(mut handle) => handle.cancel(),
            None => false,
        };
        self.pipeline.status.update_if(|status| {
            if status.state == TrackingState::Stopped {
                return false;
            }
            status.state = TrackingState::Stopped;
            true
        });
        if released {
            location_info!("(stop) location watching stopped");
        }
        released
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription()
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
    }
}

impl Drop for LocationController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::NoGeocoder;
    use crate::location::SimulatedLocationProvider;
    use async_trait::async_trait;
    use std::time::Duration;

    struct SlowGeocoder;

    #[async_trait]
    impl ReverseGeocoder for SlowGeocoder {
        async fn resolve(&self, _coordinate: Coordinate) -> Option<String> {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Some("Late St".into())
        }
    }

    fn controller(provider: Arc<SimulatedLocationProvider>) -> (LocationController, LocationStore) {
        let store = LocationStore::new();
        let controller = LocationController::new(
            provider,
            Arc::new(NoGeocoder),
            store.clone(),
            WatchThresholds::default(),
        );
        (controller, store)
    }

    #[tokio::test]
    async fn denied_permission_leaves_location_empty() {
        let provider = Arc::new(SimulatedLocationProvider::denied());
        let (controller, store) = controller(Arc::clone(&provider));

        assert_eq!(controller.start().await, TrackingState::PermissionDenied);
        let status = controller.status().get();
        assert_eq!(status.notice, Some(LocationNotice::PermissionRequired));
        assert!(store.snapshot().user.is_none());
        assert!(store.snapshot().user_address.is_none());
        assert_eq!(provider.subscriptions(), 0);

        // no automatic retries
        assert_eq!(controller.start().await, TrackingState::PermissionDenied);
        assert_eq!(provider.permission_requests(), 1);
    }

    #[tokio::test]
    async fn retry_after_denial_can_grant() {
        let provider = Arc::new(SimulatedLocationProvider::denied());
        provider.set_fix(Ok(Coordinate::new(37.0, -122.0)));
        let (controller, store) = controller(Arc::clone(&provider));

        controller.start().await;
        provider.set_permission(PermissionStatus::Granted);
        assert_eq!(controller.retry().await, TrackingState::Tracking);
        assert_eq!(store.user(), Some(Coordinate::new(37.0, -122.0)));
        assert_eq!(controller.status().get().notice, None);
        controller.stop();
    }

    #[tokio::test]
    async fn failed_first_fix_still_subscribes() {
        let provider = Arc::new(SimulatedLocationProvider::new(
            PermissionStatus::Granted,
            Err(LocationError::Fix("no satellites".into())),
        ));
        let (controller, store) = controller(Arc::clone(&provider));

        assert_eq!(controller.start().await, TrackingState::Tracking);
        assert!(store.user().is_none());
        assert!(matches!(
            controller.status().get().notice,
            Some(LocationNotice::LocationUnavailable(_))
        ));
        assert!(!provider.is_released());
        assert!(controller.stop());
        assert!(!controller.is_subscribed());
        for _ in 0..10 {
            if provider.is_released() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(provider.is_released());
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let provider = Arc::new(SimulatedLocationProvider::granted(Coordinate::new(1.0, 1.0)));
        let (controller, _store) = controller(provider);
        controller.start().await;
        assert!(controller.stop());
        assert!(!controller.stop());
        assert_eq!(controller.state(), TrackingState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_during_slow_lookup_discards_the_fix() {
        let provider = Arc::new(SimulatedLocationProvider::granted(Coordinate::new(1.0, 1.0)));
        let store = LocationStore::new();
        let controller = Arc::new(LocationController::new(
            provider,
            Arc::new(SlowGeocoder),
            store.clone(),
            WatchThresholds::default(),
        ));

        let mounted = Arc::clone(&controller);
        let start = tokio::spawn(async move { mounted.start().await });
        tokio::time::sleep(Duration::from_millis(500)).await;
        controller.stop();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(start.await.expect("start task"), TrackingState::Stopped);
        assert!(store.user().is_none());
        assert!(store.snapshot().user_address.is_none());
        assert_eq!(controller.state(), TrackingState::Stopped);
        assert!(!controller.is_subscribed());

        // a fresh mount writes again
        tokio::spawn({
            let controller = Arc::clone(&controller);
            async move { controller.start().await }
        });
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(store.user(), Some(Coordinate::new(1.0, 1.0)));
        assert_eq!(store.snapshot().user_address.as_deref(), Some("Late St"));
        controller.stop();
    }
}

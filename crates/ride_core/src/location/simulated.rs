use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::LocationError;
use super::provider::{LocationProvider, PermissionStatus, PositionStream, WatchThresholds};
use crate::geo::Coordinate;

/// Buffered updates per subscription before `push_*` starts dropping.
const STREAM_CAPACITY: usize = 16;

type Update = Result<Coordinate, LocationError>;

/// In-process location provider for demos and tests.
///
/// Fixes are pushed explicitly with [`push_fix`](Self::push_fix); the watch
/// thresholds are recorded but not enforced.
#[derive(Debug)]
pub struct SimulatedLocationProvider {
    permission: Mutex<PermissionStatus>,
    fix: Mutex<Update>,
    watcher: Mutex<Option<mpsc::Sender<Update>>>,
    last_thresholds: Mutex<Option<WatchThresholds>>,
    permission_requests: AtomicUsize,
    subscriptions: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimulatedLocationProvider {
    pub fn new(permission: PermissionStatus, fix: Update) -> Self {
        Self {
            permission: Mutex::new(permission),
            fix: Mutex::new(fix),
            watcher: Mutex::new(None),
            last_thresholds: Mutex::new(None),
            permission_requests: AtomicUsize::new(0),
            subscriptions: AtomicUsize::new(0),
        }
    }

    /// Grants permission and answers one-shot fixes with `fix`.
    pub fn granted(fix: Coordinate) -> Self {
        Self::new(PermissionStatus::Granted, Ok(fix))
    }

    pub fn denied() -> Self {
        Self::new(
            PermissionStatus::Denied,
            Err(LocationError::PermissionDenied),
        )
    }

    pub fn set_permission(&self, status: PermissionStatus) {
        *lock(&self.permission) = status;
    }

    pub fn set_fix(&self, fix: Update) {
        *lock(&self.fix) = fix;
    }

    /// Deliver a position to the active subscription. False when nobody listens.
    pub fn push_fix(&self, coordinate: Coordinate) -> bool {
        self.push(Ok(coordinate))
    }

    pub fn push_error(&self, error: LocationError) -> bool {
        self.push(Err(error))
    }

    fn push(&self, update: Update) -> bool {
        match lock(&self.watcher).as_ref() {
            Some(tx) => tx.try_send(update).is_ok(),
            None => false,
        }
    }

    /// True when no subscription is open (never started, or the receiver was dropped).
    pub fn is_released(&self) -> bool {
        lock(&self.watcher).as_ref().map_or(true, mpsc::Sender::is_closed)
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    pub fn last_thresholds(&self) -> Option<WatchThresholds> {
        *lock(&self.last_thresholds)
    }
}

#[async_trait]
impl LocationProvider for SimulatedLocationProvider {
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(*lock(&self.permission))
    }

    async fn current_fix(&self) -> Result<Coordinate, LocationError> {
        if *lock(&self.permission) == PermissionStatus::Denied {
            return Err(LocationError::PermissionDenied);
        }
        lock(&self.fix).clone()
    }

    async fn watch_position(
        &self,
        thresholds: WatchThresholds,
    ) -> Result<PositionStream, LocationError> {
        if *lock(&self.permission) == PermissionStatus::Denied {
            return Err(LocationError::PermissionDenied);
        }
        let (tx, rx) = mpsc::channel(STREAM_CAPACITY);
        *lock(&self.watcher) = Some(tx);
        *lock(&self.last_thresholds) = Some(thresholds);
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        Ok(rx)
    }
}

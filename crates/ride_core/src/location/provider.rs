use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::error::LocationError;
use crate::geo::Coordinate;

/// Answer to a foreground permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Minimum time and distance between two delivered updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchThresholds {
    pub time_interval: Duration,
    pub distance_interval_m: f64,
}

impl Default for WatchThresholds {
    fn default() -> Self {
        Self {
            time_interval: Duration::from_secs(10),
            distance_interval_m: 20.0,
        }
    }
}

/// Stream of position updates. Dropping the receiver releases the subscription.
pub type PositionStream = mpsc::Receiver<Result<Coordinate, LocationError>>;

/// Device location source (GPS, OS location service, or a simulation).
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError>;

    /// One-shot position fix.
    async fn current_fix(&self) -> Result<Coordinate, LocationError>;

    /// Start recurring updates honoring `thresholds`.
    async fn watch_position(
        &self,
        thresholds: WatchThresholds,
    ) -> Result<PositionStream, LocationError>;
}

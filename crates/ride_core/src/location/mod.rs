//! User location: shared state, the provider seam, and the tracking controller.

pub mod controller;
pub mod error;
pub mod provider;
pub mod simulated;
pub mod state;

pub use controller::{LocationController, LocationNotice, TrackingState, TrackingStatus};
pub use error::LocationError;
pub use provider::{LocationProvider, PermissionStatus, PositionStream, WatchThresholds};
pub use simulated::SimulatedLocationProvider;
pub use state::{LocationState, LocationStore};

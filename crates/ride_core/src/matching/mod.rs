//! Driver selection for the live map.

pub mod algorithm;
pub mod nearest;
pub mod types;

pub use algorithm::DriverSelector;
pub use nearest::{find_nearest, NearestAvailable};
pub use types::NearestDriver;

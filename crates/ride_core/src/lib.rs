#[macro_use]
mod macros;

pub mod booking;
pub mod config;
pub mod driver;
pub mod error;
pub mod geo;
pub mod geocoding;
pub mod live_map;
pub mod location;
pub mod matching;
pub mod pricing;
pub mod projection;
pub mod roster;
pub mod store;
pub mod task;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

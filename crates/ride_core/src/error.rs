//! Crate-level error types.
//!
//! Location and geocoding failures live next to their modules
//! ([`crate::location::LocationError`], [`crate::geocoding::GeocodeError`]);
//! these are the ones shared across areas.

use thiserror::Error;

use crate::geo::GeoError;

/// A feature cannot run because its configuration is missing or invalid.
///
/// Only the feature that needs the value is blocked; everything else keeps
/// working.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{feature} is unavailable: {variable} is not configured")]
    MissingCredential {
        feature: &'static str,
        variable: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Geo(#[from] GeoError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("driver {0} is already in the roster")]
    DuplicateId(String),

    #[error("driver {0} not found")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid price {0}")]
    InvalidPrice(f64),
}

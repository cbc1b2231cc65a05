//! Geocoding collaborators: reverse lookup for fixes and place search for destinations.
//!
//! The HTTP client is treated as a black box by the rest of the crate. Reverse
//! lookups never fail into the caller: any error degrades to "no address".

pub mod cache;
pub mod client;
pub mod error;
mod parser;
mod response;
pub mod search;


use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

pub use cache::AddressCache;
pub use client::GeoapifyClient;
pub use error::GeocodeError;
pub use search::{DebouncedSearch, SearchState};

/// A place returned by forward search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub address: Option<String>,
    pub coordinate: Coordinate,
}

/// Coordinate to human-readable address.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `None` when no address is known or the lookup failed.
    async fn resolve(&self, coordinate: Coordinate) -> Option<String>;
}

/// Free text to candidate places.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, text: &str) -> Result<Vec<PlaceCandidate>, GeocodeError>;
}

/// Geocoder used when no credential is configured: every address is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

#[async_trait]
impl ReverseGeocoder for NoGeocoder {
    async fn resolve(&self, _coordinate: Coordinate) -> Option<String> {
        None
    }
}

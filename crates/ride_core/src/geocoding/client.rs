use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use super::cache::AddressCache;
use super::error::GeocodeError;
use super::parser::{parse_body, parse_reverse_response, parse_search_response};
use super::{PlaceCandidate, PlaceSearch, ReverseGeocoder};
use crate::config::RideConfig;
use crate::error::ConfigurationError;
use crate::geo::Coordinate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const SEARCH_LIMIT: &str = "5";

/// Thin HTTP client for a Geoapify-compatible geocoding API.
#[derive(Debug)]
pub struct GeoapifyClient {
    client: Client,
    endpoint: String,
    api_key: String,
    cache: AddressCache,
}

impl GeoapifyClient {
    /// Create a client for the given endpoint (e.g. `https://api.geoapify.com`).
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            cache: AddressCache::default(),
        })
    }

    /// Build from configuration; a missing key blocks only address lookup.
    pub fn from_config(config: &RideConfig) -> Result<Self, ConfigurationError> {
        let api_key = config.require_geoapify_key()?;
        Self::new(&config.geocoding_endpoint, api_key)
            .map_err(|err| ConfigurationError::Invalid(err.to_string()))
    }

    fn url(&self, path: &str) -> Result<Url, GeocodeError> {
        Url::parse(&format!("{}{}", self.endpoint, path))
            .map_err(|err| GeocodeError::Api(format!("failed to build geocoding URL: {}", err)))
    }

    async fn fetch(&self, url: Url) -> Result<String, GeocodeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GeocodeError::Api(format!("status {}: {}", status, body)));
        }
        Ok(body)
    }

    /// Reverse lookup. `Ok(None)` when the service knows no address there.
    pub async fn reverse(&self, coordinate: Coordinate) -> Result<Option<String>, GeocodeError> {
        if let Some(address) = self.cache.get(coordinate) {
            return Ok(Some(address));
        }

        let mut url = self.url("/v1/geocode/reverse")?;
        url.query_pairs_mut()
            .append_pair("lat", &format!("{:.6}", coordinate.latitude))
            .append_pair("lon", &format!("{:.6}", coordinate.longitude))
            .append_pair("format", "json")
            .append_pair("apiKey", &self.api_key);

        let body = self.fetch(url).await?;
        let address = parse_reverse_response(parse_body(&body)?);
        if let Some(address) = &address {
            self.cache.insert(coordinate, address.clone());
        }
        Ok(address)
    }

    /// Forward search returning up to five candidates.
    pub async fn search_places(&self, text: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        let mut url = self.url("/v1/geocode/search")?;
        url.query_pairs_mut()
            .append_pair("text", text)
            .append_pair("format", "json")
            .append_pair("limit", SEARCH_LIMIT)
            .append_pair("apiKey", &self.api_key);

        let body = self.fetch(url).await?;
        let candidates = parse_search_response(parse_body(&body)?);
        if candidates.is_empty() {
            return Err(GeocodeError::NoResults(text.to_string()));
        }
        Ok(candidates)
    }
}

#[async_trait]
impl ReverseGeocoder for GeoapifyClient {
    async fn resolve(&self, coordinate: Coordinate) -> Option<String> {
        match self.reverse(coordinate).await {
            Ok(address) => address,
            Err(err) => {
                geocoding_warn!("(resolve) reverse geocoding failed: {}", err);
                None
            }
        }
    }
}

#[async_trait]
impl PlaceSearch for GeoapifyClient {
    async fn search(&self, text: &str) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        geocoding_debug!("(search) searching places for {:?}", text);
        self.search_places(text).await
    }
}

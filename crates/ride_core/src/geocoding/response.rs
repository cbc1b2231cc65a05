use serde::Deserialize;

/// The response shapes seen from Geoapify-compatible endpoints.
///
/// `format=json` answers with `results`, the default GeoJSON format with
/// `features`, and some proxies return a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum GeocodeResponse {
    Results { results: Vec<GeocodeRecord> },
    Features { features: Vec<GeocodeFeature> },
    Bare(Vec<GeocodeRecord>),
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct GeocodeRecord {
    pub(super) name: Option<String>,
    pub(super) formatted: Option<String>,
    pub(super) street: Option<String>,
    pub(super) city: Option<String>,
    pub(super) state: Option<String>,
    pub(super) lat: Option<f64>,
    pub(super) lon: Option<f64>,
    pub(super) latitude: Option<f64>,
    pub(super) longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeFeature {
    pub(super) geometry: Option<GeocodeGeometry>,
    #[serde(default)]
    pub(super) properties: GeocodeRecord,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeGeometry {
    /// `[lng, lat]`
    pub(super) coordinates: Vec<f64>,
}

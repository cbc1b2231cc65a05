use thiserror::Error;

/// Errors encountered while talking to the geocoding service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed geocoding response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("geocoding service error: {0}")]
    Api(String),

    #[error("no results for {0:?}")]
    NoResults(String),
}

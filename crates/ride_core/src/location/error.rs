use thiserror::Error;

/// Failures reported by the location provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("could not obtain a position fix: {0}")]
    Fix(String),

    #[error("could not start position updates: {0}")]
    Subscription(String),
}

use thiserror::Error;

/// Input validation failures of the matching and estimation core.
///
/// Finding no landmark on the route is not an error; it is reported as
/// `Ok(None)` by the matcher and the estimator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EtaError {
    #[error("route must contain at least one coordinate")]
    InvalidRoute,
    #[error("speed limit must be a positive number of mph, got {0}")]
    InvalidSpeed(f64),
    #[error("coverage threshold must be a non-negative number of km, got {0}")]
    InvalidThreshold(f64),
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

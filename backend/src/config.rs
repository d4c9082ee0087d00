//! Service configuration read from the environment.

use std::{net::SocketAddr, path::PathBuf};

use crate::{
    error::EtaError,
    eta::{DEFAULT_SPEED_LIMIT_MPH, EtaEstimator},
    proximity::{COVERAGE_THRESHOLD_KM, ProximityMatcher},
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error(transparent)]
    Estimator(#[from] EtaError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON landmark dataset; the bundled Austin lights are used when unset.
    pub landmarks_path: Option<PathBuf>,
    pub bind_addr: SocketAddr,
    pub speed_limit_mph: f64,
    pub coverage_threshold_km: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            landmarks_path: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            speed_limit_mph: DEFAULT_SPEED_LIMIT_MPH,
            coverage_threshold_km: COVERAGE_THRESHOLD_KM,
        }
    }
}

impl AppConfig {
    /// Reads `LANDMARKS_JSON`, `BIND_ADDR`, `ETA_SPEED_LIMIT_MPH` and
    /// `COVERAGE_THRESHOLD_KM`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            landmarks_path: lookup("LANDMARKS_JSON").map(PathBuf::from),
            bind_addr: parse_or("BIND_ADDR", &lookup, defaults.bind_addr)?,
            speed_limit_mph: parse_or("ETA_SPEED_LIMIT_MPH", &lookup, defaults.speed_limit_mph)?,
            coverage_threshold_km: parse_or(
                "COVERAGE_THRESHOLD_KM",
                &lookup,
                defaults.coverage_threshold_km,
            )?,
        })
    }

    pub fn estimator(&self) -> Result<EtaEstimator, ConfigError> {
        let matcher = ProximityMatcher::with_threshold_km(self.coverage_threshold_km)?;
        Ok(EtaEstimator::new(matcher, self.speed_limit_mph)?)
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

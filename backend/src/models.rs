use chrono::{DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

pub use shared::{GeoPoint, Landmark, RoutePoint};

use crate::error::EtaError;

/// Rejects coordinates outside the valid latitude/longitude ranges.
pub fn validate_point(point: GeoPoint) -> Result<GeoPoint, EtaError> {
    if point.is_valid() {
        Ok(point)
    } else {
        Err(EtaError::InvalidCoordinate {
            lat: point.lat,
            lon: point.lon,
        })
    }
}

/// Converts wire route samples into validated points, keeping their order.
pub fn route_from_wire(points: &[RoutePoint]) -> Result<Vec<GeoPoint>, EtaError> {
    points
        .iter()
        .map(|&p| validate_point(GeoPoint::from(p)))
        .collect()
}

pub fn to_geo_point(point: Point<f64>) -> GeoPoint {
    GeoPoint {
        lat: point.y(),
        lon: point.x(),
    }
}

pub fn to_geo_types(point: GeoPoint) -> Point<f64> {
    Point::new(point.lon, point.lat)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtaResponse {
    pub landmark: Option<Landmark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub speed_limit_mph: f64,
    pub route_length_km: f64,
}

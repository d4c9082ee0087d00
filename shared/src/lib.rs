use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A fixed traffic-control point, e.g. a traffic light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    #[serde(flatten)]
    pub position: GeoPoint,
}

impl Landmark {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            position: GeoPoint::new(lat, lon),
        }
    }
}

/// Route sample as sent by clients.
///
/// Routing providers hand polylines out as GeoJSON `[lon, lat]` pairs, so
/// both that form and the `{ "lat", "lon" }` object are accepted.
// `LonLat` must stay first: the derived `GeoPoint` impl also accepts arrays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoutePoint {
    LonLat([f64; 2]),
    Point(GeoPoint),
}

impl From<RoutePoint> for GeoPoint {
    fn from(point: RoutePoint) -> Self {
        match point {
            RoutePoint::Point(p) => p,
            RoutePoint::LonLat([lon, lat]) => GeoPoint { lat, lon },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtaRequest {
    pub position: GeoPoint,
    pub route: Vec<RoutePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_limit_mph: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestRequest {
    pub position: GeoPoint,
    pub route: Vec<RoutePoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestResponse {
    pub landmark: Option<Landmark>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

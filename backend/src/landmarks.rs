use std::{
    collections::HashSet,
    fs::File,
    io::{self, Read},
    path::Path,
};

use serde_json::{Value, json};

use crate::models::Landmark;

const AUSTIN_TRAFFIC_LIGHTS: [(&str, f64, f64); 5] = [
    ("TL1", 30.26815, -97.74491), // Austin Convention Center
    ("TL2", 30.26644, -97.74295), // 6th Street
    ("TL3", 30.26720, -97.73950), // Republic Square
    ("TL4", 30.26990, -97.74180), // State Capitol
    ("TL5", 30.27050, -97.73800), // Waterloo Park
];

#[derive(Debug, thiserror::Error)]
pub enum LandmarkError {
    #[error("failed to read landmark file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid landmark definition: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("landmark {name} has out-of-range coordinates ({lat}, {lon})")]
    InvalidCoordinate { name: String, lat: f64, lon: f64 },
    #[error("landmark name {0} is used more than once")]
    DuplicateName(String),
}

/// Fixed set of traffic-control points, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self, LandmarkError> {
        let mut seen = HashSet::with_capacity(landmarks.len());
        for landmark in &landmarks {
            if !landmark.position.is_valid() {
                return Err(LandmarkError::InvalidCoordinate {
                    name: landmark.name.clone(),
                    lat: landmark.position.lat,
                    lon: landmark.position.lon,
                });
            }
            if !seen.insert(landmark.name.as_str()) {
                return Err(LandmarkError::DuplicateName(landmark.name.clone()));
            }
        }
        Ok(Self { landmarks })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LandmarkError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads a JSON array of `{ "name", "lat", "lon" }` records.
    pub fn from_reader(reader: impl Read) -> Result<Self, LandmarkError> {
        let landmarks: Vec<Landmark> = serde_json::from_reader(reader)?;
        Self::new(landmarks)
    }

    /// Downtown Austin traffic lights bundled with the service.
    pub fn austin_traffic_lights() -> Self {
        let landmarks = AUSTIN_TRAFFIC_LIGHTS
            .iter()
            .map(|&(name, lat, lon)| Landmark::new(name, lat, lon))
            .collect();
        Self { landmarks }
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// GeoJSON FeatureCollection of Point features, for map clients.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .landmarks
            .iter()
            .map(|landmark| {
                json!({
                    "type": "Feature",
                    "properties": { "name": landmark.name },
                    "geometry": {
                        "type": "Point",
                        "coordinates": [landmark.position.lon, landmark.position.lat],
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use gpx::Gpx;

use crate::models::{GeoPoint, to_geo_point};

#[derive(Debug, thiserror::Error)]
pub enum GpxImportError {
    #[error("failed to open GPX file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("GPX document contains no track or route points")]
    EmptyRoute,
}

/// Reads a planned route from a GPX document.
///
/// Track segment points come first, in document order, followed by the
/// points of any `<rte>` elements.
pub fn read_route(reader: impl Read) -> Result<Vec<GeoPoint>, GpxImportError> {
    let gpx = gpx::read(reader)?;
    let route = collect_points(&gpx);
    if route.is_empty() {
        return Err(GpxImportError::EmptyRoute);
    }
    Ok(route)
}

pub fn read_route_file(path: impl AsRef<Path>) -> Result<Vec<GeoPoint>, GpxImportError> {
    let file = File::open(path)?;
    read_route(BufReader::new(file))
}

fn collect_points(gpx: &Gpx) -> Vec<GeoPoint> {
    let track_points = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points);
    let route_points = gpx.routes.iter().flat_map(|route| &route.points);

    track_points
        .chain(route_points)
        .map(|waypoint| to_geo_point(waypoint.point()))
        .collect()
}

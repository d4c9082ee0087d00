use crate::models::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6_371.0;
pub const MILES_PER_KM: f64 = 0.621371;

/// Great-circle distance in kilometers using the haversine formula.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = (sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon).clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

/// Length of the polyline through `route`, in kilometers.
pub fn route_length_km(route: &[GeoPoint]) -> f64 {
    route.windows(2).map(|w| haversine_km(w[0], w[1])).sum()
}

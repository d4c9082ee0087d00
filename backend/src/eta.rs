use chrono::Duration;

use crate::{
    error::EtaError,
    geo::{haversine_km, km_to_miles},
    models::{GeoPoint, Landmark},
    proximity::ProximityMatcher,
};

pub const DEFAULT_SPEED_LIMIT_MPH: f64 = 30.0;

/// Estimated arrival at the nearest landmark on the route.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival<'a> {
    pub landmark: &'a Landmark,
    pub distance_km: f64,
    pub distance_miles: f64,
    pub speed_limit_mph: f64,
    pub eta_minutes: f64,
}

impl Arrival<'_> {
    /// ETA rounded to whole milliseconds, or `None` when it does not fit a
    /// [`Duration`].
    pub fn eta(&self) -> Option<Duration> {
        let millis = (self.eta_minutes * 60_000.0).round();
        if !millis.is_finite() || millis >= i64::MAX as f64 || millis <= i64::MIN as f64 {
            return None;
        }
        Duration::try_milliseconds(millis as i64)
    }
}

/// Straight-line ETA at a constant assumed speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaEstimator {
    matcher: ProximityMatcher,
    default_speed_mph: f64,
}

impl Default for EtaEstimator {
    fn default() -> Self {
        Self {
            matcher: ProximityMatcher::default(),
            default_speed_mph: DEFAULT_SPEED_LIMIT_MPH,
        }
    }
}

impl EtaEstimator {
    pub fn new(matcher: ProximityMatcher, default_speed_mph: f64) -> Result<Self, EtaError> {
        ensure_speed(default_speed_mph)?;
        Ok(Self {
            matcher,
            default_speed_mph,
        })
    }

    pub fn matcher(&self) -> &ProximityMatcher {
        &self.matcher
    }

    pub fn default_speed_mph(&self) -> f64 {
        self.default_speed_mph
    }

    /// ETA to the nearest landmark covered by `route`.
    ///
    /// The speed is validated before anything else, then the route. `Ok(None)`
    /// means no landmark lies on the route.
    pub fn estimate<'a>(
        &self,
        position: GeoPoint,
        landmarks: &'a [Landmark],
        route: &[GeoPoint],
        speed_limit_mph: Option<f64>,
    ) -> Result<Option<Arrival<'a>>, EtaError> {
        let speed = speed_limit_mph.unwrap_or(self.default_speed_mph);
        ensure_speed(speed)?;

        let Some(landmark) = self.matcher.nearest(position, route, landmarks)? else {
            return Ok(None);
        };

        let distance_km = haversine_km(position, landmark.position);
        let distance_miles = km_to_miles(distance_km);

        Ok(Some(Arrival {
            landmark,
            distance_km,
            distance_miles,
            speed_limit_mph: speed,
            eta_minutes: (distance_miles / speed) * 60.0,
        }))
    }
}

pub fn compute_eta<'a>(
    position: GeoPoint,
    landmarks: &'a [Landmark],
    route: &[GeoPoint],
    speed_limit_mph: f64,
) -> Result<Option<Arrival<'a>>, EtaError> {
    EtaEstimator::default().estimate(position, landmarks, route, Some(speed_limit_mph))
}

/// [`compute_eta`] at [`DEFAULT_SPEED_LIMIT_MPH`].
pub fn compute_eta_default<'a>(
    position: GeoPoint,
    landmarks: &'a [Landmark],
    route: &[GeoPoint],
) -> Result<Option<Arrival<'a>>, EtaError> {
    compute_eta(position, landmarks, route, DEFAULT_SPEED_LIMIT_MPH)
}

fn ensure_speed(speed_mph: f64) -> Result<(), EtaError> {
    if speed_mph.is_finite() && speed_mph > 0.0 {
        Ok(())
    } else {
        Err(EtaError::InvalidSpeed(speed_mph))
    }
}

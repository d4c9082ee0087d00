use crate::{
    error::EtaError,
    geo::haversine_km,
    models::{GeoPoint, Landmark},
};

/// Distance (km) under which a route sample counts as passing a landmark.
pub const COVERAGE_THRESHOLD_KM: f64 = 0.001;

/// Finds the landmark on a route that is closest to the vehicle.
///
/// Matching runs in two phases over the inputs as given:
/// 1. **Coverage**: a landmark is kept only if some route sample lies within
///    `threshold_km` of it. Its distance to the vehicle plays no part here.
/// 2. **Selection**: among covered landmarks, the one nearest to the current
///    position wins. On ties the landmark listed first is kept.
///
/// Both phases iterate the landmark and route sequences in order, so the
/// cost is `O(landmarks × route)` with no auxiliary index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityMatcher {
    threshold_km: f64,
}

impl Default for ProximityMatcher {
    fn default() -> Self {
        Self {
            threshold_km: COVERAGE_THRESHOLD_KM,
        }
    }
}

impl ProximityMatcher {
    pub fn with_threshold_km(threshold_km: f64) -> Result<Self, EtaError> {
        if !threshold_km.is_finite() || threshold_km < 0.0 {
            return Err(EtaError::InvalidThreshold(threshold_km));
        }
        Ok(Self { threshold_km })
    }

    pub fn threshold_km(&self) -> f64 {
        self.threshold_km
    }

    /// Whether any sample of `route` lies within the threshold of `landmark`.
    pub fn covers(&self, landmark: &Landmark, route: &[GeoPoint]) -> bool {
        route
            .iter()
            .any(|&sample| haversine_km(landmark.position, sample) <= self.threshold_km)
    }

    /// Landmarks covered by `route`, in input order.
    pub fn covered_landmarks<'a>(
        &self,
        route: &[GeoPoint],
        landmarks: &'a [Landmark],
    ) -> Result<Vec<&'a Landmark>, EtaError> {
        ensure_route(route)?;
        Ok(landmarks
            .iter()
            .filter(|landmark| self.covers(landmark, route))
            .collect())
    }

    /// # Returns
    /// - `Ok(Some(landmark))`: nearest covered landmark
    /// - `Ok(None)`: no landmark is covered by the route
    /// - `Err(EtaError::InvalidRoute)`: `route` is empty
    pub fn nearest<'a>(
        &self,
        position: GeoPoint,
        route: &[GeoPoint],
        landmarks: &'a [Landmark],
    ) -> Result<Option<&'a Landmark>, EtaError> {
        ensure_route(route)?;

        let mut nearest: Option<(&Landmark, f64)> = None;
        for landmark in landmarks {
            if !self.covers(landmark, route) {
                continue;
            }
            let distance = haversine_km(position, landmark.position);
            // Strict comparison keeps the earliest landmark on ties.
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((landmark, distance));
            }
        }

        Ok(nearest.map(|(landmark, _)| landmark))
    }
}

/// Nearest landmark on `route` using the default 1 m coverage threshold.
pub fn find_nearest_landmark<'a>(
    position: GeoPoint,
    route: &[GeoPoint],
    landmarks: &'a [Landmark],
) -> Result<Option<&'a Landmark>, EtaError> {
    ProximityMatcher::default().nearest(position, route, landmarks)
}

fn ensure_route(route: &[GeoPoint]) -> Result<(), EtaError> {
    if route.is_empty() {
        Err(EtaError::InvalidRoute)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::EARTH_RADIUS_KM;

    /// Point `km` kilometers north (negative: south) of `origin`.
    fn offset_north(origin: GeoPoint, km: f64) -> GeoPoint {
        GeoPoint {
            lat: origin.lat + (km / EARTH_RADIUS_KM).to_degrees(),
            lon: origin.lon,
        }
    }

    #[test]
    fn empty_route_is_invalid_input() {
        let landmarks = vec![Landmark::new("TL1", 30.0, -97.0)];
        let result = find_nearest_landmark(GeoPoint::new(30.0, -97.0), &[], &landmarks);
        assert_eq!(result, Err(EtaError::InvalidRoute));
    }

    #[test]
    fn empty_route_is_invalid_even_without_landmarks() {
        let result = find_nearest_landmark(GeoPoint::new(30.0, -97.0), &[], &[]);
        assert_eq!(result, Err(EtaError::InvalidRoute));
    }

    #[test]
    fn no_landmarks_yields_none() {
        let route = vec![GeoPoint::new(30.0, -97.0)];
        let result = find_nearest_landmark(GeoPoint::new(30.0, -97.0), &route, &[]);
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn landmark_on_route_sample_is_covered() {
        let light = Landmark::new("L", 30.0, -97.0);
        let route = vec![
            GeoPoint::new(29.99, -97.0),
            GeoPoint::new(30.0, -97.0),
            GeoPoint::new(30.01, -97.0),
        ];
        let position = offset_north(light.position, -1.0);

        let landmarks = vec![light.clone()];
        let found = find_nearest_landmark(position, &route, &landmarks).unwrap();
        assert_eq!(found, Some(&light));
    }

    #[test]
    fn nearest_covered_landmark_wins() {
        let position = GeoPoint::new(30.0, -97.0);
        let far = Landmark {
            name: "L1".into(),
            position: offset_north(position, 2.0),
        };
        let near = Landmark {
            name: "L2".into(),
            position: offset_north(position, 0.5),
        };
        let route = vec![position, near.position, far.position];

        let landmarks = vec![far, near];
        let found = find_nearest_landmark(position, &route, &landmarks).unwrap();
        assert_eq!(found.map(|l| l.name.as_str()), Some("L2"));
    }

    #[test]
    fn landmark_beside_route_is_not_covered() {
        let route = vec![GeoPoint::new(30.0, -97.0), GeoPoint::new(30.01, -97.0)];
        // Roughly 5 km east of the route, inside its general area.
        let beside = Landmark::new("L", 30.005, -96.948);
        assert!(route.iter().all(|&p| haversine_km(p, beside.position) > 4.0));

        let landmarks = vec![beside];
        let found = find_nearest_landmark(route[0], &route, &landmarks).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn uncovered_landmark_is_skipped_even_when_closest() {
        let position = GeoPoint::new(30.0, -97.0);
        let off_route = Landmark {
            name: "off".into(),
            position: offset_north(position, 0.01),
        };
        let on_route = Landmark {
            name: "on".into(),
            position: offset_north(position, 3.0),
        };
        let route = vec![on_route.position];

        let landmarks = vec![off_route, on_route];
        let found = find_nearest_landmark(position, &route, &landmarks).unwrap();
        assert_eq!(found.map(|l| l.name.as_str()), Some("on"));
    }

    #[test]
    fn ties_keep_first_landmark() {
        // Power-of-two offset keeps both latitude deltas exact.
        let position = GeoPoint::new(30.0, -97.0);
        let north = Landmark::new("north", 30.0 + 0.0078125, -97.0);
        let south = Landmark::new("south", 30.0 - 0.0078125, -97.0);
        let route = vec![south.position, north.position];

        assert_eq!(
            haversine_km(position, north.position),
            haversine_km(position, south.position)
        );

        let landmarks = vec![north.clone(), south.clone()];
        let found = find_nearest_landmark(position, &route, &landmarks).unwrap();
        assert_eq!(found.map(|l| l.name.as_str()), Some("north"));

        let reversed = vec![south, north];
        let found = find_nearest_landmark(position, &route, &reversed).unwrap();
        assert_eq!(found.map(|l| l.name.as_str()), Some("south"));
    }

    #[test]
    fn coverage_threshold_is_inclusive() {
        let light = Landmark::new("L", 30.0, -97.0);
        let sample = GeoPoint::new(30.0, -97.0005);
        let distance = haversine_km(light.position, sample);

        let exact = ProximityMatcher::with_threshold_km(distance).unwrap();
        assert!(exact.covers(&light, &[sample]));

        let tighter = ProximityMatcher::with_threshold_km(distance * 0.99).unwrap();
        assert!(!tighter.covers(&light, &[sample]));
    }

    #[test]
    fn wider_threshold_covers_nearby_samples() {
        let light = Landmark::new("L", 30.0, -97.0);
        let route = vec![offset_north(light.position, 0.02)];
        let landmarks = vec![light];

        assert_eq!(
            ProximityMatcher::default()
                .nearest(route[0], &route, &landmarks)
                .unwrap(),
            None
        );

        let matcher = ProximityMatcher::with_threshold_km(0.05).unwrap();
        assert!(matcher.nearest(route[0], &route, &landmarks).unwrap().is_some());
    }

    #[test]
    fn covered_landmarks_preserve_input_order() {
        let landmarks = vec![
            Landmark::new("TL1", 30.26815, -97.74491),
            Landmark::new("TL2", 30.26644, -97.74295),
            Landmark::new("TL3", 30.26720, -97.73950),
        ];
        let route = vec![landmarks[2].position, landmarks[0].position];

        let covered = ProximityMatcher::default()
            .covered_landmarks(&route, &landmarks)
            .unwrap();
        let names: Vec<_> = covered.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["TL1", "TL3"]);
    }

    #[test]
    fn rejects_invalid_thresholds() {
        assert!(ProximityMatcher::with_threshold_km(-0.1).is_err());
        assert!(ProximityMatcher::with_threshold_km(f64::NAN).is_err());
        assert!(ProximityMatcher::with_threshold_km(f64::INFINITY).is_err());
        assert_eq!(ProximityMatcher::default().threshold_km(), COVERAGE_THRESHOLD_KM);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_point() -> impl Strategy<Value = GeoPoint> {
            (-89.0..=89.0, -179.0..=179.0).prop_map(|(lat, lon)| GeoPoint { lat, lon })
        }

        fn landmarks() -> impl Strategy<Value = Vec<Landmark>> {
            prop::collection::vec(valid_point(), 0..8).prop_map(|points| {
                points
                    .into_iter()
                    .enumerate()
                    .map(|(i, position)| Landmark {
                        name: format!("TL{i}"),
                        position,
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn prop_result_is_covered_and_minimal(
                position in valid_point(),
                landmarks in landmarks(),
                extra in prop::collection::vec(valid_point(), 1..5),
                pick in prop::collection::vec(any::<bool>(), 8)
            ) {
                // Route passes through a random subset of the landmarks.
                let mut route = extra;
                for (landmark, &take) in landmarks.iter().zip(&pick) {
                    if take {
                        route.push(landmark.position);
                    }
                }

                let matcher = ProximityMatcher::default();
                let found = matcher.nearest(position, &route, &landmarks).unwrap();
                let covered = matcher.covered_landmarks(&route, &landmarks).unwrap();

                match found {
                    None => prop_assert!(covered.is_empty()),
                    Some(best) => {
                        prop_assert!(matcher.covers(best, &route));
                        let best_distance = haversine_km(position, best.position);
                        for other in covered {
                            prop_assert!(best_distance <= haversine_km(position, other.position));
                        }
                    }
                }
            }

            #[test]
            fn prop_empty_landmarks_never_match(
                position in valid_point(),
                route in prop::collection::vec(valid_point(), 1..10)
            ) {
                prop_assert_eq!(find_nearest_landmark(position, &route, &[]), Ok(None));
            }
        }
    }
}

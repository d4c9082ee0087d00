use rayon::prelude::*;

use crate::{
    error::EtaError,
    eta::EtaEstimator,
    models::{GeoPoint, Landmark},
};

/// ETA as seen from one sample of a replayed trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub index: usize,
    pub position: GeoPoint,
    pub landmark: Option<String>,
    pub eta_minutes: Option<f64>,
}

/// Replays a trip along `route`, treating every sample in turn as the current
/// position and estimating the ETA against the whole route.
///
/// Entries come back in route order. An empty route is rejected like any
/// other estimate.
pub fn eta_timeline(
    estimator: &EtaEstimator,
    route: &[GeoPoint],
    landmarks: &[Landmark],
    speed_limit_mph: Option<f64>,
) -> Result<Vec<TimelineEntry>, EtaError> {
    if route.is_empty() {
        return Err(EtaError::InvalidRoute);
    }

    route
        .par_iter()
        .enumerate()
        .map(|(index, &position)| -> Result<TimelineEntry, EtaError> {
            let arrival = estimator.estimate(position, landmarks, route, speed_limit_mph)?;
            Ok(TimelineEntry {
                index,
                position,
                landmark: arrival.as_ref().map(|a| a.landmark.name.clone()),
                eta_minutes: arrival.map(|a| a.eta_minutes),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downtown() -> (Vec<GeoPoint>, Vec<Landmark>) {
        let landmarks = vec![
            Landmark::new("TL1", 30.26815, -97.74491),
            Landmark::new("TL4", 30.26990, -97.74180),
        ];
        let route = vec![
            GeoPoint::new(30.26600, -97.74600),
            landmarks[0].position,
            GeoPoint::new(30.26900, -97.74300),
            landmarks[1].position,
        ];
        (route, landmarks)
    }

    #[test]
    fn one_entry_per_sample_in_order() {
        let (route, landmarks) = downtown();
        let timeline = eta_timeline(&EtaEstimator::default(), &route, &landmarks, None).unwrap();

        assert_eq!(timeline.len(), route.len());
        for (i, entry) in timeline.iter().enumerate() {
            assert_eq!(entry.index, i);
            assert_eq!(entry.position, route[i]);
        }
    }

    #[test]
    fn eta_is_zero_when_standing_on_a_landmark() {
        let (route, landmarks) = downtown();
        let timeline = eta_timeline(&EtaEstimator::default(), &route, &landmarks, None).unwrap();

        assert_eq!(timeline[1].landmark.as_deref(), Some("TL1"));
        assert_eq!(timeline[1].eta_minutes, Some(0.0));
        assert_eq!(timeline[3].landmark.as_deref(), Some("TL4"));
        assert_eq!(timeline[3].eta_minutes, Some(0.0));
    }

    #[test]
    fn matches_sequential_estimates() {
        let (route, landmarks) = downtown();
        let estimator = EtaEstimator::default();
        let timeline = eta_timeline(&estimator, &route, &landmarks, Some(25.0)).unwrap();

        for entry in &timeline {
            let arrival = estimator
                .estimate(entry.position, &landmarks, &route, Some(25.0))
                .unwrap();
            assert_eq!(entry.eta_minutes, arrival.map(|a| a.eta_minutes));
        }
    }

    #[test]
    fn no_landmarks_gives_empty_estimates() {
        let (route, _) = downtown();
        let timeline = eta_timeline(&EtaEstimator::default(), &route, &[], None).unwrap();
        assert!(timeline.iter().all(|e| e.landmark.is_none() && e.eta_minutes.is_none()));
    }

    #[test]
    fn propagates_invalid_speed() {
        let (route, landmarks) = downtown();
        let err = eta_timeline(&EtaEstimator::default(), &route, &landmarks, Some(-1.0)).unwrap_err();
        assert_eq!(err, EtaError::InvalidSpeed(-1.0));
    }

    #[test]
    fn empty_route_is_invalid() {
        let err = eta_timeline(&EtaEstimator::default(), &[], &[], None).unwrap_err();
        assert_eq!(err, EtaError::InvalidRoute);
    }
}

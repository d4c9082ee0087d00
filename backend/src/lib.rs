pub mod config;
pub mod error;
pub mod eta;
pub mod geo;
pub mod gpx_import;
pub mod landmarks;
pub mod models;
pub mod proximity;
pub mod timeline;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use shared::{ApiError, EtaRequest, NearestRequest, NearestResponse};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::EtaError;
use crate::eta::EtaEstimator;
use crate::geo::route_length_km;
use crate::landmarks::LandmarkSet;
use crate::models::{EtaResponse, GeoPoint, route_from_wire, validate_point};

type Rejection = (StatusCode, Json<ApiError>);
type ApiResult<T> = Result<Json<T>, Rejection>;

#[derive(Clone)]
pub struct AppState {
    pub landmarks: Arc<LandmarkSet>,
    pub estimator: EtaEstimator,
}

impl AppState {
    pub fn new(landmarks: LandmarkSet, estimator: EtaEstimator) -> Self {
        Self {
            landmarks: Arc::new(landmarks),
            estimator,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/eta", post(eta_handler).get(eta_query_handler))
        .route("/api/nearest", post(nearest_handler))
        .route("/api/landmarks", get(landmarks_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn eta_handler(
    State(state): State<AppState>,
    Json(req): Json<EtaRequest>,
) -> ApiResult<EtaResponse> {
    let position = validate_point(req.position).map_err(bad_request)?;
    let route = route_from_wire(&req.route).map_err(bad_request)?;
    estimate(&state, position, &route, req.speed_limit_mph)
}

/// Query-string form: `?lat=..&lon=..&route=lon,lat;lon,lat[&speed_limit_mph=..]`.
#[derive(Debug, Deserialize)]
struct EtaQuery {
    lat: f64,
    lon: f64,
    #[serde(default)]
    route: String,
    speed_limit_mph: Option<f64>,
}

async fn eta_query_handler(
    State(state): State<AppState>,
    query: Result<Query<EtaQuery>, QueryRejection>,
) -> ApiResult<EtaResponse> {
    let Query(query) = query.map_err(malformed_query)?;
    let position = validate_point(GeoPoint::new(query.lat, query.lon)).map_err(bad_request)?;
    let route = parse_route_param(&query.route)?;
    estimate(&state, position, &route, query.speed_limit_mph)
}

async fn nearest_handler(
    State(state): State<AppState>,
    Json(req): Json<NearestRequest>,
) -> ApiResult<NearestResponse> {
    let position = validate_point(req.position).map_err(bad_request)?;
    let route = route_from_wire(&req.route).map_err(bad_request)?;

    let landmark = state
        .estimator
        .matcher()
        .nearest(position, &route, state.landmarks.as_slice())
        .map_err(bad_request)?
        .cloned();

    tracing::debug!(
        "nearest landmark for {:?} over {} samples: {:?}",
        position,
        route.len(),
        landmark.as_ref().map(|l| &l.name)
    );

    Ok(Json(NearestResponse { landmark }))
}

async fn landmarks_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.landmarks.to_geojson())
}

fn estimate(
    state: &AppState,
    position: GeoPoint,
    route: &[GeoPoint],
    speed_limit_mph: Option<f64>,
) -> ApiResult<EtaResponse> {
    let arrival = state
        .estimator
        .estimate(position, state.landmarks.as_slice(), route, speed_limit_mph)
        .map_err(bad_request)?;
    let route_length_km = route_length_km(route);

    let response = match arrival {
        Some(arrival) => {
            tracing::info!(
                "{} is {:.3} km away, eta {:.2} min at {} mph",
                arrival.landmark.name,
                arrival.distance_km,
                arrival.eta_minutes,
                arrival.speed_limit_mph
            );
            EtaResponse {
                landmark: Some(arrival.landmark.clone()),
                distance_km: Some(arrival.distance_km),
                eta_minutes: Some(arrival.eta_minutes),
                estimated_arrival: arrival
                    .eta()
                    .and_then(|eta| Utc::now().checked_add_signed(eta)),
                speed_limit_mph: arrival.speed_limit_mph,
                route_length_km,
            }
        }
        None => {
            tracing::info!("no landmark on route of {} samples", route.len());
            EtaResponse {
                landmark: None,
                distance_km: None,
                eta_minutes: None,
                estimated_arrival: None,
                speed_limit_mph: speed_limit_mph.unwrap_or(state.estimator.default_speed_mph()),
                route_length_km,
            }
        }
    };

    Ok(Json(response))
}

fn parse_route_param(raw: &str) -> Result<Vec<GeoPoint>, Rejection> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| -> Result<GeoPoint, Rejection> {
            let (lon, lat) = pair
                .split_once(',')
                .ok_or_else(|| malformed_route(pair))?;
            let lon: f64 = lon.trim().parse().map_err(|_| malformed_route(pair))?;
            let lat: f64 = lat.trim().parse().map_err(|_| malformed_route(pair))?;
            validate_point(GeoPoint::new(lat, lon)).map_err(bad_request)
        })
        .collect()
}

fn malformed_route(pair: &str) -> Rejection {
    tracing::warn!("rejecting malformed route sample {pair:?}");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            message: format!("malformed route sample {pair:?}, expected lon,lat"),
        }),
    )
}

fn malformed_query(rejection: QueryRejection) -> Rejection {
    tracing::warn!("rejecting query string: {rejection}");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            message: rejection.body_text(),
        }),
    )
}

fn bad_request(err: EtaError) -> Rejection {
    tracing::warn!("rejecting request: {err}");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}

use std::path::PathBuf;

use clap::Parser;
use signal_eta::{
    eta::{DEFAULT_SPEED_LIMIT_MPH, EtaEstimator},
    geo::route_length_km,
    gpx_import::read_route_file,
    landmarks::LandmarkSet,
    models::{GeoPoint, validate_point},
    proximity::{COVERAGE_THRESHOLD_KM, ProximityMatcher},
    timeline::eta_timeline,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Estimate the time to the nearest traffic light along a GPX route"
)]
struct Args {
    /// Current latitude of the vehicle, in degrees
    #[arg(long, allow_negative_numbers = true, conflicts_with = "timeline")]
    lat: Option<f64>,

    /// Current longitude of the vehicle, in degrees
    #[arg(long, allow_negative_numbers = true, conflicts_with = "timeline")]
    lon: Option<f64>,

    /// GPX file holding the planned route (track or route points)
    #[arg(long)]
    route: PathBuf,

    /// JSON landmark dataset; defaults to the bundled Austin traffic lights
    #[arg(long)]
    landmarks: Option<PathBuf>,

    /// Assumed speed in miles per hour
    #[arg(long, default_value_t = DEFAULT_SPEED_LIMIT_MPH)]
    speed_limit: f64,

    /// Distance in km under which a route sample passes a landmark
    #[arg(long, default_value_t = COVERAGE_THRESHOLD_KM)]
    threshold_km: f64,

    /// Replay the route, estimating from every sample instead of --lat/--lon
    #[arg(long)]
    timeline: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let landmarks = match &args.landmarks {
        Some(path) => LandmarkSet::from_file(path)?,
        None => LandmarkSet::austin_traffic_lights(),
    };
    let route = read_route_file(&args.route)?;
    tracing::info!(
        "route {:?}: {} samples, {:.3} km; {} landmarks",
        args.route,
        route.len(),
        route_length_km(&route),
        landmarks.len()
    );

    let matcher = ProximityMatcher::with_threshold_km(args.threshold_km)?;
    let estimator = EtaEstimator::new(matcher, args.speed_limit)?;

    if args.timeline {
        for entry in eta_timeline(&estimator, &route, landmarks.as_slice(), None)? {
            match (entry.landmark, entry.eta_minutes) {
                (Some(name), Some(eta)) => println!(
                    "#{:<4} ({:.5}, {:.5})  {name}  {eta:.2} min",
                    entry.index, entry.position.lat, entry.position.lon
                ),
                _ => println!(
                    "#{:<4} ({:.5}, {:.5})  no landmark ahead",
                    entry.index, entry.position.lat, entry.position.lon
                ),
            }
        }
        return Ok(());
    }

    let (Some(lat), Some(lon)) = (args.lat, args.lon) else {
        return Err("--lat and --lon are required unless --timeline is set".into());
    };
    let position = validate_point(GeoPoint::new(lat, lon))?;

    match estimator.estimate(position, landmarks.as_slice(), &route, None)? {
        Some(arrival) => println!(
            "{}: {:.3} km ({:.3} mi), eta {:.2} min at {} mph",
            arrival.landmark.name,
            arrival.distance_km,
            arrival.distance_miles,
            arrival.eta_minutes,
            arrival.speed_limit_mph
        ),
        None => println!("no landmark found on route"),
    }

    Ok(())
}

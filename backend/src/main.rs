use signal_eta::{AppState, config::AppConfig, create_router, landmarks::LandmarkSet};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signal_eta=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let landmarks = match &config.landmarks_path {
        Some(path) => {
            let set = LandmarkSet::from_file(path)?;
            tracing::info!("loaded {} landmarks from {}", set.len(), path.display());
            set
        }
        None => {
            let set = LandmarkSet::austin_traffic_lights();
            tracing::info!("using {} bundled Austin traffic lights", set.len());
            set
        }
    };

    let estimator = config.estimator()?;
    tracing::info!(
        "coverage threshold {} km, default speed {} mph",
        estimator.matcher().threshold_km(),
        estimator.default_speed_mph()
    );

    let app = create_router(AppState::new(landmarks, estimator));

    tracing::info!("starting signal_eta on http://{}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use std::net::SocketAddr;
use std::process::ExitCode;
use std::str::FromStr;

use ferry_planner::planner::PlannerConfig;
use ferry_planner::records::{Dataset, Vehicle};
use ferry_planner::repository::LegRepository;
use ferry_planner::web::{AppState, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Read an environment variable, falling back to `default` when it is unset
/// or unparseable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, "ignoring unparseable setting");
            default
        }),
        Err(_) => default,
    }
}

fn config_from_env() -> PlannerConfig {
    let defaults = PlannerConfig::default();
    PlannerConfig {
        max_results: env_or("PLANNER_MAX_RESULTS", defaults.max_results),
        max_itineraries: env_or("PLANNER_MAX_ITINERARIES", defaults.max_itineraries),
        check_in_mins: env_or("PLANNER_CHECK_IN_MINS", defaults.check_in_mins),
        disembark_mins: env_or("PLANNER_DISEMBARK_MINS", defaults.disembark_mins),
        ..defaults
    }
}

/// Load and index the dataset file named by `PLANNER_DATASET`.
fn load_dataset(path: &str) -> Result<LegRepository, String> {
    let dataset = Dataset::from_json_file(path).map_err(|e| e.to_string())?;
    let repo = dataset
        .to_repository(&Vehicle::default())
        .map_err(|e| format!("{path}: {e}"))?;
    info!(
        path,
        cars = repo.car_count(),
        crossings = repo.crossing_count(),
        "dataset loaded"
    );
    Ok(repo)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ferry_planner=info,tower_http=info")),
        )
        .init();

    let addr = std::env::var("PLANNER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = match addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(%addr, error = %e, "invalid PLANNER_ADDR");
            return ExitCode::FAILURE;
        }
    };

    let config = config_from_env();
    if let Err(e) = config.validate() {
        error!(error = %e, "invalid planner configuration");
        return ExitCode::FAILURE;
    }
    info!(
        max_results = config.max_results,
        max_itineraries = config.max_itineraries,
        "planner configured"
    );

    let mut state = AppState::new(config);
    if let Ok(path) = std::env::var("PLANNER_DATASET") {
        match load_dataset(&path) {
            Ok(repo) => state = state.with_dataset(repo),
            Err(e) => {
                error!(error = %e, "failed to load PLANNER_DATASET");
                return ExitCode::FAILURE;
            }
        }
    }

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!("Ferry planner listening on http://{addr}");
    info!("  GET  /health         - Health check");
    info!("  POST /trip/evaluate  - Evaluate a round trip");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shuttle_server::cache::{CacheConfig, ScheduleCache};
use shuttle_server::planner::PlannerConfig;
use shuttle_server::source::{FileScheduleSource, RestConfig, RestScheduleSource, ScheduleSource};
use shuttle_server::web::{create_router, AppState};

/// Fallback civil timezone of the shuttle system.
const DEFAULT_TIMEZONE: chrono_tz::Tz = chrono_tz::America::Los_Angeles;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shuttle_server=info")),
        )
        .init();

    // Prefer the REST schedule database when configured; fall back to the
    // static schedule file.
    let source = match std::env::var("SHUTTLE_SCHEDULE_URL") {
        Ok(url) => {
            let api_key = std::env::var("SHUTTLE_SCHEDULE_KEY").unwrap_or_else(|_| {
                warn!("SHUTTLE_SCHEDULE_KEY not set; API calls will fail");
                String::new()
            });
            let rest = RestScheduleSource::new(RestConfig::new(url, api_key))
                .expect("failed to create schedule API client");
            ScheduleSource::Rest(rest)
        }
        Err(_) => {
            let path = std::env::var("SHUTTLE_ROUTES_FILE")
                .unwrap_or_else(|_| "routes.json".to_string());
            info!(path, "using static schedule file");
            ScheduleSource::File(FileScheduleSource::new(path))
        }
    };

    let mut config = PlannerConfig::default();
    if let Ok(hub) = std::env::var("SHUTTLE_HUB_STOP") {
        config = config.with_hub_stop(hub);
    }

    let timezone = std::env::var("SHUTTLE_TIMEZONE")
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(DEFAULT_TIMEZONE);

    let schedule = ScheduleCache::new(source, &config.hub_stop_name, &CacheConfig::default());
    let state = AppState::new(schedule, config, timezone);
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!(%addr, "shuttle planner listening");
    info!("  GET  /health               - Health check");
    info!("  GET  /shuttles             - Home page widget JSON");
    info!("  GET  /shuttles/route/:id   - Route detail widget JSON");
    info!("  POST /shuttles/routeplanner - Journey plan widget JSON");
    info!("  GET  /api/arrivals         - Next arrival for a route and stop");
    info!("  GET  /api/routes           - Direct routes between two stops");
    info!("  GET  /api/plan             - Journey plan between two stops");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}

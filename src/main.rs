//! Attendance Server
//!
//! REST API for daily token check-in and attendance statistics.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attendance_server::{api, clock::SystemClock, config::AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("attendance_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting attendance server v{}", env!("CARGO_PKG_VERSION"));

    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    let state = AppState::new(config, Arc::new(SystemClock))?;
    tracing::info!(
        students = state.services.students.count(),
        cutoff = %state.services.attendance.cutoff().format("%H:%M"),
        "Roster loaded"
    );

    let app = api::router(state);

    let addr = SocketAddr::new(server_host.parse()?, server_port);
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

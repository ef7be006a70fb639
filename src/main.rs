//! Sitecoord - headless fleet dashboard
//!
//! Loads the fleet from the coordination backend and prints today's
//! availability overview and the pending equipment requests.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitecoord::{
    availability::{build_overview, OverviewFilter},
    config::{AppConfig, LoggingConfig},
    models::EquipmentState,
    services::fleet::FleetService,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let _guard = init_tracing(&config.logging);

    tracing::info!("Starting Sitecoord v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Coordination backend: {}", config.api.base_url);

    let state = AppState::new(config)?;
    let services = &state.services;

    services.fleet.refresh().await?;
    let today = FleetService::today();
    let snapshot = services.fleet.snapshot().await?;

    let overview = build_overview(
        &snapshot.equipment,
        &snapshot.events,
        &snapshot.projects,
        today,
        state.config.fleet.open_end_horizon_days,
        &OverviewFilter::default(),
    );
    let counts = overview.counts();

    println!("Fleet on {}", today);
    for equipment_state in EquipmentState::ALL {
        let count = counts.get(&equipment_state).copied().unwrap_or(0);
        println!("  {:<18} {}", equipment_state.to_string(), count);
    }
    println!();
    for row in overview.visible() {
        let project = row.assignment_project.map(|p| p.name.as_str()).unwrap_or("-");
        let next_service = row
            .next_service
            .map(|s| format!("{} {}", s.service_type, s.scheduled_start))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<32} {:<18} {:<28} {}",
            row.equipment.short_label(),
            row.state.to_string(),
            project,
            next_service
        );
    }

    let pending = services.requests.pending().await?;
    println!();
    println!("Pending requests: {}", pending.len());
    for request in &pending {
        let project = snapshot
            .project_by_id(request.project_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Project #{}", request.project_id));
        let requested_by = request
            .requested_by
            .as_ref()
            .map(|u| u.display_name())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  #{:<5} {:?} for {} from {} (by {})",
            request.id, request.request_type, project, request.start_date, requested_by
        );
    }

    Ok(())
}

/// Console output follows `logging.format`; `logging.file` adds a daily
/// rolling JSON log. The returned guard must live until exit.
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("sitecoord={}", logging.level).into());

    let (file_layer, guard) = match logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "sitecoord.log".into());
            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
    guard
}

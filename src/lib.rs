//! Sitecoord
//!
//! Client for a construction coordination backend: projects with their notes
//! and documents, and the equipment fleet with its assignments, service
//! windows, movements and field requests. Equipment availability is derived
//! locally from the fleet events, and scheduling conflicts are detected (and
//! optionally auto-resolved) before anything is sent to the backend.

use std::sync::Arc;

pub mod availability;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared by every front end
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let repository = repository::Repository::new(&config.api)?;
        let services = services::Services::new(repository, config.fleet.clone());
        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services),
        })
    }
}

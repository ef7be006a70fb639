//! Business logic services

pub mod cache;
pub mod files;
pub mod fleet;
pub mod notes;
pub mod projects;
pub mod requests;

use std::sync::Arc;

use crate::{config::FleetConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub projects: projects::ProjectsService,
    pub notes: notes::NotesService,
    pub files: files::FilesService,
    pub fleet: fleet::FleetService,
    pub requests: requests::RequestsService,
}

impl Services {
    /// Create all services; fleet and request views share one cache
    pub fn new(repository: Repository, fleet_config: FleetConfig) -> Self {
        let cache = cache::FleetCache::new(Arc::new(repository.clone()));
        Self {
            projects: projects::ProjectsService::new(repository.clone(), cache.clone()),
            notes: notes::NotesService::new(repository.clone()),
            files: files::FilesService::new(repository),
            fleet: fleet::FleetService::new(cache.clone(), fleet_config.clone()),
            requests: requests::RequestsService::new(cache, fleet_config),
        }
    }
}

//! Project coordination service

use validator::Validate;

use super::cache::{FleetCache, Refresh};
use crate::{
    error::AppResult,
    models::{
        project::{CreateProject, DashboardProject, ProjectEquipmentItem, UpdateProject},
        LifecycleStage,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ProjectsService {
    repository: Repository,
    cache: FleetCache,
}

impl ProjectsService {
    pub fn new(repository: Repository, cache: FleetCache) -> Self {
        Self { repository, cache }
    }

    /// Dashboard listing, optionally restricted to one lifecycle stage
    pub async fn dashboard(&self, stage: Option<LifecycleStage>) -> AppResult<Vec<DashboardProject>> {
        self.repository.projects_dashboard(stage).await
    }

    pub async fn create(&self, data: CreateProject) -> AppResult<()> {
        data.validate()?;
        self.repository.projects_create(&data).await?;
        tracing::info!("Project created: {}", data.name);
        self.cache.refresh_after_write(Refresh::PROJECTS).await;
        Ok(())
    }

    pub async fn rename(&self, id: i32, data: UpdateProject) -> AppResult<()> {
        data.validate()?;
        self.repository.projects_update(id, &data).await?;
        tracing::info!("Project {} renamed to {}", id, data.name);
        self.cache.refresh_after_write(Refresh::PROJECTS).await;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.projects_delete(id).await?;
        tracing::info!("Project {} deleted", id);
        self.cache.refresh_after_write(Refresh::PROJECTS).await;
        Ok(())
    }

    pub async fn equipment(&self, id: i32) -> AppResult<Vec<ProjectEquipmentItem>> {
        self.repository.projects_equipment(id).await
    }
}

//! Project endpoints

use super::Repository;
use crate::{
    error::AppResult,
    models::{
        project::{CreateProject, DashboardProject, ProjectEquipmentItem, UpdateProject},
        LifecycleStage,
    },
};

impl Repository {
    /// List projects for the dashboard, optionally restricted to one stage
    pub async fn projects_dashboard(&self, stage: Option<LifecycleStage>) -> AppResult<Vec<DashboardProject>> {
        let mut request = self.get("/projects/dashboard");
        if let Some(stage) = stage {
            request = request.query(&[("stage", stage.as_str())]);
        }
        self.fetch(request, "fetch projects").await
    }

    pub async fn projects_create(&self, data: &CreateProject) -> AppResult<()> {
        self.execute(self.post("/projects/coordination").json(data), "create project")
            .await
    }

    pub async fn projects_update(&self, id: i32, data: &UpdateProject) -> AppResult<()> {
        self.execute(self.put(&format!("/projects/{}", id)).json(data), "update project")
            .await
    }

    pub async fn projects_delete(&self, id: i32) -> AppResult<()> {
        self.execute(self.delete(&format!("/projects/{}", id)), "delete project")
            .await
    }

    /// Equipment delivered to a project
    pub async fn projects_equipment(&self, id: i32) -> AppResult<Vec<ProjectEquipmentItem>> {
        self.fetch(
            self.get(&format!("/projects/{}/equipment", id)),
            "fetch project equipment",
        )
        .await
    }
}

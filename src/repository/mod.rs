//! Repository layer: one method per endpoint of the coordination backend

pub mod equipment;
pub mod files;
pub mod fleet;
pub mod notes;
pub mod projects;
pub mod requests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, UpdateEquipment},
        fleet::{CreateAssignment, CreateMovement, CreateService, FleetEvents},
        project::DashboardProject,
        request::{Approval, EquipmentRequest},
    },
};

/// HTTP-backed repository
#[derive(Clone)]
pub struct Repository {
    http: Client,
    base_url: String,
}

impl Repository {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Send a request and decode its JSON body
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> AppResult<T> {
        let response = check_status(send(request, action).await?, action).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Unreadable response to {}: {}", action, e);
            AppError::from(e)
        })
    }

    /// Send a request whose body is ignored
    async fn execute(&self, request: RequestBuilder, action: &str) -> AppResult<()> {
        check_status(send(request, action).await?, action).await?;
        Ok(())
    }
}

async fn send(request: RequestBuilder, action: &str) -> AppResult<Response> {
    request.send().await.map_err(|e| {
        tracing::error!("Transport error while trying to {}: {}", action, e);
        AppError::from(e)
    })
}

/// Map a non-2xx response to an error carrying the body text, or the status
/// reason when the body is empty
async fn check_status(response: Response, action: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        format!(
            "Failed to {}: {}",
            action,
            status.canonical_reason().unwrap_or("unknown status")
        )
    } else {
        body
    };
    tracing::warn!("Backend refused to {} ({}): {}", action, status, message);

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(message));
    }
    Err(AppError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Backend operations the fleet and request services depend on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FleetBackend: Send + Sync {
    async fn list_projects(&self) -> AppResult<Vec<DashboardProject>>;
    async fn list_equipment(&self) -> AppResult<Vec<Equipment>>;
    async fn fleet_events(&self) -> AppResult<FleetEvents>;
    async fn list_requests(&self) -> AppResult<Vec<EquipmentRequest>>;

    async fn create_equipment(&self, data: &CreateEquipment) -> AppResult<()>;
    async fn update_equipment(&self, id: i32, data: &UpdateEquipment) -> AppResult<()>;
    async fn delete_equipment(&self, id: i32) -> AppResult<()>;

    async fn create_assignment(&self, equipment_id: i32, data: &CreateAssignment) -> AppResult<()>;
    async fn create_service(&self, equipment_id: i32, data: &CreateService) -> AppResult<()>;
    async fn create_movement(&self, equipment_id: i32, data: &CreateMovement) -> AppResult<()>;
    async fn update_assignment_end(
        &self,
        equipment_id: i32,
        assignment_id: i32,
        end_date: chrono::NaiveDate,
    ) -> AppResult<()>;

    async fn approve_request(&self, id: i32, approval: &Approval) -> AppResult<()>;
    async fn reject_request(&self, id: i32, decision_note: &str) -> AppResult<()>;
}

#[async_trait]
impl FleetBackend for Repository {
    async fn list_projects(&self) -> AppResult<Vec<DashboardProject>> {
        self.projects_dashboard(None).await
    }

    async fn list_equipment(&self) -> AppResult<Vec<Equipment>> {
        self.equipment_list().await
    }

    async fn fleet_events(&self) -> AppResult<FleetEvents> {
        self.fleet_events_list().await
    }

    async fn list_requests(&self) -> AppResult<Vec<EquipmentRequest>> {
        self.requests_list().await
    }

    async fn create_equipment(&self, data: &CreateEquipment) -> AppResult<()> {
        self.equipment_create(data).await
    }

    async fn update_equipment(&self, id: i32, data: &UpdateEquipment) -> AppResult<()> {
        self.equipment_update(id, data).await
    }

    async fn delete_equipment(&self, id: i32) -> AppResult<()> {
        self.equipment_delete(id).await
    }

    async fn create_assignment(&self, equipment_id: i32, data: &CreateAssignment) -> AppResult<()> {
        self.fleet_create_assignment(equipment_id, data).await
    }

    async fn create_service(&self, equipment_id: i32, data: &CreateService) -> AppResult<()> {
        self.fleet_create_service(equipment_id, data).await
    }

    async fn create_movement(&self, equipment_id: i32, data: &CreateMovement) -> AppResult<()> {
        self.fleet_create_movement(equipment_id, data).await
    }

    async fn update_assignment_end(
        &self,
        equipment_id: i32,
        assignment_id: i32,
        end_date: chrono::NaiveDate,
    ) -> AppResult<()> {
        self.fleet_update_assignment_end(equipment_id, assignment_id, end_date).await
    }

    async fn approve_request(&self, id: i32, approval: &Approval) -> AppResult<()> {
        self.requests_approve(id, approval).await
    }

    async fn reject_request(&self, id: i32, decision_note: &str) -> AppResult<()> {
        self.requests_reject(id, decision_note).await
    }
}

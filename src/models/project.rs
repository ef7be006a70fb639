//! Project model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::dates;
use super::enums::{LifecycleStage, ProjectType};

/// Lightweight reference to a person attached to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: i32,
    pub name: String,
}

/// Project as returned by the dashboard listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardProject {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub project_type: Option<ProjectType>,
    pub lifecycle_stage: LifecycleStage,
    pub field_manager: Option<PersonRef>,
    pub coordinator: Option<PersonRef>,
    pub builder: Option<PersonRef>,
}

/// Project summary used by the fleet views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectShort {
    pub id: i32,
    pub name: String,
    pub exact_location: Option<String>,
    pub lifecycle_stage: LifecycleStage,
}

impl From<DashboardProject> for ProjectShort {
    fn from(p: DashboardProject) -> Self {
        Self {
            id: p.id,
            name: p.name,
            exact_location: p.address,
            lifecycle_stage: p.lifecycle_stage,
        }
    }
}

/// Create project request
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[validate(length(min = 2, message = "Project name must be at least 2 characters"))]
    pub name: String,
    pub exact_location: String,
    pub lifecycle_stage: LifecycleStage,
    pub project_type: Option<ProjectType>,
    pub client_name: Option<String>,
    pub notes: Option<String>,
}

/// Update project request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 2, message = "Project name must be at least 2 characters"))]
    pub name: String,
}

/// Next service window attached to a project equipment row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEquipmentService {
    pub id: i32,
    #[serde(rename = "type")]
    pub service_type: String,
    pub status: String,
    #[serde(with = "dates::date")]
    pub scheduled_start: NaiveDate,
    #[serde(with = "dates::date")]
    pub scheduled_end: NaiveDate,
}

/// Equipment currently delivered to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEquipmentItem {
    pub assignment_id: i32,
    pub equipment_id: i32,
    pub equipment_name: String,
    pub serial_code: Option<String>,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub status: String,
    #[serde(with = "dates::date")]
    pub delivery_date: NaiveDate,
    #[serde(default, with = "dates::option_date")]
    pub pickup_date: Option<NaiveDate>,
    pub next_service: Option<ProjectEquipmentService>,
}

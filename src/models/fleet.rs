//! Fleet events: assignments, service windows and movements

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates;
use super::enums::{ServiceStatus, ServiceType};

/// Equipment committed to a project for a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i32,
    pub equipment_id: i32,
    pub project_id: i32,
    #[serde(with = "dates::date")]
    pub start_date: NaiveDate,
    /// Open-ended when absent
    #[serde(default, with = "dates::option_date")]
    pub end_date: Option<NaiveDate>,
}

/// Scheduled maintenance, inspection or repair window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWindow {
    pub id: i32,
    pub equipment_id: i32,
    #[serde(with = "dates::date")]
    pub scheduled_start: NaiveDate,
    #[serde(with = "dates::date")]
    pub scheduled_end: NaiveDate,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default)]
    pub status: Option<ServiceStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Relocation of equipment; blocks other usage from its start date onward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: i32,
    pub equipment_id: i32,
    #[serde(with = "dates::date")]
    pub start_date: NaiveDate,
    #[serde(default)]
    pub from_project_id: Option<i32>,
    #[serde(default)]
    pub to_project_id: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload of `GET /equipment/events/fleet`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetEvents {
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub services: Vec<ServiceWindow>,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

/// Create assignment request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignment {
    pub project_id: i32,
    #[serde(with = "dates::date")]
    pub start_date: NaiveDate,
    #[serde(with = "dates::option_date")]
    pub end_date: Option<NaiveDate>,
    pub auto_resolve: bool,
}

/// Create service window request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateService {
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(with = "dates::date")]
    pub scheduled_start: NaiveDate,
    #[serde(with = "dates::date")]
    pub scheduled_end: NaiveDate,
    pub notes: Option<String>,
    pub auto_resolve: bool,
}

/// Create movement request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovement {
    #[serde(with = "dates::date")]
    pub start_date: NaiveDate,
    pub from_project_id: Option<i32>,
    pub to_project_id: i32,
    pub notes: Option<String>,
    pub auto_resolve: bool,
}

/// Shrink an existing assignment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentEnd {
    #[serde(with = "dates::date")]
    pub end_date: NaiveDate,
}

//! Fleet event endpoints (assignments, services, movements)

use chrono::NaiveDate;

use super::Repository;
use crate::{
    error::AppResult,
    models::fleet::{CreateAssignment, CreateMovement, CreateService, FleetEvents, UpdateAssignmentEnd},
};

impl Repository {
    /// All assignments, services and movements of the fleet
    pub async fn fleet_events_list(&self) -> AppResult<FleetEvents> {
        self.fetch(self.get("/equipment/events/fleet"), "fetch fleet events")
            .await
    }

    pub async fn fleet_create_assignment(&self, equipment_id: i32, data: &CreateAssignment) -> AppResult<()> {
        self.execute(
            self.post(&format!("/equipment/{}/assignments", equipment_id)).json(data),
            "create assignment",
        )
        .await
    }

    pub async fn fleet_create_service(&self, equipment_id: i32, data: &CreateService) -> AppResult<()> {
        self.execute(
            self.post(&format!("/equipment/{}/services", equipment_id)).json(data),
            "schedule service",
        )
        .await
    }

    pub async fn fleet_create_movement(&self, equipment_id: i32, data: &CreateMovement) -> AppResult<()> {
        self.execute(
            self.post(&format!("/equipment/{}/movements", equipment_id)).json(data),
            "schedule movement",
        )
        .await
    }

    /// Move the end date of an existing assignment
    pub async fn fleet_update_assignment_end(
        &self,
        equipment_id: i32,
        assignment_id: i32,
        end_date: NaiveDate,
    ) -> AppResult<()> {
        self.execute(
            self.put(&format!("/equipment/{}/assignments/{}", equipment_id, assignment_id))
                .json(&UpdateAssignmentEnd { end_date }),
            "update assignment",
        )
        .await
    }
}

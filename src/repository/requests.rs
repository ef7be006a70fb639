//! Equipment request endpoints

use super::Repository;
use crate::{
    error::AppResult,
    models::request::{Approval, EquipmentRequest, RejectRequest},
};

impl Repository {
    pub async fn requests_list(&self) -> AppResult<Vec<EquipmentRequest>> {
        self.fetch(self.get("/equipment/requests"), "fetch requests").await
    }

    pub async fn requests_approve(&self, id: i32, approval: &Approval) -> AppResult<()> {
        self.execute(
            self.post(&format!("/equipment/requests/{}/approve", id)).json(approval),
            "approve request",
        )
        .await
    }

    pub async fn requests_reject(&self, id: i32, decision_note: &str) -> AppResult<()> {
        let body = RejectRequest {
            decision_note: decision_note.to_string(),
        };
        self.execute(
            self.post(&format!("/equipment/requests/{}/reject", id)).json(&body),
            "reject request",
        )
        .await
    }
}

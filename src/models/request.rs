//! Equipment requests submitted from the field

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::dates;
use super::enums::{EquipmentType, RequestStatus, RequestType};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i32,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserRef {
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| format!("User #{}", self.id))
    }
}

/// Pending ask for an assignment or a movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRequest {
    pub id: i32,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub project_id: i32,
    #[serde(default)]
    pub requested_type: Option<EquipmentType>,
    #[serde(default)]
    pub equipment_id: Option<i32>,
    #[serde(with = "dates::date")]
    pub start_date: NaiveDate,
    #[serde(default, with = "dates::option_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub from_project_id: Option<i32>,
    #[serde(default)]
    pub to_project_id: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub requested_by: Option<UserRef>,
    #[serde(default)]
    pub decided_by: Option<UserRef>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub decision_note: Option<String>,
    #[serde(default)]
    pub assignment_id: Option<i32>,
}

impl EquipmentRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Approval body for an assignment request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAssignment {
    pub equipment_id: i32,
    #[serde(with = "dates::date")]
    pub start_date: NaiveDate,
    #[serde(with = "dates::date")]
    pub end_date: NaiveDate,
    pub decision_note: Option<String>,
    pub auto_resolve: bool,
}

/// Approval body for a movement request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveMovement {
    pub equipment_id: i32,
    #[serde(with = "dates::date")]
    pub start_date: NaiveDate,
    pub from_project_id: Option<i32>,
    pub to_project_id: i32,
    pub decision_note: Option<String>,
    pub auto_resolve: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Approval {
    Assignment(ApproveAssignment),
    Movement(ApproveMovement),
}

impl Approval {
    pub fn equipment_id(&self) -> i32 {
        match self {
            Approval::Assignment(a) => a.equipment_id,
            Approval::Movement(m) => m.equipment_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub decision_note: String,
}

/// Coordinator's edits while reviewing a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewDraft {
    pub equipment_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub from_project_id: Option<i32>,
    pub to_project_id: Option<i32>,
    pub decision_note: String,
    pub auto_resolve: bool,
}

impl ReviewDraft {
    /// Prefill the review form from the submitted request
    pub fn from_request(request: &EquipmentRequest, auto_resolve: bool) -> Self {
        Self {
            equipment_id: request.equipment_id,
            start_date: Some(request.start_date),
            end_date: request.end_date,
            from_project_id: request.from_project_id,
            to_project_id: request.to_project_id,
            decision_note: request.decision_note.clone().unwrap_or_default(),
            auto_resolve,
        }
    }

    fn note(&self) -> Option<String> {
        let note = self.decision_note.trim();
        (!note.is_empty()).then(|| note.to_string())
    }

    /// Turn the draft into an approval body for a request of the given kind
    pub fn into_approval(&self, kind: RequestType) -> AppResult<Approval> {
        let start_date = self
            .start_date
            .ok_or_else(|| AppError::Validation("Select start date".to_string()))?;
        let equipment_id = self
            .equipment_id
            .ok_or_else(|| AppError::Validation("Select equipment to approve".to_string()))?;

        match kind {
            RequestType::Assignment => {
                let end_date = self
                    .end_date
                    .ok_or_else(|| AppError::Validation("Select end date".to_string()))?;
                if end_date < start_date {
                    return Err(AppError::Validation(
                        "End date must be after start date".to_string(),
                    ));
                }
                Ok(Approval::Assignment(ApproveAssignment {
                    equipment_id,
                    start_date,
                    end_date,
                    decision_note: self.note(),
                    auto_resolve: self.auto_resolve,
                }))
            }
            RequestType::Movement => {
                let to_project_id = self
                    .to_project_id
                    .ok_or_else(|| AppError::Validation("Select destination project".to_string()))?;
                Ok(Approval::Movement(ApproveMovement {
                    equipment_id,
                    start_date,
                    from_project_id: self.from_project_id,
                    to_project_id,
                    decision_note: self.note(),
                    auto_resolve: self.auto_resolve,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_assignment_draft_requires_end() {
        let draft = ReviewDraft {
            equipment_id: Some(3),
            start_date: Some(day(2024, 3, 1)),
            ..Default::default()
        };
        assert!(matches!(
            draft.into_approval(RequestType::Assignment),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_assignment_draft_rejects_inverted_range() {
        let draft = ReviewDraft {
            equipment_id: Some(3),
            start_date: Some(day(2024, 3, 10)),
            end_date: Some(day(2024, 3, 1)),
            ..Default::default()
        };
        assert!(draft.into_approval(RequestType::Assignment).is_err());
    }

    #[test]
    fn test_movement_draft() {
        let draft = ReviewDraft {
            equipment_id: Some(3),
            start_date: Some(day(2024, 3, 10)),
            to_project_id: Some(9),
            decision_note: "  ".to_string(),
            auto_resolve: true,
            ..Default::default()
        };
        let approval = draft.into_approval(RequestType::Movement).unwrap();
        let body = serde_json::to_value(&approval).unwrap();
        assert_eq!(body["toProjectId"], 9);
        assert_eq!(body["fromProjectId"], serde_json::Value::Null);
        assert_eq!(body["decisionNote"], serde_json::Value::Null);
        assert_eq!(body["startDate"], "2024-03-10");
    }

    #[test]
    fn test_missing_equipment() {
        let draft = ReviewDraft {
            start_date: Some(day(2024, 3, 10)),
            to_project_id: Some(9),
            ..Default::default()
        };
        assert!(draft.into_approval(RequestType::Movement).is_err());
    }
}

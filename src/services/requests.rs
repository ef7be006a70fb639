//! Review of equipment requests

use std::cmp::Reverse;

use chrono::NaiveDate;

use super::cache::{FleetCache, Refresh};
use crate::{
    availability::{check_proposal, ConflictReport, Proposal, Timeline},
    config::FleetConfig,
    error::{AppError, AppResult},
    models::request::{Approval, EquipmentRequest, ReviewDraft},
};

#[derive(Clone)]
pub struct RequestsService {
    cache: FleetCache,
    config: FleetConfig,
}

impl RequestsService {
    pub fn new(cache: FleetCache, config: FleetConfig) -> Self {
        Self { cache, config }
    }

    /// Pending requests, earliest start first
    pub async fn pending(&self) -> AppResult<Vec<EquipmentRequest>> {
        self.cache.ensure_loaded().await?;
        let mut pending: Vec<EquipmentRequest> = self
            .cache
            .read()
            .await
            .requests
            .iter()
            .filter(|r| r.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.start_date);
        Ok(pending)
    }

    /// Decided requests, most recent decision first
    pub async fn history(&self) -> AppResult<Vec<EquipmentRequest>> {
        self.cache.ensure_loaded().await?;
        let mut decided: Vec<EquipmentRequest> = self
            .cache
            .read()
            .await
            .requests
            .iter()
            .filter(|r| !r.is_pending())
            .cloned()
            .collect();
        // Undated decisions sort last
        decided.sort_by_key(|r| (r.decided_at.is_none(), Reverse(r.decided_at)));
        Ok(decided)
    }

    pub async fn get(&self, id: i32) -> AppResult<EquipmentRequest> {
        self.cache.ensure_loaded().await?;
        self.cache
            .read()
            .await
            .request_by_id(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))
    }

    pub async fn review_draft(&self, id: i32) -> AppResult<ReviewDraft> {
        let request = self.get(id).await?;
        Ok(ReviewDraft::from_request(&request, self.config.auto_resolve))
    }

    /// Conflicts the approval would create on the chosen equipment
    pub async fn preview(&self, id: i32, draft: &ReviewDraft, today: NaiveDate) -> AppResult<ConflictReport> {
        let request = self.get(id).await?;
        let approval = draft.into_approval(request.request_type)?;
        Ok(self.report_for(&approval, today).await)
    }

    async fn report_for(&self, approval: &Approval, today: NaiveDate) -> ConflictReport {
        let proposal = match approval {
            Approval::Assignment(a) => Proposal::Assignment {
                start: a.start_date,
                end: Some(a.end_date),
            },
            Approval::Movement(m) => Proposal::Movement {
                start: m.start_date,
                from_project_id: m.from_project_id,
            },
        };
        let snapshot = self.cache.read().await;
        let timeline = Timeline::new(&snapshot.events, approval.equipment_id(), today)
            .with_horizon(self.config.open_end_horizon_days);
        check_proposal(&timeline, proposal, approval_auto_resolve(approval))
    }

    /// Approve a pending request. Conflicts are reported but the backend has
    /// the final word on them.
    pub async fn approve(&self, id: i32, draft: &ReviewDraft, today: NaiveDate) -> AppResult<ConflictReport> {
        let request = self.get(id).await?;
        if !request.is_pending() {
            return Err(AppError::InvalidState(format!(
                "Request {} is already {}",
                id, request.status
            )));
        }

        let approval = draft.into_approval(request.request_type)?;
        let report = self.report_for(&approval, today).await;
        if let Some(conflict) = &report.blocking {
            tracing::warn!("Approving request {} despite conflict: {}", id, conflict);
        }
        for warning in &report.warnings {
            tracing::warn!("Request {}: {}", id, warning);
        }

        self.cache.backend().approve_request(id, &approval).await?;
        tracing::info!(
            "Request {} approved on equipment {}",
            id,
            approval.equipment_id()
        );

        self.cache.refresh_after_write(Refresh::DECISIONS).await;
        Ok(report)
    }

    /// Reject a pending request; a note is mandatory
    pub async fn reject(&self, id: i32, decision_note: &str) -> AppResult<()> {
        let note = decision_note.trim();
        if note.is_empty() {
            return Err(AppError::Validation(
                "Add a note before rejecting".to_string(),
            ));
        }

        let request = self.get(id).await?;
        if !request.is_pending() {
            return Err(AppError::InvalidState(format!(
                "Request {} is already {}",
                id, request.status
            )));
        }

        self.cache.backend().reject_request(id, note).await?;
        tracing::info!("Request {} rejected", id);
        self.cache.refresh_after_write(Refresh::REQUESTS).await;
        Ok(())
    }
}

fn approval_auto_resolve(approval: &Approval) -> bool {
    match approval {
        Approval::Assignment(a) => a.auto_resolve,
        Approval::Movement(m) => m.auto_resolve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        fleet::{FleetEvents, Movement},
        RequestStatus, RequestType,
    };
    use crate::repository::MockFleetBackend;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(id: i32, kind: RequestType, status: RequestStatus, start: NaiveDate) -> EquipmentRequest {
        EquipmentRequest {
            id,
            request_type: kind,
            status,
            project_id: 3,
            requested_type: None,
            equipment_id: Some(7),
            start_date: start,
            end_date: Some(shift(start, 5)),
            from_project_id: None,
            to_project_id: Some(4),
            notes: None,
            requested_by: None,
            decided_by: None,
            decided_at: None,
            decision_note: None,
            assignment_id: None,
        }
    }

    fn shift(d: NaiveDate, days: i64) -> NaiveDate {
        d + chrono::Duration::days(days)
    }

    fn requests() -> Vec<EquipmentRequest> {
        let mut approved = request(3, RequestType::Assignment, RequestStatus::Approved, day(2024, 1, 1));
        approved.decided_at = Some(Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap());
        let mut rejected = request(4, RequestType::Movement, RequestStatus::Rejected, day(2024, 1, 1));
        rejected.decided_at = Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap());
        let cancelled = request(5, RequestType::Assignment, RequestStatus::Cancelled, day(2024, 1, 1));
        vec![
            request(1, RequestType::Assignment, RequestStatus::Pending, day(2024, 3, 1)),
            request(2, RequestType::Movement, RequestStatus::Pending, day(2024, 2, 1)),
            approved,
            cancelled,
            rejected,
        ]
    }

    fn backend(request_fetches: usize) -> MockFleetBackend {
        let mut backend = MockFleetBackend::new();
        backend.expect_list_projects().times(1).returning(|| Ok(vec![]));
        backend.expect_list_equipment().returning(|| Ok(vec![]));
        backend.expect_fleet_events().returning(|| {
            Ok(FleetEvents {
                assignments: vec![],
                services: vec![],
                movements: vec![Movement {
                    id: 1,
                    equipment_id: 7,
                    start_date: day(2024, 3, 3),
                    from_project_id: None,
                    to_project_id: Some(2),
                    notes: None,
                }],
            })
        });
        backend
            .expect_list_requests()
            .times(request_fetches)
            .returning(|| Ok(requests()));
        backend
    }

    fn service(backend: MockFleetBackend) -> RequestsService {
        RequestsService::new(FleetCache::new(Arc::new(backend)), FleetConfig::default())
    }

    #[tokio::test]
    async fn test_pending_and_history_ordering() {
        let requests = service(backend(1));
        let pending: Vec<i32> = requests.pending().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(pending, vec![2, 1]);

        let history: Vec<i32> = requests.history().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(history, vec![4, 3, 5]);
    }

    #[tokio::test]
    async fn test_reject_requires_note() {
        let mut backend = MockFleetBackend::new();
        backend.expect_reject_request().never();
        let requests = service(backend);
        let err = requests.reject(1, "   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reject_trims_note_and_refreshes() {
        let mut backend = backend(2);
        backend
            .expect_reject_request()
            .withf(|id, note| *id == 1 && note.to_string() == "No lifts left")
            .times(1)
            .returning(|_, _| Ok(()));
        let requests = service(backend);
        requests.reject(1, "  No lifts left ").await.unwrap();
    }

    #[tokio::test]
    async fn test_decided_request_cannot_be_approved() {
        let mut backend = backend(1);
        backend.expect_approve_request().never();
        let requests = service(backend);
        let draft = requests.review_draft(3).await.unwrap();
        let err = requests.approve(3, &draft, day(2024, 1, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_approve_reports_movement_conflict_without_blocking() {
        let mut backend = backend(2);
        backend
            .expect_approve_request()
            .withf(|id, approval| {
                *id == 1 && matches!(approval, Approval::Assignment(a) if a.equipment_id == 7)
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let requests = service(backend);

        let draft = requests.review_draft(1).await.unwrap();
        assert!(draft.auto_resolve);
        let report = requests.approve(1, &draft, day(2024, 2, 15)).await.unwrap();
        assert!(report.is_blocked());
    }

    #[tokio::test]
    async fn test_unknown_request_is_not_found() {
        let requests = service(backend(1));
        assert!(matches!(requests.get(99).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_approval_stands_when_refetch_fails() {
        let mut backend = MockFleetBackend::new();
        let fetches = Arc::new(AtomicUsize::new(0));
        backend.expect_list_projects().times(1).returning(|| Ok(vec![]));
        backend.expect_list_equipment().returning(|| Ok(vec![]));
        backend.expect_fleet_events().returning(|| Ok(FleetEvents::default()));
        backend.expect_list_requests().times(2).returning(move || {
            if fetches.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(requests())
            } else {
                Err(AppError::Api { status: 502, message: "bad gateway".to_string() })
            }
        });
        backend.expect_approve_request().times(1).returning(|_, _| Ok(()));
        let requests = service(backend);

        let draft = requests.review_draft(2).await.unwrap();
        let report = requests.approve(2, &draft, day(2024, 1, 15)).await.unwrap();
        assert!(!report.is_blocked());
        // The stale snapshot is kept
        assert_eq!(requests.pending().await.unwrap().len(), 2);
    }
}

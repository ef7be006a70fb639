//! Equipment fleet service: derived state, scheduling and auto-resolve

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use validator::Validate;

use super::cache::{FleetCache, FleetSnapshot, Refresh};
use crate::{
    availability::{
        self,
        calendar::{self, CalendarLayers, MonthCalendar},
        check_proposal, ConflictReport, OverviewFilter, Proposal, Timeline, Truncation,
    },
    config::FleetConfig,
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, UpdateEquipment},
        fleet::{CreateAssignment, CreateMovement, CreateService},
        EquipmentState, ServiceType,
    },
};

/// Assignment form
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub project_id: Option<i32>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub auto_resolve: bool,
}

/// Service window form
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub service_type: ServiceType,
    pub start_date: NaiveDate,
    /// Defaults to the configured service duration
    pub end_date: Option<NaiveDate>,
    pub notes: String,
    pub auto_resolve: bool,
}

/// Movement form
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovement {
    pub start_date: NaiveDate,
    pub from_project_id: Option<i32>,
    pub to_project_id: Option<i32>,
    pub notes: String,
    pub auto_resolve: bool,
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Clone)]
pub struct FleetService {
    cache: FleetCache,
    config: FleetConfig,
}

impl FleetService {
    pub fn new(cache: FleetCache, config: FleetConfig) -> Self {
        Self { cache, config }
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub async fn refresh(&self) -> AppResult<()> {
        self.cache.refresh(Refresh::ALL).await
    }

    /// Copy of the cached collections, loading them on first use
    pub async fn snapshot(&self) -> AppResult<FleetSnapshot> {
        self.cache.ensure_loaded().await?;
        Ok(self.cache.read().await.clone())
    }

    fn timeline<'a>(&self, snapshot: &'a FleetSnapshot, equipment_id: i32, today: NaiveDate) -> Timeline<'a> {
        Timeline::new(&snapshot.events, equipment_id, today)
            .with_horizon(self.config.open_end_horizon_days)
    }

    pub async fn state_of(&self, equipment_id: i32, today: NaiveDate) -> AppResult<EquipmentState> {
        self.cache.ensure_loaded().await?;
        let snapshot = self.cache.read().await;
        Ok(self.timeline(&snapshot, equipment_id, today).state())
    }

    /// Conflicts a proposal would raise, without submitting anything
    pub async fn preview(
        &self,
        equipment_id: i32,
        proposal: Proposal,
        auto_resolve: bool,
        today: NaiveDate,
    ) -> AppResult<ConflictReport> {
        self.cache.ensure_loaded().await?;
        let snapshot = self.cache.read().await;
        Ok(check_proposal(
            &self.timeline(&snapshot, equipment_id, today),
            proposal,
            auto_resolve,
        ))
    }

    /// Per-state counts over the type and search filters
    pub async fn overview_counts(
        &self,
        filter: &OverviewFilter,
        today: NaiveDate,
    ) -> AppResult<HashMap<EquipmentState, usize>> {
        self.cache.ensure_loaded().await?;
        let snapshot = self.cache.read().await;
        let overview = availability::build_overview(
            &snapshot.equipment,
            &snapshot.events,
            &snapshot.projects,
            today,
            self.config.open_end_horizon_days,
            filter,
        );
        Ok(overview.counts())
    }

    /// Month calendar of the equipment passing the type and search filters
    pub async fn month_calendar(
        &self,
        month: NaiveDate,
        today: NaiveDate,
        filter: &OverviewFilter,
        layers: CalendarLayers,
    ) -> AppResult<MonthCalendar> {
        self.cache.ensure_loaded().await?;
        let snapshot = self.cache.read().await;
        let horizon_days = self.config.open_end_horizon_days;
        let shown: Vec<Equipment> = availability::build_overview(
            &snapshot.equipment,
            &snapshot.events,
            &snapshot.projects,
            today,
            horizon_days,
            filter,
        )
        .rows
        .iter()
        .map(|row| row.equipment.clone())
        .collect();

        Ok(calendar::month_calendar(
            month,
            today,
            &shown,
            &snapshot.events,
            &snapshot.projects,
            horizon_days,
            layers,
        ))
    }

    // ---- Form defaults ----

    pub fn default_assignment(&self, today: NaiveDate) -> NewAssignment {
        NewAssignment {
            project_id: None,
            start_date: today,
            end_date: None,
            auto_resolve: self.config.auto_resolve,
        }
    }

    pub fn default_service(&self, today: NaiveDate) -> NewService {
        NewService {
            service_type: ServiceType::Routine,
            start_date: availability::shift_days(today, self.config.service_lead_days),
            end_date: None,
            notes: String::new(),
            auto_resolve: self.config.auto_resolve,
        }
    }

    /// Movement form prefilled with the project the equipment currently sits on
    pub async fn default_movement(&self, equipment_id: i32, today: NaiveDate) -> AppResult<NewMovement> {
        self.cache.ensure_loaded().await?;
        let snapshot = self.cache.read().await;
        let current = self.timeline(&snapshot, equipment_id, today).current_assignment();
        Ok(NewMovement {
            start_date: availability::shift_days(today, self.config.movement_lead_days),
            from_project_id: current.map(|a| a.project_id),
            to_project_id: None,
            notes: String::new(),
            auto_resolve: self.config.auto_resolve,
        })
    }

    // ---- Equipment CRUD ----

    pub async fn create_equipment(&self, data: CreateEquipment) -> AppResult<()> {
        data.validate()?;
        let data = data.normalized();
        self.cache.backend().create_equipment(&data).await?;
        tracing::info!("Equipment created: {}", data.name);
        self.cache.refresh_after_write(Refresh::FLEET).await;
        Ok(())
    }

    pub async fn update_equipment(&self, id: i32, data: UpdateEquipment) -> AppResult<()> {
        data.validate()?;
        let data = data.normalized();
        self.cache.backend().update_equipment(id, &data).await?;
        tracing::info!("Equipment {} updated", id);
        self.cache.refresh_after_write(Refresh::FLEET).await;
        Ok(())
    }

    pub async fn delete_equipment(&self, id: i32) -> AppResult<()> {
        self.cache.backend().delete_equipment(id).await?;
        tracing::info!("Equipment {} deleted", id);
        self.cache.refresh_after_write(Refresh::FLEET).await;
        Ok(())
    }

    // ---- Scheduling ----

    /// Assign equipment to a project.
    ///
    /// Fails when a movement starts before the assignment ends. With
    /// auto-resolve on, the end date is pulled in before the next service.
    pub async fn assign(&self, equipment_id: i32, form: NewAssignment, today: NaiveDate) -> AppResult<ConflictReport> {
        let project_id = form
            .project_id
            .ok_or_else(|| AppError::Validation("Select a project".to_string()))?;
        if form.end_date.is_some_and(|end| end < form.start_date) {
            return Err(AppError::Validation(
                "End date must be after start date".to_string(),
            ));
        }

        let proposal = Proposal::Assignment {
            start: form.start_date,
            end: form.end_date,
        };
        let report = self
            .preview(equipment_id, proposal, form.auto_resolve, today)
            .await?
            .into_result(&proposal)?;
        self.log_warnings(equipment_id, &report);

        let data = CreateAssignment {
            project_id,
            start_date: form.start_date,
            end_date: report.end_date,
            auto_resolve: form.auto_resolve,
        };
        self.cache.backend().create_assignment(equipment_id, &data).await?;
        tracing::info!(
            "Equipment {} assigned to project {} from {}",
            equipment_id,
            project_id,
            form.start_date
        );

        self.cache.refresh_after_write(Refresh::FLEET).await;
        Ok(report)
    }

    /// Schedule a service window.
    ///
    /// Fails when the equipment is moving by the end of the window. With
    /// auto-resolve on, assignments running at the window start are ended the
    /// day before.
    pub async fn schedule_service(&self, equipment_id: i32, form: NewService, today: NaiveDate) -> AppResult<ConflictReport> {
        let end_date = form.end_date.unwrap_or_else(|| {
            availability::shift_days(form.start_date, self.config.service_duration_days)
        });
        if end_date < form.start_date {
            return Err(AppError::Validation(
                "End date must be after start date".to_string(),
            ));
        }

        let proposal = Proposal::Service {
            start: form.start_date,
            end: end_date,
        };
        let report = self
            .preview(equipment_id, proposal, form.auto_resolve, today)
            .await?
            .into_result(&proposal)?;
        self.log_warnings(equipment_id, &report);

        let data = CreateService {
            service_type: form.service_type,
            scheduled_start: form.start_date,
            scheduled_end: end_date,
            notes: optional_text(&form.notes),
            auto_resolve: form.auto_resolve,
        };
        self.submit_with_truncations(&report.truncations, async {
            self.cache.backend().create_service(equipment_id, &data).await
        })
        .await?;
        tracing::info!(
            "Service {} scheduled for equipment {} ({} - {})",
            form.service_type,
            equipment_id,
            form.start_date,
            end_date
        );
        Ok(report)
    }

    /// Schedule a movement. Never blocked; moving away from the current
    /// project ends that assignment the day before when auto-resolve is on.
    pub async fn schedule_movement(&self, equipment_id: i32, form: NewMovement, today: NaiveDate) -> AppResult<ConflictReport> {
        let to_project_id = form
            .to_project_id
            .ok_or_else(|| AppError::Validation("Select destination project".to_string()))?;
        if form.from_project_id == Some(to_project_id) {
            return Err(AppError::Validation(
                "Destination must differ from origin project".to_string(),
            ));
        }

        let proposal = Proposal::Movement {
            start: form.start_date,
            from_project_id: form.from_project_id,
        };
        let report = self
            .preview(equipment_id, proposal, form.auto_resolve, today)
            .await?
            .into_result(&proposal)?;
        self.log_warnings(equipment_id, &report);

        let data = CreateMovement {
            start_date: form.start_date,
            from_project_id: form.from_project_id,
            to_project_id,
            notes: optional_text(&form.notes),
            auto_resolve: form.auto_resolve,
        };
        self.submit_with_truncations(&report.truncations, async {
            self.cache.backend().create_movement(equipment_id, &data).await
        })
        .await?;
        tracing::info!(
            "Movement of equipment {} to project {} scheduled for {}",
            equipment_id,
            to_project_id,
            form.start_date
        );
        Ok(report)
    }

    /// Shrink the conflicting assignments, then create the new event.
    ///
    /// The cache is refetched whenever anything reached the backend, even if a
    /// later call failed.
    async fn submit_with_truncations(
        &self,
        truncations: &[Truncation],
        create: impl std::future::Future<Output = AppResult<()>>,
    ) -> AppResult<()> {
        let mut mutated = false;
        let result = async {
            for t in truncations {
                self.cache
                    .backend()
                    .update_assignment_end(t.equipment_id, t.assignment_id, t.new_end)
                    .await?;
                mutated = true;
                tracing::info!(
                    "Assignment {} end moved from {:?} to {}",
                    t.assignment_id,
                    t.previous_end,
                    t.new_end
                );
            }
            create.await?;
            mutated = true;
            Ok::<(), AppError>(())
        }
        .await;

        if mutated {
            self.cache.refresh_after_write(Refresh::FLEET).await;
        }
        result
    }

    fn log_warnings(&self, equipment_id: i32, report: &ConflictReport) {
        for warning in &report.warnings {
            tracing::warn!("Equipment {}: {}", equipment_id, warning);
        }
    }
}

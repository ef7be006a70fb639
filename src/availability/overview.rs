//! Fleet overview: one derived row per equipment, with filters and counts

use std::collections::HashMap;

use chrono::NaiveDate;

use super::Timeline;
use crate::models::{
    equipment::Equipment,
    fleet::{Assignment, FleetEvents, ServiceWindow},
    project::ProjectShort,
    EquipmentState, EquipmentType,
};

#[derive(Debug, Clone)]
pub struct FleetRow<'a> {
    pub equipment: &'a Equipment,
    pub state: EquipmentState,
    pub assignment: Option<&'a Assignment>,
    pub assignment_project: Option<&'a ProjectShort>,
    pub next_service: Option<&'a ServiceWindow>,
}

#[derive(Debug, Clone, Default)]
pub struct OverviewFilter {
    pub equipment_type: Option<EquipmentType>,
    /// Case-insensitive match on name, serial code or current project name
    pub search: String,
    pub state: Option<EquipmentState>,
}

#[derive(Debug, Clone)]
pub struct FleetOverview<'a> {
    /// Rows matching the type and search filters
    pub rows: Vec<FleetRow<'a>>,
    state_filter: Option<EquipmentState>,
}

impl<'a> FleetOverview<'a> {
    /// Rows also matching the state filter
    pub fn visible(&self) -> impl Iterator<Item = &FleetRow<'a>> {
        self.rows
            .iter()
            .filter(move |r| self.state_filter.map_or(true, |s| r.state == s))
    }

    /// Per-state counts over the type/search-filtered rows
    pub fn counts(&self) -> HashMap<EquipmentState, usize> {
        let mut counts: HashMap<EquipmentState, usize> =
            EquipmentState::ALL.iter().map(|s| (*s, 0)).collect();
        for row in &self.rows {
            *counts.entry(row.state).or_default() += 1;
        }
        counts
    }
}

pub fn build_overview<'a>(
    fleet: &'a [Equipment],
    events: &'a FleetEvents,
    projects: &'a [ProjectShort],
    today: NaiveDate,
    horizon_days: i64,
    filter: &OverviewFilter,
) -> FleetOverview<'a> {
    let projects_by_id: HashMap<i32, &ProjectShort> = projects.iter().map(|p| (p.id, p)).collect();
    let term = filter.search.trim().to_lowercase();

    let rows = fleet
        .iter()
        .map(|equipment| {
            let timeline = Timeline::new(events, equipment.id, today).with_horizon(horizon_days);
            let assignment = timeline.current_assignment();
            FleetRow {
                equipment,
                state: timeline.state(),
                assignment,
                assignment_project: assignment
                    .and_then(|a| projects_by_id.get(&a.project_id).copied()),
                next_service: timeline.next_service(),
            }
        })
        .filter(|row| {
            filter
                .equipment_type
                .map_or(true, |t| row.equipment.equipment_type == t)
        })
        .filter(|row| term.is_empty() || matches_search(row, &term))
        .collect();

    FleetOverview {
        rows,
        state_filter: filter.state,
    }
}

fn matches_search(row: &FleetRow<'_>, term: &str) -> bool {
    let project_name = row.assignment_project.map(|p| p.name.as_str()).unwrap_or("");
    row.equipment.name.to_lowercase().contains(term)
        || row
            .equipment
            .serial_code
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(term)
        || project_name.to_lowercase().contains(term)
}

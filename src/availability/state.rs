//! Derivation of the single current state of a piece of equipment

use chrono::NaiveDate;

use super::{open_end, DateRange, OPEN_END_HORIZON_DAYS};
use crate::models::{
    fleet::{Assignment, FleetEvents, Movement, ServiceWindow},
    EquipmentState,
};

/// Events of one equipment, seen from a given day
#[derive(Debug, Clone)]
pub struct Timeline<'a> {
    pub equipment_id: i32,
    pub today: NaiveDate,
    open_end: NaiveDate,
    assignments: Vec<&'a Assignment>,
    services: Vec<&'a ServiceWindow>,
    movements: Vec<&'a Movement>,
}

impl<'a> Timeline<'a> {
    pub fn new(events: &'a FleetEvents, equipment_id: i32, today: NaiveDate) -> Self {
        Self {
            equipment_id,
            today,
            open_end: open_end(today, OPEN_END_HORIZON_DAYS),
            assignments: events
                .assignments
                .iter()
                .filter(|a| a.equipment_id == equipment_id)
                .collect(),
            services: events
                .services
                .iter()
                .filter(|s| s.equipment_id == equipment_id)
                .collect(),
            movements: events
                .movements
                .iter()
                .filter(|m| m.equipment_id == equipment_id)
                .collect(),
        }
    }

    pub fn with_horizon(mut self, horizon_days: i64) -> Self {
        self.open_end = open_end(self.today, horizon_days);
        self
    }

    pub fn open_end(&self) -> NaiveDate {
        self.open_end
    }

    pub fn assignments(&self) -> &[&'a Assignment] {
        &self.assignments
    }

    pub fn services(&self) -> &[&'a ServiceWindow] {
        &self.services
    }

    pub fn movements(&self) -> &[&'a Movement] {
        &self.movements
    }

    /// Range covered by an assignment; open-ended ones run to the horizon
    pub fn assignment_range(&self, assignment: &Assignment) -> DateRange {
        DateRange::new(
            assignment.start_date,
            assignment.end_date.unwrap_or(self.open_end),
        )
    }

    pub fn service_range(service: &ServiceWindow) -> DateRange {
        DateRange::new(service.scheduled_start, service.scheduled_end)
    }

    /// Most recent movement that has already started
    pub fn active_movement(&self) -> Option<&'a Movement> {
        latest_by(
            self.movements.iter().copied().filter(|m| m.start_date <= self.today),
            |m| m.start_date,
        )
    }

    /// Earliest movement still to come
    pub fn next_movement(&self) -> Option<&'a Movement> {
        earliest_by(
            self.movements.iter().copied().filter(|m| m.start_date > self.today),
            |m| m.start_date,
        )
    }

    /// Assignment covering today, the most recently started one if several do
    pub fn current_assignment(&self) -> Option<&'a Assignment> {
        latest_by(
            self.assignments
                .iter()
                .copied()
                .filter(|a| self.assignment_range(a).contains(self.today)),
            |a| a.start_date,
        )
    }

    pub fn active_service(&self) -> Option<&'a ServiceWindow> {
        self.services
            .iter()
            .copied()
            .find(|s| Self::service_range(s).contains(self.today))
    }

    /// Earliest-starting service that has not ended yet
    pub fn next_service(&self) -> Option<&'a ServiceWindow> {
        earliest_by(
            self.services.iter().copied().filter(|s| s.scheduled_end >= self.today),
            |s| s.scheduled_start,
        )
    }

    /// Earliest service starting strictly after today
    pub fn upcoming_service(&self) -> Option<&'a ServiceWindow> {
        earliest_by(
            self.services.iter().copied().filter(|s| s.scheduled_start > self.today),
            |s| s.scheduled_start,
        )
    }

    /// First match wins: active movement, active service, current assignment,
    /// pending movement, scheduled service, then available.
    pub fn state(&self) -> EquipmentState {
        if self.active_movement().is_some() {
            return EquipmentState::Movement;
        }
        if self.active_service().is_some() {
            return EquipmentState::Maintenance;
        }
        if self.current_assignment().is_some() {
            return EquipmentState::Assigned;
        }
        // TODO: a movement months away still outranks an imminent service; pending product decision
        if self.next_movement().is_some() {
            return EquipmentState::Movement;
        }
        if self.upcoming_service().is_some() {
            return EquipmentState::ServiceScheduled;
        }
        EquipmentState::Available
    }
}

/// State of `equipment_id` on `today`
pub fn derive_state(events: &FleetEvents, equipment_id: i32, today: NaiveDate) -> EquipmentState {
    Timeline::new(events, equipment_id, today).state()
}

// Ties keep the first record in backend order.
fn latest_by<T, K: Ord>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Option<T> {
    items.fold(None, |best: Option<T>, item| match best {
        Some(b) if key(&b) >= key(&item) => Some(b),
        _ => Some(item),
    })
}

fn earliest_by<T, K: Ord>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Option<T> {
    items.fold(None, |best: Option<T>, item| match best {
        Some(b) if key(&b) <= key(&item) => Some(b),
        _ => Some(item),
    })
}

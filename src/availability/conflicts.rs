//! Overlap detection and auto-resolution for new fleet events
//!
//! Assignments, services and movements all go through [`check_proposal`]:
//! a movement that has started by the end of the proposed range blocks
//! assignments and services outright, and every other overlap is a warning
//! that auto-resolve settles by ending an assignment the day before the
//! conflicting window starts.

use chrono::NaiveDate;

use super::{truncate_end_before, DateRange, Timeline};
use crate::error::{AppError, AppResult};
use crate::models::{fleet::Assignment, ServiceType};

/// A fleet event about to be created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    Assignment {
        start: NaiveDate,
        end: Option<NaiveDate>,
    },
    Service {
        start: NaiveDate,
        end: NaiveDate,
    },
    Movement {
        start: NaiveDate,
        from_project_id: Option<i32>,
    },
}

impl Proposal {
    fn label(&self) -> &'static str {
        match self {
            Proposal::Assignment { .. } => "assign",
            Proposal::Service { .. } => "schedule service",
            Proposal::Movement { .. } => "schedule movement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// Equipment is (or will be) moving during the proposed range
    InMovement {
        movement_id: i32,
        start: NaiveDate,
    },
    /// Proposed range runs into a service window
    ServiceWindow {
        service_id: i32,
        service_type: ServiceType,
        range: DateRange,
    },
    /// Proposed event starts while an assignment is running
    Assignment {
        assignment_id: i32,
        project_id: i32,
        range: DateRange,
    },
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::InMovement { start, .. } => {
                write!(f, "equipment is in movement from {}", start)
            }
            Conflict::ServiceWindow { service_type, range, .. } => {
                write!(f, "conflicts with {} ({} - {})", service_type, range.start, range.end)
            }
            Conflict::Assignment { project_id, range, .. } => {
                write!(
                    f,
                    "overlaps assignment to project #{} ({} - {})",
                    project_id, range.start, range.end
                )
            }
        }
    }
}

/// End-date update of an existing assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub assignment_id: i32,
    pub equipment_id: i32,
    pub previous_end: Option<NaiveDate>,
    pub new_end: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    /// Hard error; the event must not be created
    pub blocking: Option<Conflict>,
    /// Overlaps surfaced to the user
    pub warnings: Vec<Conflict>,
    /// Updates to apply to existing assignments before creating the event
    pub truncations: Vec<Truncation>,
    /// End date to submit for the proposed event
    pub end_date: Option<NaiveDate>,
}

impl ConflictReport {
    pub fn is_blocked(&self) -> bool {
        self.blocking.is_some()
    }

    pub fn has_conflicts(&self) -> bool {
        self.blocking.is_some() || !self.warnings.is_empty()
    }
}

/// Check a proposal against the equipment timeline.
///
/// With `auto_resolve` off the warnings are still reported but no date is
/// adjusted; the overlap stands.
pub fn check_proposal(timeline: &Timeline<'_>, proposal: Proposal, auto_resolve: bool) -> ConflictReport {
    let mut report = ConflictReport::default();

    match proposal {
        Proposal::Assignment { start, end } => {
            let range = DateRange::new(start, end.unwrap_or(timeline.open_end()));
            report.blocking = blocking_movement(timeline, range.end);
            report.end_date = end;

            let service = timeline
                .services()
                .iter()
                .copied()
                .filter(|s| s.scheduled_start > timeline.today)
                .filter(|s| Timeline::service_range(s).overlaps(&range))
                .min_by_key(|s| s.scheduled_start);
            if let Some(service) = service {
                report.warnings.push(Conflict::ServiceWindow {
                    service_id: service.id,
                    service_type: service.service_type,
                    range: Timeline::service_range(service),
                });
                if auto_resolve {
                    report.end_date = Some(truncate_end_before(start, service.scheduled_start));
                }
            }

            report.warnings.extend(
                timeline
                    .assignments()
                    .iter()
                    .filter(|a| timeline.assignment_range(a).overlaps(&range))
                    .map(|a| assignment_conflict(timeline, a)),
            );
        }
        Proposal::Service { start, end } => {
            report.blocking = blocking_movement(timeline, end);
            report.end_date = Some(end);
            // Only equipment in use today is resolved against a new service
            let in_use = timeline
                .current_assignment()
                .is_some_and(|a| timeline.assignment_range(a).contains(start));
            let spanning: Vec<&Assignment> = if in_use {
                timeline
                    .assignments()
                    .iter()
                    .copied()
                    .filter(|a| timeline.assignment_range(a).contains(start))
                    .collect()
            } else {
                Vec::new()
            };
            resolve_assignments(timeline, &mut report, &spanning, start, auto_resolve);
        }
        Proposal::Movement { start, from_project_id } => {
            let current = timeline.current_assignment().filter(|a| {
                from_project_id == Some(a.project_id)
                    && timeline.assignment_range(a).contains(start)
            });
            let spanning: Vec<&Assignment> = current.into_iter().collect();
            resolve_assignments(timeline, &mut report, &spanning, start, auto_resolve);
        }
    }

    if let Some(blocking) = &report.blocking {
        tracing::debug!(
            "Equipment {}: cannot {}: {}",
            timeline.equipment_id,
            proposal.label(),
            blocking
        );
    }

    report
}

impl ConflictReport {
    /// Turn a blocking conflict into an error for the given proposal
    pub fn into_result(self, proposal: &Proposal) -> AppResult<Self> {
        match &self.blocking {
            Some(Conflict::InMovement { .. }) => Err(AppError::Conflict(format!(
                "Cannot {}: equipment is in movement",
                proposal.label()
            ))),
            Some(other) => Err(AppError::Conflict(format!(
                "Cannot {}: {}",
                proposal.label(),
                other
            ))),
            None => Ok(self),
        }
    }
}

// Movements are open-ended, so any movement starting on or before the
// proposed end overlaps the proposed range.
fn blocking_movement(timeline: &Timeline<'_>, proposed_end: NaiveDate) -> Option<Conflict> {
    timeline
        .movements()
        .iter()
        .find(|m| m.start_date <= proposed_end)
        .map(|m| Conflict::InMovement {
            movement_id: m.id,
            start: m.start_date,
        })
}

fn assignment_conflict(timeline: &Timeline<'_>, assignment: &Assignment) -> Conflict {
    Conflict::Assignment {
        assignment_id: assignment.id,
        project_id: assignment.project_id,
        range: timeline.assignment_range(assignment),
    }
}

fn resolve_assignments(
    timeline: &Timeline<'_>,
    report: &mut ConflictReport,
    spanning: &[&Assignment],
    boundary: NaiveDate,
    auto_resolve: bool,
) {
    for assignment in spanning {
        report.warnings.push(assignment_conflict(timeline, assignment));
        if auto_resolve {
            report.truncations.push(Truncation {
                assignment_id: assignment.id,
                equipment_id: assignment.equipment_id,
                previous_end: assignment.end_date,
                new_end: truncate_end_before(assignment.start_date, boundary),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fleet::{FleetEvents, Movement, ServiceWindow};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assignment(id: i32, project_id: i32, start: NaiveDate, end: Option<NaiveDate>) -> Assignment {
        Assignment { id, equipment_id: 1, project_id, start_date: start, end_date: end }
    }

    fn service(id: i32, start: NaiveDate, end: NaiveDate) -> ServiceWindow {
        ServiceWindow {
            id,
            equipment_id: 1,
            scheduled_start: start,
            scheduled_end: end,
            service_type: ServiceType::Inspection,
            status: None,
            notes: None,
        }
    }

    fn movement(id: i32, start: NaiveDate) -> Movement {
        Movement {
            id,
            equipment_id: 1,
            start_date: start,
            from_project_id: Some(3),
            to_project_id: Some(4),
            notes: None,
        }
    }

    #[test]
    fn test_service_truncates_open_assignment() {
        let events = FleetEvents {
            assignments: vec![assignment(10, 3, day(2024, 1, 1), None)],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));
        let proposal = Proposal::Service { start: day(2024, 2, 1), end: day(2024, 2, 7) };

        let report = check_proposal(&timeline, proposal, true);
        assert!(!report.is_blocked());
        assert_eq!(
            report.truncations,
            vec![Truncation {
                assignment_id: 10,
                equipment_id: 1,
                previous_end: None,
                new_end: day(2024, 1, 31),
            }]
        );
    }

    #[test]
    fn test_service_without_auto_resolve_only_warns() {
        let events = FleetEvents {
            assignments: vec![assignment(10, 3, day(2024, 1, 1), None)],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));
        let proposal = Proposal::Service { start: day(2024, 2, 1), end: day(2024, 2, 7) };

        let report = check_proposal(&timeline, proposal, false);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.truncations.is_empty());
    }

    #[test]
    fn test_truncation_never_goes_negative() {
        let events = FleetEvents {
            assignments: vec![assignment(10, 3, day(2024, 2, 1), Some(day(2024, 3, 1)))],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 2, 1));
        let proposal = Proposal::Service { start: day(2024, 2, 1), end: day(2024, 2, 7) };

        let report = check_proposal(&timeline, proposal, true);
        assert_eq!(report.truncations[0].new_end, day(2024, 2, 1));
    }

    #[test]
    fn test_service_leaves_future_assignment_alone() {
        let events = FleetEvents {
            assignments: vec![assignment(10, 3, day(2024, 2, 1), Some(day(2024, 3, 1)))],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));
        assert!(timeline.current_assignment().is_none());
        let proposal = Proposal::Service { start: day(2024, 2, 10), end: day(2024, 2, 12) };

        let report = check_proposal(&timeline, proposal, true);
        assert!(report.truncations.is_empty());
        assert!(!report.has_conflicts());
    }

    #[test]
    fn test_service_after_current_assignment_ends_is_clean() {
        let events = FleetEvents {
            assignments: vec![assignment(10, 3, day(2024, 1, 1), Some(day(2024, 1, 31)))],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));
        let proposal = Proposal::Service { start: day(2024, 2, 10), end: day(2024, 2, 12) };

        assert!(check_proposal(&timeline, proposal, true).truncations.is_empty());
    }

    #[test]
    fn test_service_blocked_by_movement() {
        let events = FleetEvents {
            movements: vec![movement(5, day(2024, 2, 5))],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));
        let proposal = Proposal::Service { start: day(2024, 2, 1), end: day(2024, 2, 7) };

        let report = check_proposal(&timeline, proposal, true);
        assert_eq!(
            report.blocking,
            Some(Conflict::InMovement { movement_id: 5, start: day(2024, 2, 5) })
        );
        let err = report.into_result(&proposal).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_assignment_blocked_by_movement_before_end() {
        let events = FleetEvents {
            movements: vec![movement(5, day(2024, 6, 1))],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));

        let open = Proposal::Assignment { start: day(2024, 2, 1), end: None };
        assert!(check_proposal(&timeline, open, true).is_blocked());

        let before = Proposal::Assignment { start: day(2024, 2, 1), end: Some(day(2024, 5, 31)) };
        assert!(!check_proposal(&timeline, before, true).is_blocked());
    }

    #[test]
    fn test_assignment_shortened_before_future_service() {
        let events = FleetEvents {
            services: vec![service(7, day(2024, 3, 1), day(2024, 3, 7))],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));
        let proposal = Proposal::Assignment { start: day(2024, 2, 1), end: None };

        let resolved = check_proposal(&timeline, proposal, true);
        assert_eq!(resolved.end_date, Some(day(2024, 2, 29)));

        let kept = check_proposal(&timeline, proposal, false);
        assert_eq!(kept.end_date, None);
        assert!(matches!(kept.warnings[0], Conflict::ServiceWindow { service_id: 7, .. }));
    }

    #[test]
    fn test_assignment_ending_before_service_is_clean() {
        let events = FleetEvents {
            services: vec![service(7, day(2024, 3, 1), day(2024, 3, 7))],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));
        let proposal = Proposal::Assignment { start: day(2024, 2, 1), end: Some(day(2024, 2, 20)) };

        let report = check_proposal(&timeline, proposal, true);
        assert!(!report.has_conflicts());
        assert_eq!(report.end_date, Some(day(2024, 2, 20)));
    }

    #[test]
    fn test_assignment_reports_overlapping_assignment() {
        let events = FleetEvents {
            assignments: vec![assignment(10, 3, day(2024, 1, 1), Some(day(2024, 2, 10)))],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));
        let proposal = Proposal::Assignment { start: day(2024, 2, 1), end: Some(day(2024, 2, 20)) };

        let report = check_proposal(&timeline, proposal, true);
        assert!(matches!(report.warnings[0], Conflict::Assignment { assignment_id: 10, .. }));
        assert!(report.truncations.is_empty());
    }

    #[test]
    fn test_movement_from_current_project_truncates() {
        let events = FleetEvents {
            assignments: vec![assignment(10, 3, day(2024, 1, 1), None)],
            ..Default::default()
        };
        let timeline = Timeline::new(&events, 1, day(2024, 1, 15));

        let proposal = Proposal::Movement { start: day(2024, 1, 16), from_project_id: Some(3) };
        let report = check_proposal(&timeline, proposal, true);
        assert!(!report.is_blocked());
        assert_eq!(report.truncations[0].new_end, day(2024, 1, 15));

        let elsewhere = Proposal::Movement { start: day(2024, 1, 16), from_project_id: Some(8) };
        assert!(!check_proposal(&timeline, elsewhere, true).has_conflicts());
    }
}

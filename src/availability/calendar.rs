//! Month calendar of fleet activity

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};

use super::{open_end, shift_days, DateRange};
use crate::models::{
    equipment::Equipment, fleet::FleetEvents, project::ProjectShort, ServiceType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKind {
    Service,
    Maintenance,
    Movement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarItem {
    pub equipment_id: i32,
    pub equipment_name: String,
    pub serial_code: Option<String>,
    pub assignment_project: Option<String>,
    pub kind: Option<CalendarKind>,
    pub label: Option<String>,
}

impl CalendarItem {
    fn rank(&self) -> u8 {
        if self.kind.is_some() {
            0
        } else if self.assignment_project.is_some() {
            1
        } else {
            2
        }
    }
}

/// Which event kinds are drawn
#[derive(Debug, Clone, Copy)]
pub struct CalendarLayers {
    pub assignments: bool,
    pub services: bool,
    pub movements: bool,
}

impl Default for CalendarLayers {
    fn default() -> Self {
        Self { assignments: true, services: true, movements: true }
    }
}

#[derive(Debug, Clone)]
pub struct MonthCalendar {
    /// Sunday before (or on) the first of the month to the Saturday after the last
    pub window: DateRange,
    pub days: Vec<NaiveDate>,
    items: BTreeMap<NaiveDate, Vec<CalendarItem>>,
}

impl MonthCalendar {
    pub fn items_on(&self, day: NaiveDate) -> &[CalendarItem] {
        self.items.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn in_month(&self, day: NaiveDate, month: NaiveDate) -> bool {
        day.year() == month.year() && day.month() == month.month()
    }
}

pub fn month_window(month: NaiveDate) -> DateRange {
    let first = month.with_day(1).unwrap_or(month);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month.map(|d| shift_days(d, -1)).unwrap_or(first);

    let start = shift_days(first, -i64::from(first.weekday().num_days_from_sunday()));
    let end = shift_days(last, 6 - i64::from(last.weekday().num_days_from_sunday()));
    DateRange::new(start, end)
}

/// Lay out the equipment in `fleet` over the month containing `month`.
///
/// Only events of equipment in `fleet` are drawn. Open-ended assignments run
/// to today + `horizon_days`.
pub fn month_calendar(
    month: NaiveDate,
    today: NaiveDate,
    fleet: &[Equipment],
    events: &FleetEvents,
    projects: &[ProjectShort],
    horizon_days: i64,
    layers: CalendarLayers,
) -> MonthCalendar {
    let window = month_window(month);
    let allowed: HashSet<i32> = fleet.iter().map(|e| e.id).collect();
    let equipment_by_id: HashMap<i32, &Equipment> = fleet.iter().map(|e| (e.id, e)).collect();
    let project_names: HashMap<i32, &str> =
        projects.iter().map(|p| (p.id, p.name.as_str())).collect();

    let mut by_day: BTreeMap<NaiveDate, HashMap<i32, CalendarItem>> = BTreeMap::new();
    let mut upsert = |range: DateRange, equipment_id: i32, patch: &dyn Fn(&mut CalendarItem)| {
        let start = range.start.max(window.start);
        let end = range.end.min(window.end);
        for day in start.iter_days().take_while(|d| *d <= end) {
            let item = by_day
                .entry(day)
                .or_default()
                .entry(equipment_id)
                .or_insert_with(|| {
                    let equipment = equipment_by_id.get(&equipment_id);
                    CalendarItem {
                        equipment_id,
                        equipment_name: equipment
                            .map(|e| e.name.clone())
                            .unwrap_or_else(|| format!("Equipment #{}", equipment_id)),
                        serial_code: equipment.and_then(|e| e.serial_code.clone()),
                        assignment_project: None,
                        kind: None,
                        label: None,
                    }
                });
            patch(item);
        }
    };

    if layers.assignments {
        let horizon = open_end(today, horizon_days);
        for a in events.assignments.iter().filter(|a| allowed.contains(&a.equipment_id)) {
            let name = project_names
                .get(&a.project_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| format!("Project #{}", a.project_id));
            let range = DateRange::new(a.start_date, a.end_date.unwrap_or(horizon));
            upsert(range, a.equipment_id, &|item| {
                item.assignment_project = Some(name.clone())
            });
        }
    }

    if layers.services {
        for s in events.services.iter().filter(|s| allowed.contains(&s.equipment_id)) {
            let kind = if s.service_type == ServiceType::Repair {
                CalendarKind::Maintenance
            } else {
                CalendarKind::Service
            };
            let label = s.service_type.to_string();
            upsert(
                DateRange::new(s.scheduled_start, s.scheduled_end),
                s.equipment_id,
                &|item| {
                    item.kind = Some(kind);
                    item.label = Some(label.clone());
                },
            );
        }
    }

    if layers.movements {
        for m in events.movements.iter().filter(|m| allowed.contains(&m.equipment_id)) {
            upsert(DateRange::new(m.start_date, window.end), m.equipment_id, &|item| {
                item.kind = Some(CalendarKind::Movement);
                item.label = Some("MOVEMENT".to_string());
            });
        }
    }

    let items = by_day
        .into_iter()
        .map(|(day, entries)| {
            let mut list: Vec<CalendarItem> = entries.into_values().collect();
            list.sort_by(|a, b| {
                a.rank()
                    .cmp(&b.rank())
                    .then_with(|| a.equipment_name.cmp(&b.equipment_name))
            });
            (day, list)
        })
        .collect();

    MonthCalendar {
        window,
        days: window.start.iter_days().take_while(|d| *d <= window.end).collect(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::OPEN_END_HORIZON_DAYS;
    use crate::models::{
        fleet::{Assignment, Movement, ServiceWindow},
        EquipmentType, LifecycleStage,
    };

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn equipment(id: i32, name: &str) -> Equipment {
        Equipment {
            id,
            name: name.to_string(),
            serial_code: None,
            equipment_type: EquipmentType::Manlift,
            status: None,
        }
    }

    #[test]
    fn test_month_window_pads_to_weeks() {
        // February 2024 starts on a Thursday and ends on a Thursday
        let window = month_window(day(2024, 2, 14));
        assert_eq!(window.start, day(2024, 1, 28));
        assert_eq!(window.end, day(2024, 3, 2));

        let december = month_window(day(2024, 12, 1));
        assert_eq!(december.start, day(2024, 12, 1));
        assert_eq!(december.end, day(2025, 1, 4));
    }

    #[test]
    fn test_calendar_layers_and_ordering() {
        let fleet = vec![equipment(1, "Boom lift"), equipment(2, "Alpha lift"), equipment(3, "Scissor lift")];
        let events = FleetEvents {
            assignments: vec![
                Assignment { id: 1, equipment_id: 1, project_id: 9, start_date: day(2024, 2, 1), end_date: None },
                Assignment { id: 2, equipment_id: 2, project_id: 77, start_date: day(2024, 2, 10), end_date: Some(day(2024, 2, 12)) },
            ],
            services: vec![ServiceWindow {
                id: 1,
                equipment_id: 1,
                scheduled_start: day(2024, 2, 11),
                scheduled_end: day(2024, 2, 11),
                service_type: ServiceType::Repair,
                status: None,
                notes: None,
            }],
            movements: vec![Movement {
                id: 1,
                equipment_id: 3,
                start_date: day(2024, 2, 25),
                from_project_id: None,
                to_project_id: Some(9),
                notes: None,
            }],
        };
        let projects = vec![ProjectShort {
            id: 9,
            name: "Depot".to_string(),
            exact_location: None,
            lifecycle_stage: LifecycleStage::Ongoing,
        }];

        let calendar = month_calendar(day(2024, 2, 1), day(2024, 1, 1), &fleet, &events, &projects, OPEN_END_HORIZON_DAYS, CalendarLayers::default());
        assert_eq!(calendar.days.len(), 35);

        let on_11th = calendar.items_on(day(2024, 2, 11));
        assert_eq!(on_11th.len(), 2);
        assert_eq!(on_11th[0].equipment_id, 1);
        assert_eq!(on_11th[0].kind, Some(CalendarKind::Maintenance));
        assert_eq!(on_11th[0].assignment_project.as_deref(), Some("Depot"));
        assert_eq!(on_11th[1].assignment_project.as_deref(), Some("Project #77"));

        let last_day = calendar.items_on(day(2024, 3, 2));
        assert!(last_day.iter().any(|i| i.equipment_id == 3 && i.kind == Some(CalendarKind::Movement)));

        let layers = CalendarLayers { services: false, movements: false, ..Default::default() };
        let calendar = month_calendar(day(2024, 2, 1), day(2024, 1, 1), &fleet, &events, &projects, OPEN_END_HORIZON_DAYS, layers);
        assert!(calendar.items_on(day(2024, 2, 11)).iter().all(|i| i.kind.is_none()));
        assert!(calendar.items_on(day(2024, 3, 2)).iter().all(|i| i.equipment_id != 3));
    }

    #[test]
    fn test_open_assignment_stops_at_horizon() {
        let fleet = vec![equipment(1, "Boom lift"), equipment(2, "Scissor lift")];
        let events = FleetEvents {
            assignments: vec![
                Assignment { id: 1, equipment_id: 1, project_id: 9, start_date: day(2024, 1, 1), end_date: None },
                Assignment { id: 2, equipment_id: 2, project_id: 9, start_date: day(2024, 1, 1), end_date: None },
            ],
            ..Default::default()
        };

        let calendar = month_calendar(day(2024, 2, 1), day(2024, 2, 1), &fleet, &events, &[], 10, CalendarLayers::default());
        assert_eq!(calendar.items_on(day(2024, 2, 11)).len(), 2);
        assert!(calendar.items_on(day(2024, 2, 12)).is_empty());

        let shown = &fleet[..1];
        let calendar = month_calendar(day(2024, 2, 1), day(2024, 2, 1), shown, &events, &[], 10, CalendarLayers::default());
        let ids: Vec<i32> = calendar.items_on(day(2024, 2, 5)).iter().map(|i| i.equipment_id).collect();
        assert_eq!(ids, vec![1]);
    }
}

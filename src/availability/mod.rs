//! Equipment availability rules
//!
//! Everything in here is a pure function of "today" and the fleet events
//! fetched from the backend. Nothing is stored: state is recomputed from the
//! date ranges on every call.

pub mod calendar;
pub mod conflicts;
pub mod overview;
pub mod state;

use chrono::{Days, NaiveDate};

pub use conflicts::{check_proposal, Conflict, ConflictReport, Proposal, Truncation};
pub use overview::{build_overview, FleetOverview, FleetRow, OverviewFilter};
pub use state::{derive_state, Timeline};

/// Open-ended assignments are treated as ending this many days after today
pub const OPEN_END_HORIZON_DAYS: i64 = 3650;

/// Closed date interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// `a.start <= b.end && b.start <= a.end`
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Last day considered for an open-ended range, `today + horizon_days`
pub fn open_end(today: NaiveDate, horizon_days: i64) -> NaiveDate {
    shift_days(today, horizon_days)
}

/// Add (or subtract, when negative) whole days, saturating at the calendar bounds
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// New end date for a range that must finish before `boundary`.
///
/// The range ends the day before `boundary`, or collapses onto its own start
/// when that would make it negative-length.
pub fn truncate_end_before(range_start: NaiveDate, boundary: NaiveDate) -> NaiveDate {
    let day_before = shift_days(boundary, -1);
    day_before.max(range_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let ranges = [
            DateRange::new(day(2024, 1, 1), day(2024, 1, 10)),
            DateRange::new(day(2024, 1, 10), day(2024, 1, 20)),
            DateRange::new(day(2024, 1, 11), day(2024, 1, 12)),
            DateRange::new(day(2023, 12, 1), day(2024, 2, 1)),
            DateRange::new(day(2024, 3, 1), day(2024, 3, 1)),
        ];
        for a in &ranges {
            for b in &ranges {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_overlap_boundaries() {
        let a = DateRange::new(day(2024, 1, 1), day(2024, 1, 10));
        assert!(a.overlaps(&DateRange::new(day(2024, 1, 10), day(2024, 1, 20))));
        assert!(!a.overlaps(&DateRange::new(day(2024, 1, 11), day(2024, 1, 20))));
        assert!(a.overlaps(&DateRange::new(day(2024, 1, 3), day(2024, 1, 4))));
    }

    #[test]
    fn test_truncate_end_before() {
        assert_eq!(truncate_end_before(day(2024, 1, 1), day(2024, 2, 1)), day(2024, 1, 31));
        assert_eq!(truncate_end_before(day(2024, 2, 1), day(2024, 2, 1)), day(2024, 2, 1));
        assert_eq!(truncate_end_before(day(2024, 2, 5), day(2024, 2, 1)), day(2024, 2, 5));
    }

    #[test]
    fn test_open_end() {
        assert_eq!(open_end(day(2024, 1, 1), OPEN_END_HORIZON_DAYS), day(2033, 12, 29));
    }
}

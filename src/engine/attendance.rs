use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::absence::{Absence, AbsenceKind};
use crate::model::employee::EmployeeProfile;
use crate::model::payroll::PayPeriod;

/// Attendance state of one employee on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Present,
    AbsentJustified,
    AbsentUnjustified,
}

impl DayStatus {
    pub fn is_present(self) -> bool {
        matches!(self, DayStatus::Present)
    }
}

/// Per-employee attendance counters over a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceCount {
    pub worked: u32,
    pub justified: u32,
    pub unjustified: u32,
}

/// Precomputed (employee, day) classification for a period. Built once
/// and queried by both the pool distributor and the payout aggregator.
#[derive(Debug, Clone, Default)]
pub struct AttendanceSheet {
    statuses: BTreeMap<(u64, NaiveDate), DayStatus>,
}

impl AttendanceSheet {
    pub fn build(profiles: &[EmployeeProfile], period: &PayPeriod) -> Self {
        let mut statuses = BTreeMap::new();
        for profile in profiles {
            for day in period.days() {
                statuses.insert(
                    (profile.employee.id, day),
                    classify_day(&profile.absences, day),
                );
            }
        }
        Self { statuses }
    }

    /// Employees with no computed entry (not part of the snapshot) count
    /// as present, matching the zero-records rule.
    pub fn status(&self, employee_id: u64, day: NaiveDate) -> DayStatus {
        self.statuses
            .get(&(employee_id, day))
            .copied()
            .unwrap_or(DayStatus::Present)
    }

    pub fn count(&self, employee_id: u64, period: &PayPeriod) -> AttendanceCount {
        let mut c = AttendanceCount::default();
        for day in period.days() {
            match self.status(employee_id, day) {
                DayStatus::Present => c.worked += 1,
                DayStatus::AbsentJustified => c.justified += 1,
                DayStatus::AbsentUnjustified => c.unjustified += 1,
            }
        }
        c
    }
}

/// Classify one day against every covering absence record. Overlaps are
/// allowed; a single unjustified record outweighs any number of
/// justified ones. No covering record means present.
fn classify_day(absences: &[Absence], day: NaiveDate) -> DayStatus {
    let mut covered = false;
    for a in absences.iter().filter(|a| a.covers(day)) {
        if a.kind == AbsenceKind::Unjustified {
            return DayStatus::AbsentUnjustified;
        }
        covered = true;
    }
    if covered {
        DayStatus::AbsentJustified
    } else {
        DayStatus::Present
    }
}

use std::collections::BTreeMap;

use chrono::NaiveDate;
use derive_more::{Add, AddAssign};

use crate::engine::attendance::AttendanceSheet;
use crate::model::tier::PoolScope;

/// Per-employee money movement produced by one (day, scope) step.
/// Deltas merge with `+=`, so the day loop stays a pure fold instead of
/// mutating shared counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Add, AddAssign)]
pub struct Tally {
    /// Own participation share of pools on days present.
    pub earned: f64,
    /// Evenly-split redistribution received from absent colleagues.
    pub bonus: f64,
    /// Informational: own share forfeited on days absent.
    pub lost: f64,
}

/// An employee as the distributor sees them: an id and a share of the
/// pool, 0–100.
#[derive(Debug, Clone, Copy)]
pub struct PoolMember {
    pub employee_id: u64,
    pub participation_pct: f64,
}

/// Result of distributing one pool for one day.
#[derive(Debug, Clone)]
pub struct DayScopeDelta {
    pub date: NaiveDate,
    pub scope: PoolScope,
    pub pool_value: f64,
    /// Pot actually handed to present employees. Zero when nobody was
    /// present (the pot is forfeited, not carried over).
    pub redistributed: f64,
    pub tallies: BTreeMap<u64, Tally>,
}

/// Distribute one day's pool for one scope.
///
/// Every member's theoretical share is `pool × participation / 100`.
/// Present members keep their share; the shares of absent members
/// (justified or not, both miss the pool) are pooled and split evenly
/// across whoever was present that day. Returns `None` when the pool is
/// empty, so revenue-free days cost nothing.
pub fn distribute_day(
    date: NaiveDate,
    scope: PoolScope,
    scope_revenue: f64,
    percentage: f64,
    members: &[PoolMember],
    sheet: &AttendanceSheet,
) -> Option<DayScopeDelta> {
    let pool_value = scope_revenue * percentage;
    if pool_value <= 0.0 || members.is_empty() {
        return None;
    }

    let mut tallies: BTreeMap<u64, Tally> = BTreeMap::new();
    let mut pot = 0.0;
    let mut present: Vec<u64> = Vec::new();

    for member in members {
        let share = pool_value * member.participation_pct / 100.0;
        let tally = tallies.entry(member.employee_id).or_default();
        if sheet.status(member.employee_id, date).is_present() {
            tally.earned += share;
            present.push(member.employee_id);
        } else {
            tally.lost += share;
            pot += share;
        }
    }

    let redistributed = if present.is_empty() {
        // Nobody to hand the pot to; it is forfeited for the day.
        0.0
    } else {
        let bonus_each = pot / present.len() as f64;
        for id in &present {
            if let Some(tally) = tallies.get_mut(id) {
                tally.bonus += bonus_each;
            }
        }
        pot
    };

    Some(DayScopeDelta {
        date,
        scope,
        pool_value,
        redistributed,
        tallies,
    })
}

/// Fold one day's delta into the running per-employee totals.
pub fn merge(totals: &mut BTreeMap<u64, Tally>, delta: &DayScopeDelta) {
    for (id, tally) in &delta.tallies {
        *totals.entry(*id).or_default() += *tally;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::model::absence::{Absence, AbsenceKind};
    use crate::model::employee::{Employee, EmployeeProfile};
    use crate::model::payroll::PayPeriod;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn member(id: u64, pct: f64) -> PoolMember {
        PoolMember {
            employee_id: id,
            participation_pct: pct,
        }
    }

    fn profile(id: u64, absences: Vec<Absence>) -> EmployeeProfile {
        EmployeeProfile {
            employee: Employee {
                id,
                display_name: format!("emp-{id}"),
                active: true,
                pool: PoolScope::Service,
                participation_pct: 0.0,
                color: None,
            },
            contracts: vec![],
            absences,
        }
    }

    fn absence(id: u64, kind: AbsenceKind, day: u32) -> Absence {
        Absence {
            employee_id: id,
            kind,
            start_date: date(day),
            end_date: date(day),
            reason: None,
        }
    }

    fn sheet(profiles: &[EmployeeProfile]) -> AttendanceSheet {
        AttendanceSheet::build(profiles, &PayPeriod::new(date(5), date(11)))
    }

    #[test]
    fn absent_member_share_moves_to_present_colleague() {
        // $1,000 service day at 20% => $200 pool, 50/50 split.
        // Employee 1 is unjustified-absent: loses $100, employee 2 earns
        // $100 of its own plus the full $100 pot.
        let sheet = sheet(&[
            profile(1, vec![absence(1, AbsenceKind::Unjustified, 5)]),
            profile(2, vec![]),
        ]);
        let delta = distribute_day(
            date(5),
            PoolScope::Service,
            1000.0,
            0.20,
            &[member(1, 50.0), member(2, 50.0)],
            &sheet,
        )
        .unwrap();

        assert_eq!(delta.pool_value, 200.0);
        assert_eq!(delta.redistributed, 100.0);
        let a = delta.tallies[&1];
        let b = delta.tallies[&2];
        assert_eq!(a.lost, 100.0);
        assert_eq!(a.earned, 0.0);
        assert_eq!(b.earned, 100.0);
        assert_eq!(b.bonus, 100.0);
    }

    #[test]
    fn justified_absence_also_forfeits_the_pool_share() {
        let sheet = sheet(&[
            profile(1, vec![absence(1, AbsenceKind::Justified, 5)]),
            profile(2, vec![]),
        ]);
        let delta = distribute_day(
            date(5),
            PoolScope::Service,
            1000.0,
            0.20,
            &[member(1, 50.0), member(2, 50.0)],
            &sheet,
        )
        .unwrap();
        assert_eq!(delta.tallies[&1].lost, 100.0);
        assert_eq!(delta.tallies[&2].bonus, 100.0);
    }

    #[test]
    fn pot_is_forfeited_when_nobody_is_present() {
        let sheet = sheet(&[
            profile(1, vec![absence(1, AbsenceKind::Unjustified, 5)]),
            profile(2, vec![absence(2, AbsenceKind::Justified, 5)]),
        ]);
        let delta = distribute_day(
            date(5),
            PoolScope::Service,
            1000.0,
            0.20,
            &[member(1, 50.0), member(2, 50.0)],
            &sheet,
        )
        .unwrap();
        assert_eq!(delta.redistributed, 0.0);
        assert_eq!(delta.tallies[&1].lost, 100.0);
        assert_eq!(delta.tallies[&2].lost, 100.0);
        assert_eq!(delta.tallies[&1].bonus, 0.0);
        assert_eq!(delta.tallies[&2].bonus, 0.0);
    }

    #[test]
    fn empty_pool_distributes_nothing() {
        let sheet = sheet(&[profile(1, vec![])]);
        assert!(distribute_day(date(5), PoolScope::Service, 0.0, 0.20, &[member(1, 100.0)], &sheet).is_none());
        assert!(distribute_day(date(5), PoolScope::Service, 500.0, 0.0, &[member(1, 100.0)], &sheet).is_none());
    }

    #[test]
    fn lost_equals_bonus_whenever_someone_is_present() {
        // Uneven participations and a three-way split: conservation must
        // hold exactly at full precision.
        let sheet = sheet(&[
            profile(1, vec![absence(1, AbsenceKind::Unjustified, 6)]),
            profile(2, vec![absence(2, AbsenceKind::Justified, 6)]),
            profile(3, vec![]),
            profile(4, vec![]),
        ]);
        let members = [member(1, 40.0), member(2, 25.0), member(3, 20.0), member(4, 15.0)];
        let delta = distribute_day(date(6), PoolScope::Service, 1234.56, 0.33, &members, &sheet).unwrap();

        let lost: f64 = delta.tallies.values().map(|t| t.lost).sum();
        let bonus: f64 = delta.tallies.values().map(|t| t.bonus).sum();
        assert!((lost - bonus).abs() < 1e-9);
        assert_eq!(delta.redistributed, lost);
    }

    #[test]
    fn deltas_merge_additively() {
        let sheet = sheet(&[profile(1, vec![]), profile(2, vec![])]);
        let members = [member(1, 60.0), member(2, 40.0)];

        let mut totals = BTreeMap::new();
        for day in [5, 6] {
            let delta =
                distribute_day(date(day), PoolScope::Service, 100.0, 0.10, &members, &sheet).unwrap();
            merge(&mut totals, &delta);
        }
        assert!((totals[&1].earned - 12.0).abs() < 1e-9);
        assert!((totals[&2].earned - 8.0).abs() < 1e-9);
    }
}

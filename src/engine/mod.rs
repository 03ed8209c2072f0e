//! The payroll commission engine: a pure, synchronous computation from a
//! consistent data snapshot to a `PayrollPreview`. No I/O happens here;
//! the store layer loads the snapshot and persists confirmed runs.

use std::collections::BTreeMap;

use chrono_tz::Tz;

use crate::model::employee::EmployeeProfile;
use crate::model::payroll::{DayRevenueLine, PayPeriod, PayrollPreview, PoolSummary};
use crate::model::sale::SalesTransaction;
use crate::model::tier::{CommissionTier, PoolScope};

pub mod attendance;
pub mod distribute;
pub mod payout;
pub mod revenue;
pub mod tier;

use attendance::AttendanceSheet;
use distribute::{PoolMember, Tally};

/// A consistent snapshot of everything one preview needs.
#[derive(Debug, Clone)]
pub struct EngineInput {
    pub period: PayPeriod,
    pub business_tz: Tz,
    pub transactions: Vec<SalesTransaction>,
    pub tiers: Vec<CommissionTier>,
    pub profiles: Vec<EmployeeProfile>,
}

/// Round to cents. Applied only at the presentation boundary; internal
/// accumulation stays at full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Run the whole pipeline for one period. Deterministic for identical
/// inputs: days iterate in calendar order, employees in id order.
pub fn compute_preview(input: &EngineInput) -> PayrollPreview {
    let book = revenue::aggregate(&input.transactions, &input.period, input.business_tz);

    let service_tier = tier::resolve(&input.tiers, PoolScope::Service, book.service_total);
    let total_tier = tier::resolve(&input.tiers, PoolScope::Total, book.grand_total());

    let mut active: Vec<&EmployeeProfile> =
        input.profiles.iter().filter(|p| p.employee.active).collect();
    active.sort_by_key(|p| p.employee.id);

    let sheet = AttendanceSheet::build(&input.profiles, &input.period);

    let members_for = |scope: PoolScope| -> Vec<PoolMember> {
        active
            .iter()
            .filter(|p| p.employee.pool == scope)
            .map(|p| PoolMember {
                employee_id: p.employee.id,
                participation_pct: p.employee.participation_pct,
            })
            .collect()
    };
    let service_members = members_for(PoolScope::Service);
    let total_members = members_for(PoolScope::Total);

    let pct_for = |scope: PoolScope| match scope {
        PoolScope::Service => service_tier.percentage,
        PoolScope::Total => total_tier.percentage,
    };

    // Fold per-(day, scope) deltas into one tally per employee.
    let mut totals: BTreeMap<u64, Tally> = BTreeMap::new();
    let mut redistributed = 0.0;
    for day in input.period.days() {
        let day_revenue = book.day(day);
        for (scope, members) in [
            (PoolScope::Service, &service_members),
            (PoolScope::Total, &total_members),
        ] {
            if let Some(delta) = distribute::distribute_day(
                day,
                scope,
                day_revenue.for_scope(scope),
                pct_for(scope),
                members,
                &sheet,
            ) {
                redistributed += delta.redistributed;
                distribute::merge(&mut totals, &delta);
            }
        }
    }

    let lines: Vec<_> = active
        .iter()
        .map(|p| {
            let tally = totals.get(&p.employee.id).copied().unwrap_or_default();
            let count = sheet.count(p.employee.id, &input.period);
            payout::build_line(p, tally, count)
        })
        .collect();

    let days = input
        .period
        .days()
        .map(|date| {
            let r = book.day(date);
            DayRevenueLine {
                date,
                service: round2(r.service_revenue),
                retail: round2(r.retail_revenue),
                total: round2(r.total()),
            }
        })
        .collect();

    let cash_needed = round2(lines.iter().map(|l| l.total_cash).sum());

    PayrollPreview {
        period: input.period,
        days,
        service_revenue: round2(book.service_total),
        retail_revenue: round2(book.retail_total),
        total_revenue: round2(book.grand_total()),
        pools: PoolSummary {
            service_pool: round2(book.service_total * service_tier.percentage),
            total_pool: round2(book.grand_total() * total_tier.percentage),
            redistributed: round2(redistributed),
        },
        service_tier,
        total_tier,
        cash_needed,
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::model::absence::{Absence, AbsenceKind};
    use crate::model::employee::{Contract, Employee};
    use crate::model::sale::SalesTransaction;
    use crate::model::tier::CommissionTier;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn sale(day: u32, amount: f64, is_service: bool) -> SalesTransaction {
        SalesTransaction {
            id: u64::from(day) * 100,
            // 15:00 UTC is midday in Santiago whatever the season.
            sold_at: Utc.with_ymd_and_hms(2026, 1, day, 15, 0, 0).unwrap(),
            total_amount: amount,
            is_service,
            items: vec![],
        }
    }

    fn tier(scope: PoolScope, min: f64, max: Option<f64>, pct: f64) -> CommissionTier {
        CommissionTier {
            id: 1,
            scope,
            name: format!("{scope} tier"),
            min_amount: min,
            max_amount: max,
            percentage: pct,
        }
    }

    fn worker(id: u64, pool: PoolScope, pct: f64, absences: Vec<Absence>) -> EmployeeProfile {
        EmployeeProfile {
            employee: Employee {
                id,
                display_name: format!("emp-{id}"),
                active: true,
                pool,
                participation_pct: pct,
                color: None,
            },
            contracts: vec![Contract {
                id,
                employee_id: id,
                weekly_salary: 1400.0,
                bank_amount: 0.0,
                cash_amount: 0.0,
                active: true,
            }],
            absences,
        }
    }

    fn absence(id: u64, kind: AbsenceKind, from: u32, to: u32) -> Absence {
        Absence {
            employee_id: id,
            kind,
            start_date: date(from),
            end_date: date(to),
            reason: None,
        }
    }

    #[test]
    fn single_employee_full_participation_takes_the_whole_pool() {
        // One $1,000 day, total pool at 10%: $100 commission, no bonus.
        let input = EngineInput {
            period: PayPeriod::new(date(5), date(11)),
            business_tz: chrono_tz::America::Santiago,
            transactions: vec![sale(5, 1000.0, true)],
            tiers: vec![
                tier(PoolScope::Total, 0.0, None, 0.10),
            ],
            profiles: vec![worker(1, PoolScope::Total, 100.0, vec![])],
        };
        let preview = compute_preview(&input);
        let line = &preview.lines[0];
        assert_eq!(line.commission_earned, 100.0);
        assert_eq!(line.bonus, 0.0);
        assert_eq!(line.days_worked, 7);
        assert_eq!(preview.pools.redistributed, 0.0);
    }

    #[test]
    fn unresolved_tier_zeroes_the_pool_without_failing() {
        let input = EngineInput {
            period: PayPeriod::new(date(5), date(11)),
            business_tz: chrono_tz::America::Santiago,
            transactions: vec![sale(5, 1000.0, true)],
            tiers: vec![],
            profiles: vec![worker(1, PoolScope::Service, 100.0, vec![])],
        };
        let preview = compute_preview(&input);
        assert_eq!(preview.service_tier.name, None);
        assert_eq!(preview.service_tier.percentage, 0.0);
        assert_eq!(preview.pools.service_pool, 0.0);
        assert_eq!(preview.lines[0].commission_earned, 0.0);
    }

    #[test]
    fn preview_is_byte_identical_across_recomputation() {
        let input = EngineInput {
            period: PayPeriod::new(date(5), date(11)),
            business_tz: chrono_tz::America::Santiago,
            transactions: vec![
                sale(5, 812.33, true),
                sale(6, 240.17, false),
                sale(8, 1099.99, true),
            ],
            tiers: vec![
                tier(PoolScope::Service, 0.0, None, 0.35),
                tier(PoolScope::Total, 0.0, None, 0.10),
            ],
            profiles: vec![
                worker(3, PoolScope::Service, 60.0, vec![absence(3, AbsenceKind::Justified, 6, 6)]),
                worker(1, PoolScope::Service, 40.0, vec![]),
                worker(2, PoolScope::Total, 100.0, vec![absence(2, AbsenceKind::Unjustified, 8, 9)]),
            ],
        };
        let a = serde_json::to_string(&compute_preview(&input)).unwrap();
        let b = serde_json::to_string(&compute_preview(&input)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn lines_are_ordered_by_employee_id() {
        let input = EngineInput {
            period: PayPeriod::new(date(5), date(11)),
            business_tz: chrono_tz::America::Santiago,
            transactions: vec![],
            tiers: vec![],
            profiles: vec![
                worker(9, PoolScope::Service, 50.0, vec![]),
                worker(2, PoolScope::Service, 50.0, vec![]),
            ],
        };
        let preview = compute_preview(&input);
        let ids: Vec<u64> = preview.lines.iter().map(|l| l.employee_id).collect();
        assert_eq!(ids, vec![2, 9]);
    }

    #[test]
    fn conservation_and_non_negativity_over_a_messy_week() {
        let input = EngineInput {
            period: PayPeriod::new(date(5), date(11)),
            business_tz: chrono_tz::America::Santiago,
            transactions: vec![
                sale(5, 931.45, true),
                sale(6, 1240.1, true),
                sale(6, 310.55, false),
                sale(7, 788.0, true),
                sale(9, 1505.25, true),
                sale(11, 660.4, false),
            ],
            tiers: vec![
                tier(PoolScope::Service, 0.0, None, 0.40),
                tier(PoolScope::Total, 0.0, None, 0.10),
            ],
            profiles: vec![
                worker(1, PoolScope::Service, 50.0, vec![absence(1, AbsenceKind::Unjustified, 6, 7)]),
                worker(2, PoolScope::Service, 30.0, vec![absence(2, AbsenceKind::Justified, 9, 9)]),
                worker(3, PoolScope::Service, 20.0, vec![]),
                worker(4, PoolScope::Total, 100.0, vec![]),
            ],
        };
        let preview = compute_preview(&input);

        // Employee 3 was present every day, so every forfeited share had
        // a taker: lost and bonus must balance.
        let lost: f64 = preview.lines.iter().map(|l| l.commission_lost).sum();
        let bonus: f64 = preview.lines.iter().map(|l| l.bonus).sum();
        assert!((lost - bonus).abs() < 0.02, "lost {lost} vs bonus {bonus}");
        assert!((preview.pools.redistributed - bonus).abs() < 0.02);

        for line in &preview.lines {
            assert!(line.payout_bank >= 0.0);
            assert!(line.payout_cash_salary >= 0.0);
            assert!(line.payout_commission >= 0.0);
            assert!(line.total_payout >= 0.0);
            let sum = line.payout_bank + line.payout_cash_salary + line.payout_commission;
            assert!((line.total_payout - sum).abs() < 1e-9);
        }

        let cash: f64 = preview.lines.iter().map(|l| l.total_cash).sum();
        assert!((preview.cash_needed - cash).abs() < 1e-9);
    }

    #[test]
    fn inactive_employees_get_no_line_and_no_share() {
        let mut idle = worker(5, PoolScope::Service, 50.0, vec![]);
        idle.employee.active = false;
        let input = EngineInput {
            period: PayPeriod::new(date(5), date(11)),
            business_tz: chrono_tz::America::Santiago,
            transactions: vec![sale(5, 1000.0, true)],
            tiers: vec![tier(PoolScope::Service, 0.0, None, 0.20)],
            profiles: vec![idle, worker(6, PoolScope::Service, 50.0, vec![])],
        };
        let preview = compute_preview(&input);
        assert_eq!(preview.lines.len(), 1);
        assert_eq!(preview.lines[0].employee_id, 6);
        // The inactive colleague is not "absent"; their 50% share simply
        // never enters the distribution.
        assert_eq!(preview.lines[0].commission_earned, 100.0);
        assert_eq!(preview.lines[0].bonus, 0.0);
    }

    #[test]
    fn every_period_day_appears_in_the_breakdown() {
        let input = EngineInput {
            period: PayPeriod::new(date(5), date(11)),
            business_tz: chrono_tz::America::Santiago,
            transactions: vec![sale(7, 500.0, true)],
            tiers: vec![],
            profiles: vec![],
        };
        let preview = compute_preview(&input);
        assert_eq!(preview.days.len(), 7);
        assert_eq!(preview.days[0].total, 0.0);
        assert_eq!(preview.days[2].service, 500.0);
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::tier::{PoolScope, ResolvedTier};

/// Inclusive payroll period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PayPeriod {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start: NaiveDate,
    #[schema(example = "2026-01-11", format = "date", value_type = String)]
    pub end: NaiveDate,
}

impl PayPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Revenue collapsed onto one business-local calendar day. Days without
/// sales have no entry; callers default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyRevenue {
    pub service_revenue: f64,
    pub retail_revenue: f64,
}

impl DailyRevenue {
    pub fn total(&self) -> f64 {
        self.service_revenue + self.retail_revenue
    }

    /// Revenue visible to one pool scope.
    pub fn for_scope(&self, scope: PoolScope) -> f64 {
        match scope {
            PoolScope::Service => self.service_revenue,
            PoolScope::Total => self.total(),
        }
    }
}

/// Per-day revenue line of the preview, rounded for presentation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayRevenueLine {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 820.5)]
    pub service: f64,
    #[schema(example = 140.0)]
    pub retail: f64,
    #[schema(example = 960.5)]
    pub total: f64,
}

/// Period-level pool figures shown in the preview header.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PoolSummary {
    /// Service revenue × resolved service percentage.
    #[schema(example = 1666.0)]
    pub service_pool: f64,
    /// Total revenue × resolved total percentage.
    #[schema(example = 980.0)]
    pub total_pool: f64,
    /// Money actually moved from absentees to present colleagues over
    /// the period. Pool money forfeited on days with nobody present is
    /// not counted here.
    #[schema(example = 112.4)]
    pub redistributed: f64,
}

/// Final pay breakdown for one employee for the period.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayoutLine {
    #[schema(example = 12)]
    pub employee_id: u64,
    #[schema(example = "Carla M.")]
    pub employee_name: String,
    pub pool: PoolScope,
    #[schema(example = 50.0)]
    pub participation_pct: f64,
    #[schema(example = 6)]
    pub days_worked: u32,
    #[schema(example = 1)]
    pub days_absent_justified: u32,
    #[schema(example = 0)]
    pub days_absent_unjustified: u32,
    #[schema(example = 3000.0)]
    pub weekly_salary: f64,
    #[schema(example = 2000.0)]
    pub bank_salary: f64,
    #[schema(example = 1000.0)]
    pub cash_salary: f64,
    #[schema(example = 0.0)]
    pub bank_penalty: f64,
    #[schema(example = 0.0)]
    pub cash_penalty: f64,
    /// Bank component after penalty, clamped at zero.
    #[schema(example = 2000.0)]
    pub payout_bank: f64,
    /// Cash salary component after penalty, clamped at zero.
    #[schema(example = 1000.0)]
    pub payout_cash_salary: f64,
    #[schema(example = 833.0)]
    pub commission_earned: f64,
    #[schema(example = 56.2)]
    pub bonus: f64,
    /// Informational: pool share forfeited to absence.
    #[schema(example = 0.0)]
    pub commission_lost: f64,
    /// commission_earned + bonus; always paid in cash.
    #[schema(example = 889.2)]
    pub payout_commission: f64,
    /// payout_cash_salary + payout_commission.
    #[schema(example = 1889.2)]
    pub total_cash: f64,
    /// payout_bank + payout_cash_salary + payout_commission.
    #[schema(example = 3889.2)]
    pub total_payout: f64,
    #[schema(example = "0 unjustified, 1 justified absence(s); bonus $56.20; 50% of service pool")]
    pub note: String,
}

/// Everything the payroll screen shows before the operator confirms.
/// Pure computation output; nothing is persisted until Confirm.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PayrollPreview {
    pub period: PayPeriod,
    pub days: Vec<DayRevenueLine>,
    #[schema(example = 4760.0)]
    pub service_revenue: f64,
    #[schema(example = 840.0)]
    pub retail_revenue: f64,
    #[schema(example = 5600.0)]
    pub total_revenue: f64,
    pub service_tier: ResolvedTier,
    pub total_tier: ResolvedTier,
    pub pools: PoolSummary,
    /// Sum of every line's cash side; what the till must cover on payday.
    #[schema(example = 9320.4)]
    pub cash_needed: f64,
    pub lines: Vec<PayoutLine>,
}

/// Persisted header of a confirmed payroll. Append-only; a correction is
/// a new run, never an update.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollRun {
    #[schema(example = 41)]
    pub id: u64,
    #[schema(example = "6f9a1c2e-8d0b-4f3a-9c1d-2b7e5a4f6c8d")]
    pub reference: String,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub period_start: NaiveDate,
    #[schema(example = "2026-01-11", format = "date", value_type = String)]
    pub period_end: NaiveDate,
    pub service_revenue: f64,
    pub retail_revenue: f64,
    pub total_revenue: f64,
    pub service_tier_pct: f64,
    pub total_tier_pct: f64,
    /// JSON snapshot of tiers, pools and cash flow at confirmation time.
    #[schema(value_type = String)]
    pub metadata: String,
    #[schema(example = "2026-01-12T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Persisted per-employee receipt of a confirmed payroll, carrying the
/// fields the external renderer needs to print it again later.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollReceipt {
    #[schema(example = 310)]
    pub id: u64,
    #[schema(example = 41)]
    pub run_id: u64,
    #[schema(example = 12)]
    pub employee_id: u64,
    #[schema(example = "Carla M.")]
    pub employee_name: String,
    pub days_worked: u32,
    pub days_absent_justified: u32,
    pub days_absent_unjustified: u32,
    pub weekly_salary: f64,
    pub payout_bank: f64,
    pub payout_cash_salary: f64,
    pub commission_earned: f64,
    pub bonus: f64,
    pub commission_lost: f64,
    pub payout_commission: f64,
    pub total_payout: f64,
    pub note: String,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::absence::Absence;
use crate::model::tier::PoolScope;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    #[schema(example = 12)]
    pub id: u64,
    #[schema(example = "Carla M.")]
    pub display_name: String,
    pub active: bool,
    /// Which commission pool this employee draws from.
    pub pool: PoolScope,
    /// Share of the pool, 0–100. Shares within one pool normally sum to
    /// 100 but the engine does not enforce that.
    #[schema(example = 50.0)]
    pub participation_pct: f64,
    /// Calendar display color, irrelevant to payroll math.
    #[schema(example = "#7c3aed", nullable = true)]
    pub color: Option<String>,
}

/// Weekly salary terms. `bank_amount` and `cash_amount` split the nominal
/// weekly salary; when both are zero the whole salary is treated as bank.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Contract {
    #[schema(example = 7)]
    pub id: u64,
    #[schema(example = 12)]
    pub employee_id: u64,
    #[schema(example = 3000.0)]
    pub weekly_salary: f64,
    #[schema(example = 2000.0)]
    pub bank_amount: f64,
    #[schema(example = 1000.0)]
    pub cash_amount: f64,
    pub active: bool,
}

impl Contract {
    /// Bank/cash split of the weekly salary.
    pub fn split(&self) -> (f64, f64) {
        if self.bank_amount == 0.0 && self.cash_amount == 0.0 {
            (self.weekly_salary, 0.0)
        } else {
            (self.bank_amount, self.cash_amount)
        }
    }
}

/// One employee together with everything payroll needs to know about them
/// for a period: contract candidates and the absence records overlapping
/// the period.
#[derive(Debug, Clone)]
pub struct EmployeeProfile {
    pub employee: Employee,
    pub contracts: Vec<Contract>,
    pub absences: Vec<Absence>,
}

impl EmployeeProfile {
    /// Active contract first, else any contract, else none (a missing
    /// contract shows up as a $0 base salary on the payout line).
    pub fn effective_contract(&self) -> Option<&Contract> {
        self.contracts
            .iter()
            .find(|c| c.active)
            .or_else(|| self.contracts.first())
    }
}

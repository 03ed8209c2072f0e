use crate::api::payroll::{
    ConfirmResponse, PreviewQuery, RunDetailResponse, RunListResponse, RunQuery,
};
use crate::model::absence::{Absence, AbsenceKind};
use crate::model::employee::{Contract, Employee};
use crate::model::payroll::{
    DayRevenueLine, PayPeriod, PayoutLine, PayrollPreview, PayrollReceipt, PayrollRun, PoolSummary,
};
use crate::model::sale::{ItemCategory, SaleItem, SalesTransaction};
use crate::model::tier::{CommissionTier, PoolScope, ResolvedTier};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salonpay API",
        version = "1.0.0",
        description = r#"
## Salon payroll commission engine

Turns raw daily sales into a weekly payout per employee, honoring tiered
commission rates, per-day attendance, and redistribution of the pool
share forfeited by absent employees.

### 🔹 Key Features
- **Preview**
  - Pure, recomputable payroll preview for any period
- **Confirm**
  - Atomically persists one run plus one receipt per employee
- **Runs**
  - Paginated history with receipts for reprinting

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payroll::preview,
        crate::api::payroll::confirm_run,
        crate::api::payroll::list_runs,
        crate::api::payroll::get_run
    ),
    components(
        schemas(
            PreviewQuery,
            ConfirmResponse,
            RunQuery,
            RunListResponse,
            RunDetailResponse,
            PayPeriod,
            DayRevenueLine,
            PoolSummary,
            PayoutLine,
            PayrollPreview,
            PayrollRun,
            PayrollReceipt,
            PoolScope,
            CommissionTier,
            ResolvedTier,
            Employee,
            Contract,
            Absence,
            AbsenceKind,
            SalesTransaction,
            SaleItem,
            ItemCategory
        )
    ),
    tags(
        (name = "Payroll", description = "Payroll preview and confirmation APIs"),
    )
)]
pub struct ApiDoc;

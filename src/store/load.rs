use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use sqlx::MySqlPool;
use tracing::warn;

use crate::engine::EngineInput;
use crate::model::absence::{Absence, AbsenceKind};
use crate::model::employee::{Contract, Employee, EmployeeProfile};
use crate::model::payroll::PayPeriod;
use crate::model::sale::{ItemCategory, SaleItem, SalesTransaction};
use crate::model::tier::{CommissionTier, PoolScope};

/// POS timestamps are UTC while the business day follows the configured
/// zone, so transactions are over-fetched by a day on each side and the
/// engine filters exactly after conversion.
const WINDOW_PAD_DAYS: i64 = 1;

#[derive(sqlx::FromRow)]
struct TxRow {
    id: u64,
    sold_at: DateTime<Utc>,
    total_amount: f64,
    is_service: bool,
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    transaction_id: u64,
    name: String,
    quantity: f64,
    unit_price: f64,
    category: Option<String>,
}

#[derive(sqlx::FromRow)]
struct TierRow {
    id: u64,
    scope: String,
    name: String,
    min_amount: f64,
    max_amount: Option<f64>,
    percentage: f64,
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: u64,
    display_name: String,
    pool_type: String,
    participation_pct: f64,
    color: Option<String>,
    active: bool,
}

#[derive(sqlx::FromRow)]
struct ContractRow {
    id: u64,
    employee_id: u64,
    weekly_salary: f64,
    bank_amount: f64,
    cash_amount: f64,
    active: bool,
}

#[derive(sqlx::FromRow)]
struct AbsenceRow {
    employee_id: u64,
    absence_type: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: Option<String>,
}

/// Load everything one preview needs in a single pass. Raw strings
/// (pool types, absence types, item categories) are normalized here so
/// the engine only ever sees closed enums.
pub async fn load_snapshot(pool: &MySqlPool, period: PayPeriod, tz: Tz) -> Result<EngineInput, sqlx::Error> {
    let window_from = (period.start - Duration::days(WINDOW_PAD_DAYS)).and_time(NaiveTime::MIN);
    let window_to = (period.end + Duration::days(WINDOW_PAD_DAYS + 1)).and_time(NaiveTime::MIN);

    let transactions = fetch_transactions(pool, window_from, window_to).await?;
    let tiers = fetch_tiers(pool).await?;
    let profiles = fetch_profiles(pool, period).await?;

    Ok(EngineInput {
        period,
        business_tz: tz,
        transactions,
        tiers,
        profiles,
    })
}

async fn fetch_transactions(
    pool: &MySqlPool,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<SalesTransaction>, sqlx::Error> {
    let tx_rows = sqlx::query_as::<_, TxRow>(
        r#"
        SELECT id, sold_at, total_amount, is_service
        FROM sales_transactions
        WHERE sold_at >= ? AND sold_at < ?
        ORDER BY id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    let item_rows = sqlx::query_as::<_, ItemRow>(
        r#"
        SELECT i.transaction_id, i.name, i.quantity, i.unit_price, i.category
        FROM sale_items i
        JOIN sales_transactions t ON t.id = i.transaction_id
        WHERE t.sold_at >= ? AND t.sold_at < ?
        ORDER BY i.id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    let mut items_by_tx: HashMap<u64, Vec<SaleItem>> = HashMap::new();
    for row in item_rows {
        items_by_tx.entry(row.transaction_id).or_default().push(SaleItem {
            name: row.name,
            quantity: row.quantity,
            unit_price: row.unit_price,
            category: row.category.as_deref().and_then(ItemCategory::from_raw),
        });
    }

    Ok(tx_rows
        .into_iter()
        .map(|row| SalesTransaction {
            items: items_by_tx.remove(&row.id).unwrap_or_default(),
            id: row.id,
            sold_at: row.sold_at,
            total_amount: row.total_amount,
            is_service: row.is_service,
        })
        .collect())
}

async fn fetch_tiers(pool: &MySqlPool) -> Result<Vec<CommissionTier>, sqlx::Error> {
    // Load order is the tie-break order: first match wins in the
    // resolver, so it must be stable across previews.
    let rows = sqlx::query_as::<_, TierRow>(
        r#"
        SELECT id, scope, name, min_amount, max_amount, percentage
        FROM commission_tiers
        ORDER BY scope, min_amount, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match PoolScope::from_str(&row.scope) {
            Ok(scope) => Some(CommissionTier {
                id: row.id,
                scope,
                name: row.name,
                min_amount: row.min_amount,
                max_amount: row.max_amount,
                percentage: row.percentage,
            }),
            Err(_) => {
                warn!(tier_id = row.id, scope = %row.scope, "Skipping tier with unknown scope");
                None
            }
        })
        .collect())
}

async fn fetch_profiles(pool: &MySqlPool, period: PayPeriod) -> Result<Vec<EmployeeProfile>, sqlx::Error> {
    let employee_rows = sqlx::query_as::<_, EmployeeRow>(
        r#"
        SELECT id, display_name, pool_type, participation_pct, color, active
        FROM employees
        WHERE active = 1
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let contract_rows = sqlx::query_as::<_, ContractRow>(
        r#"
        SELECT c.id, c.employee_id, c.weekly_salary, c.bank_amount, c.cash_amount, c.active
        FROM contracts c
        JOIN employees e ON e.id = c.employee_id
        WHERE e.active = 1
        ORDER BY c.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let absence_rows = sqlx::query_as::<_, AbsenceRow>(
        r#"
        SELECT a.employee_id, a.absence_type, a.start_date, a.end_date, a.reason
        FROM absences a
        JOIN employees e ON e.id = a.employee_id
        WHERE e.active = 1 AND a.start_date <= ? AND a.end_date >= ?
        ORDER BY a.id
        "#,
    )
    .bind(period.end)
    .bind(period.start)
    .fetch_all(pool)
    .await?;

    let mut contracts_by_emp: HashMap<u64, Vec<Contract>> = HashMap::new();
    for row in contract_rows {
        contracts_by_emp.entry(row.employee_id).or_default().push(Contract {
            id: row.id,
            employee_id: row.employee_id,
            weekly_salary: row.weekly_salary,
            bank_amount: row.bank_amount,
            cash_amount: row.cash_amount,
            active: row.active,
        });
    }

    let mut absences_by_emp: HashMap<u64, Vec<Absence>> = HashMap::new();
    for row in absence_rows {
        absences_by_emp.entry(row.employee_id).or_default().push(Absence {
            employee_id: row.employee_id,
            kind: AbsenceKind::from_raw(&row.absence_type),
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
        });
    }

    Ok(employee_rows
        .into_iter()
        .map(|row| {
            let pool_scope = PoolScope::from_str(&row.pool_type).unwrap_or_else(|_| {
                warn!(employee_id = row.id, pool_type = %row.pool_type,
                    "Unknown pool type, defaulting to service");
                PoolScope::Service
            });
            EmployeeProfile {
                contracts: contracts_by_emp.remove(&row.id).unwrap_or_default(),
                absences: absences_by_emp.remove(&row.id).unwrap_or_default(),
                employee: Employee {
                    id: row.id,
                    display_name: row.display_name,
                    active: row.active,
                    pool: pool_scope,
                    participation_pct: row.participation_pct,
                    color: row.color,
                },
            }
        })
        .collect())
}

use sqlx::MySqlPool;
use uuid::Uuid;

use crate::model::payroll::PayrollPreview;

pub struct ConfirmOutcome {
    pub run_id: u64,
    pub reference: String,
}

/// Persist an accepted preview: one run row plus one receipt per payout
/// line, inside a single transaction so a failed receipt insert can
/// never leave an orphaned run. Rows are append-only; a correction is a
/// new run.
pub async fn persist_run(pool: &MySqlPool, preview: &PayrollPreview) -> Result<ConfirmOutcome, sqlx::Error> {
    let reference = Uuid::new_v4().to_string();
    let metadata = serde_json::json!({
        "service_tier": preview.service_tier,
        "total_tier": preview.total_tier,
        "pools": preview.pools,
        "cash_needed": preview.cash_needed,
        "days": preview.days,
    })
    .to_string();

    let mut tx = pool.begin().await?;

    let run = sqlx::query(
        r#"
        INSERT INTO payroll_runs
            (reference, period_start, period_end,
             service_revenue, retail_revenue, total_revenue,
             service_tier_pct, total_tier_pct, metadata)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&reference)
    .bind(preview.period.start)
    .bind(preview.period.end)
    .bind(preview.service_revenue)
    .bind(preview.retail_revenue)
    .bind(preview.total_revenue)
    .bind(preview.service_tier.percentage)
    .bind(preview.total_tier.percentage)
    .bind(&metadata)
    .execute(&mut *tx)
    .await?;

    let run_id = run.last_insert_id();

    for line in &preview.lines {
        sqlx::query(
            r#"
            INSERT INTO payroll_receipts
                (run_id, employee_id, employee_name,
                 days_worked, days_absent_justified, days_absent_unjustified,
                 weekly_salary, payout_bank, payout_cash_salary,
                 commission_earned, bonus, commission_lost,
                 payout_commission, total_payout, note)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(run_id)
        .bind(line.employee_id)
        .bind(&line.employee_name)
        .bind(line.days_worked)
        .bind(line.days_absent_justified)
        .bind(line.days_absent_unjustified)
        .bind(line.weekly_salary)
        .bind(line.payout_bank)
        .bind(line.payout_cash_salary)
        .bind(line.commission_earned)
        .bind(line.bonus)
        .bind(line.commission_lost)
        .bind(line.payout_commission)
        .bind(line.total_payout)
        .bind(&line.note)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(ConfirmOutcome { run_id, reference })
}

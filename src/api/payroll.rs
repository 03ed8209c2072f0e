use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::config::Config;
use crate::engine;
use crate::model::payroll::{PayPeriod, PayrollPreview, PayrollReceipt, PayrollRun};
use crate::store::{confirm, load};

/// Longest period a single preview may cover. The payroll is
/// week-oriented; the cap only bounds request cost.
const MAX_PERIOD_DAYS: i64 = 31;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PreviewQuery {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    #[param(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-11", format = "date", value_type = String)]
    #[param(example = "2026-01-11", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

#[derive(Serialize, ToSchema)]
pub struct ConfirmResponse {
    #[schema(example = 41)]
    pub run_id: u64,
    #[schema(example = "6f9a1c2e-8d0b-4f3a-9c1d-2b7e5a4f6c8d")]
    pub reference: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RunQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct RunListResponse {
    pub data: Vec<PayrollRun>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

#[derive(Serialize, ToSchema)]
pub struct RunDetailResponse {
    pub run: PayrollRun,
    pub receipts: Vec<PayrollReceipt>,
}

/// Compute a payroll preview for a period. Pure read: loads a snapshot
/// of sales, tiers, employees, contracts and absences, runs the engine,
/// persists nothing.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/preview",
    params(PreviewQuery),
    responses(
        (status = 200, description = "Computed payroll preview", body = PayrollPreview),
        (status = 400, description = "Invalid period"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn preview(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<PreviewQuery>,
) -> actix_web::Result<impl Responder> {
    if query.start_date > query.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    let period = PayPeriod::new(query.start_date, query.end_date);
    if period.num_days() > MAX_PERIOD_DAYS {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": format!("Period cannot exceed {MAX_PERIOD_DAYS} days")
        })));
    }

    let input = load::load_snapshot(pool.get_ref(), period, config.business_tz)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load payroll snapshot");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let result = engine::compute_preview(&input);

    Ok(HttpResponse::Ok().json(result))
}

/// Confirm a previewed payroll. Writes one run plus one receipt per
/// payout line in a single transaction; on any failure nothing is
/// persisted and the caller must retry Confirm.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/confirm",
    request_body = PayrollPreview,
    responses(
        (status = 201, description = "Payroll run persisted", body = ConfirmResponse),
        (status = 400, description = "Preview has no payout lines"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn confirm_run(
    pool: web::Data<MySqlPool>,
    payload: web::Json<PayrollPreview>,
) -> actix_web::Result<impl Responder> {
    if payload.lines.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Preview has no payout lines"
        })));
    }

    let outcome = confirm::persist_run(pool.get_ref(), &payload)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to persist payroll run");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    tracing::info!(
        run_id = outcome.run_id,
        reference = %outcome.reference,
        lines = payload.lines.len(),
        "Payroll run confirmed"
    );

    Ok(HttpResponse::Created().json(ConfirmResponse {
        run_id: outcome.run_id,
        reference: outcome.reference,
    }))
}

/// List confirmed payroll runs, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/runs",
    params(RunQuery),
    responses(
        (status = 200, description = "Paginated run list", body = RunListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn list_runs(
    pool: web::Data<MySqlPool>,
    query: web::Query<RunQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payroll_runs")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to count payroll runs");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let data = sqlx::query_as::<_, PayrollRun>(
        r#"
        SELECT id, reference, period_start, period_end,
               service_revenue, retail_revenue, total_revenue,
               service_tier_pct, total_tier_pct, metadata, created_at
        FROM payroll_runs
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(per_page as i64)
    .bind(offset as i64)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch payroll runs");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(RunListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// One run with its receipts, enough for the external renderer to print
/// every receipt again.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/runs/{run_id}",
    params(
        ("run_id" = u64, Path, description = "ID of the payroll run")
    ),
    responses(
        (status = 200, description = "Run with receipts", body = RunDetailResponse),
        (status = 404, description = "Run not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn get_run(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let run_id = path.into_inner();

    let run = sqlx::query_as::<_, PayrollRun>(
        r#"
        SELECT id, reference, period_start, period_end,
               service_revenue, retail_revenue, total_revenue,
               service_tier_pct, total_tier_pct, metadata, created_at
        FROM payroll_runs
        WHERE id = ?
        "#,
    )
    .bind(run_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, run_id, "Failed to fetch payroll run");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let run = match run {
        Some(r) => r,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": "Payroll run not found"
            })));
        }
    };

    let receipts = sqlx::query_as::<_, PayrollReceipt>(
        r#"
        SELECT id, run_id, employee_id, employee_name,
               days_worked, days_absent_justified, days_absent_unjustified,
               weekly_salary, payout_bank, payout_cash_salary,
               commission_earned, bonus, commission_lost,
               payout_commission, total_payout, note
        FROM payroll_receipts
        WHERE run_id = ?
        ORDER BY employee_id
        "#,
    )
    .bind(run_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, run_id, "Failed to fetch payroll receipts");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(RunDetailResponse { run, receipts }))
}

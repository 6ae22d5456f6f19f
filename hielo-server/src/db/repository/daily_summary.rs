//! Driver Daily Summary Repository
//!
//! One row per (driver, sale_date). The three payment bucket totals are
//! derived state: [`recompute_totals`] is the only writer, invoked on the
//! caller's open transaction after every sale mutation.

use super::{RepoError, RepoResult, directory};
use shared::models::{DailySummaryStart, DriverDailySummary};
use sqlx::SqlitePool;

const SUMMARY_COLUMNS: &str = "id, driver_id, sale_date, route_id, total_cash_sales_value, total_new_credit_sales_value, total_other_payment_sales_value, reconciliation_status, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DriverDailySummary>> {
    let summary = sqlx::query_as::<_, DriverDailySummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM driver_daily_summary WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(summary)
}

pub async fn find_by_driver_date(
    pool: &SqlitePool,
    driver_id: i64,
    sale_date: &str,
) -> RepoResult<Option<DriverDailySummary>> {
    let summary = sqlx::query_as::<_, DriverDailySummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM driver_daily_summary WHERE driver_id = ? AND sale_date = ?"
    ))
    .bind(driver_id)
    .bind(sale_date.to_string())
    .fetch_optional(pool)
    .await?;
    Ok(summary)
}

pub async fn find_all(
    pool: &SqlitePool,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<DriverDailySummary>> {
    let summaries = sqlx::query_as::<_, DriverDailySummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM driver_daily_summary ORDER BY sale_date DESC, driver_id LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(summaries)
}

pub async fn find_by_date(pool: &SqlitePool, sale_date: &str) -> RepoResult<Vec<DriverDailySummary>> {
    let summaries = sqlx::query_as::<_, DriverDailySummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM driver_daily_summary WHERE sale_date = ? ORDER BY driver_id"
    ))
    .bind(sale_date.to_string())
    .fetch_all(pool)
    .await?;
    Ok(summaries)
}

/// Start a driver's day — idempotent upsert by (driver_id, sale_date).
///
/// A second call for the same natural key returns the existing row unchanged
/// instead of erroring.
pub async fn start_day(
    pool: &SqlitePool,
    data: DailySummaryStart,
) -> RepoResult<DriverDailySummary> {
    let driver = directory::find_driver(pool, data.driver_id)
        .await?
        .ok_or_else(|| RepoError::Validation(format!("Unknown driver: {}", data.driver_id)))?;
    if !driver.is_active {
        return Err(RepoError::Validation(format!(
            "Driver {} is inactive",
            data.driver_id
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    // INSERT OR IGNORE: only inserts if (driver_id, sale_date) doesn't exist
    sqlx::query(
        "INSERT OR IGNORE INTO driver_daily_summary (id, driver_id, sale_date, route_id, reconciliation_status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 'PENDING', ?5, ?5)",
    )
    .bind(id)
    .bind(data.driver_id)
    .bind(data.sale_date.clone())
    .bind(data.route_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_driver_date(pool, data.driver_id, &data.sale_date)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to start driver day".into()))
}

/// Re-derive the three payment bucket totals from the summary's current
/// sales and persist them.
///
/// Runs on the caller's open transaction so the totals commit atomically
/// with the mutation that invalidated them. No other code path writes the
/// totals.
pub async fn recompute_totals(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    summary_id: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE driver_daily_summary SET \
            total_cash_sales_value = COALESCE((SELECT SUM(total_sale_amount) FROM driver_sale WHERE driver_daily_summary_id = ?1 AND payment_type = 'CASH'), 0.0), \
            total_new_credit_sales_value = COALESCE((SELECT SUM(total_sale_amount) FROM driver_sale WHERE driver_daily_summary_id = ?1 AND payment_type = 'CREDIT'), 0.0), \
            total_other_payment_sales_value = COALESCE((SELECT SUM(total_sale_amount) FROM driver_sale WHERE driver_daily_summary_id = ?1 AND payment_type NOT IN ('CASH', 'CREDIT')), 0.0), \
            updated_at = ?2 \
        WHERE id = ?1",
    )
    .bind(summary_id)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Driver daily summary {summary_id} not found"
        )));
    }
    Ok(())
}

/// Update the summary's route assignment. No recompute needed.
pub async fn update_route(
    pool: &SqlitePool,
    summary_id: i64,
    route_id: Option<i64>,
) -> RepoResult<DriverDailySummary> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE driver_daily_summary SET route_id = ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(route_id)
    .bind(now)
    .bind(summary_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Driver daily summary {summary_id} not found"
        )));
    }
    find_by_id(pool, summary_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Driver daily summary {summary_id} not found")))
}

/// One-way Pending → Reconciled transition. Not re-openable through this API.
pub async fn mark_reconciled(pool: &SqlitePool, summary_id: i64) -> RepoResult<DriverDailySummary> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE driver_daily_summary SET reconciliation_status = 'RECONCILED', updated_at = ?1 WHERE id = ?2 AND reconciliation_status = 'PENDING'",
    )
    .bind(now)
    .bind(summary_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return match find_by_id(pool, summary_id).await? {
            Some(_) => Err(RepoError::Duplicate(format!(
                "Driver daily summary {summary_id} is already reconciled"
            ))),
            None => Err(RepoError::NotFound(format!(
                "Driver daily summary {summary_id} not found"
            ))),
        };
    }
    find_by_id(pool, summary_id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Driver daily summary {summary_id} not found")))
}

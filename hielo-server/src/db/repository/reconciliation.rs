//! Reconciliation Repository
//!
//! Read-only derived view: per product, loaded − sold − returned = loss for
//! one (driver, date). Gated on the day having been started — no summary, no
//! reconciliation.

use super::{RepoError, RepoResult, daily_summary};
use shared::models::{ProductReconciliationRow, ReconciliationSummary};
use sqlx::SqlitePool;

/// Build the reconciliation view for one driver and date.
///
/// Every transaction type counts toward `sold` — giveaways and internal use
/// consume loaded inventory even though they carry no value. A negative loss
/// signals a data-entry or timing inconsistency and is surfaced as-is.
pub async fn reconciliation_summary(
    pool: &SqlitePool,
    driver_id: i64,
    date: &str,
) -> RepoResult<ReconciliationSummary> {
    let summary = daily_summary::find_by_driver_date(pool, driver_id, date)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!(
                "No daily summary for driver {driver_id} on {date}"
            ))
        })?;

    // Three grouped sums joined on product_id; products appearing in any of
    // the three sources get a row.
    let rows = sqlx::query_as::<_, ProductReconciliationRow>(
        r#"
        WITH loaded AS (
            SELECT product_id, SUM(quantity_loaded) AS qty
            FROM loading_log
            WHERE driver_id = ?1 AND log_date = ?2
            GROUP BY product_id
        ),
        sold AS (
            SELECT i.product_id AS product_id, SUM(i.quantity_sold) AS qty
            FROM driver_sale_item i
            JOIN driver_sale s ON s.id = i.driver_sale_id
            WHERE s.driver_daily_summary_id = ?3
            GROUP BY i.product_id
        ),
        returned AS (
            SELECT product_id, SUM(quantity_returned) AS qty
            FROM product_return
            WHERE driver_id = ?1 AND return_date = ?2
            GROUP BY product_id
        ),
        ids AS (
            SELECT product_id FROM loaded
            UNION
            SELECT product_id FROM sold
            UNION
            SELECT product_id FROM returned
        )
        SELECT
            ids.product_id AS product_id,
            COALESCE(p.name, 'unknown product') AS product_name,
            COALESCE(l.qty, 0.0) AS loaded,
            COALESCE(s.qty, 0.0) AS sold,
            COALESCE(r.qty, 0.0) AS returned,
            COALESCE(l.qty, 0.0) - COALESCE(s.qty, 0.0) - COALESCE(r.qty, 0.0) AS loss
        FROM ids
        LEFT JOIN loaded l ON l.product_id = ids.product_id
        LEFT JOIN sold s ON s.product_id = ids.product_id
        LEFT JOIN returned r ON r.product_id = ids.product_id
        LEFT JOIN product p ON p.id = ids.product_id
        ORDER BY ids.product_id
    "#,
    )
    .bind(driver_id)
    .bind(date.to_string())
    .bind(summary.id)
    .fetch_all(pool)
    .await?;

    Ok(ReconciliationSummary {
        summary,
        product_reconciliation: rows,
    })
}

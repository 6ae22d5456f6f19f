//! Product Return & Packaging Log Repository
//!
//! Same full-day-replace pattern as the sales batch: a submission deletes
//! the day's prior return rows and inserts the new sets unconditionally.
//! Returns never touch the summary's cash/credit buckets — they only feed
//! the reconciliation view.

use super::{RepoError, RepoResult, daily_summary};
use shared::models::{
    BatchReturnsOutcome, PackagingLog, PackagingLogInput, ProductReturn, ProductReturnCreate,
    ProductReturnInput,
};
use sqlx::SqlitePool;

const RETURN_COLUMNS: &str = "id, driver_id, return_date, product_id, quantity_returned, loss_reason_id, custom_reason_for_loss, driver_daily_summary_id, created_at";
const PACKAGING_COLUMNS: &str = "id, driver_id, log_date, packaging_type_id, quantity_out, quantity_returned, driver_daily_summary_id, created_at";

/// Replace the day's product returns and packaging logs in one transaction.
///
/// The caller is expected to have pre-validated quantities; this path has no
/// per-row skip logic, and reasons may be null.
pub async fn submit_daily_returns(
    pool: &SqlitePool,
    driver_id: i64,
    return_date: &str,
    summary_id: i64,
    product_items: Vec<ProductReturnInput>,
    packaging_items: Vec<PackagingLogInput>,
) -> RepoResult<BatchReturnsOutcome> {
    daily_summary::find_by_id(pool, summary_id)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!("Driver daily summary {summary_id} not found"))
        })?;

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM product_return WHERE driver_id = ? AND return_date = ?")
        .bind(driver_id)
        .bind(return_date.to_string())
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM packaging_log WHERE driver_id = ? AND log_date = ?")
        .bind(driver_id)
        .bind(return_date.to_string())
        .execute(&mut *tx)
        .await?;

    for item in &product_items {
        sqlx::query(
            "INSERT INTO product_return (id, driver_id, return_date, product_id, quantity_returned, loss_reason_id, custom_reason_for_loss, driver_daily_summary_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(shared::util::snowflake_id())
        .bind(driver_id)
        .bind(return_date.to_string())
        .bind(item.product_id)
        .bind(item.quantity_returned)
        .bind(item.loss_reason_id)
        .bind(item.custom_reason_for_loss.clone())
        .bind(summary_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    for item in &packaging_items {
        sqlx::query(
            "INSERT INTO packaging_log (id, driver_id, log_date, packaging_type_id, quantity_out, quantity_returned, driver_daily_summary_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(shared::util::snowflake_id())
        .bind(driver_id)
        .bind(return_date.to_string())
        .bind(item.packaging_type_id)
        .bind(item.quantity_out)
        .bind(item.quantity_returned)
        .bind(summary_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    // No recompute_totals: returns don't affect the payment buckets
    tx.commit().await?;

    Ok(BatchReturnsOutcome {
        product_returns: product_items.len() as i64,
        packaging_logs: packaging_items.len() as i64,
    })
}

/// Interactive single return — unlike the batch path, a reason is required.
pub async fn create_product_return(
    pool: &SqlitePool,
    data: ProductReturnCreate,
) -> RepoResult<ProductReturn> {
    let has_reason = data.loss_reason_id.is_some()
        || data
            .custom_reason_for_loss
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
    if !has_reason {
        return Err(RepoError::Validation(
            "A loss reason is required (loss_reason_id or custom_reason_for_loss)".into(),
        ));
    }
    if !data.quantity_returned.is_finite() || data.quantity_returned <= 0.0 {
        return Err(RepoError::Validation(format!(
            "Invalid quantity_returned: {}",
            data.quantity_returned
        )));
    }

    let summary = daily_summary::find_by_driver_date(pool, data.driver_id, &data.return_date)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!(
                "No daily summary for driver {} on {}",
                data.driver_id, data.return_date
            ))
        })?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO product_return (id, driver_id, return_date, product_id, quantity_returned, loss_reason_id, custom_reason_for_loss, driver_daily_summary_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(data.driver_id)
    .bind(data.return_date.clone())
    .bind(data.product_id)
    .bind(data.quantity_returned)
    .bind(data.loss_reason_id)
    .bind(data.custom_reason_for_loss.clone())
    .bind(summary.id)
    .bind(now)
    .execute(pool)
    .await?;

    find_return_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product return".into()))
}

pub async fn find_return_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductReturn>> {
    let row = sqlx::query_as::<_, ProductReturn>(&format!(
        "SELECT {RETURN_COLUMNS} FROM product_return WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list_product_returns(
    pool: &SqlitePool,
    driver_id: i64,
    return_date: &str,
) -> RepoResult<Vec<ProductReturn>> {
    let rows = sqlx::query_as::<_, ProductReturn>(&format!(
        "SELECT {RETURN_COLUMNS} FROM product_return WHERE driver_id = ? AND return_date = ? ORDER BY product_id, id"
    ))
    .bind(driver_id)
    .bind(return_date.to_string())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_packaging_logs(
    pool: &SqlitePool,
    driver_id: i64,
    log_date: &str,
) -> RepoResult<Vec<PackagingLog>> {
    let rows = sqlx::query_as::<_, PackagingLog>(&format!(
        "SELECT {PACKAGING_COLUMNS} FROM packaging_log WHERE driver_id = ? AND log_date = ? ORDER BY packaging_type_id, id"
    ))
    .bind(driver_id)
    .bind(log_date.to_string())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_util::memory_pool;
    use shared::models::DailySummaryStart;
    use sqlx::SqlitePool;

    async fn test_pool() -> (SqlitePool, i64) {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO driver (id, name, is_active) VALUES (7, 'Marco', 1)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO product (id, name, default_unit_price) VALUES (9, 'Ice bag 5kg', 10.0)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO loss_reason (id, label) VALUES (1, 'Melted')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO packaging_type (id, name) VALUES (4, 'Basket')")
            .execute(&pool)
            .await
            .unwrap();
        let summary = daily_summary::start_day(
            &pool,
            DailySummaryStart {
                driver_id: 7,
                sale_date: "2024-03-01".to_string(),
                route_id: None,
            },
        )
        .await
        .unwrap();
        (pool, summary.id)
    }

    fn product_item(product_id: i64, qty: f64) -> ProductReturnInput {
        ProductReturnInput {
            product_id,
            quantity_returned: qty,
            loss_reason_id: None,
            custom_reason_for_loss: None,
        }
    }

    #[tokio::test]
    async fn test_submit_inserts_both_sets() {
        let (pool, summary_id) = test_pool().await;

        let outcome = submit_daily_returns(
            &pool,
            7,
            "2024-03-01",
            summary_id,
            vec![product_item(9, 12.0)],
            vec![PackagingLogInput {
                packaging_type_id: 4,
                quantity_out: 30.0,
                quantity_returned: 28.0,
            }],
        )
        .await
        .unwrap();

        assert_eq!(outcome.product_returns, 1);
        assert_eq!(outcome.packaging_logs, 1);

        let returns = list_product_returns(&pool, 7, "2024-03-01").await.unwrap();
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].quantity_returned, 12.0);
        // Batch path tolerates missing reasons
        assert!(returns[0].loss_reason_id.is_none());

        let packaging = list_packaging_logs(&pool, 7, "2024-03-01").await.unwrap();
        assert_eq!(packaging.len(), 1);
        assert_eq!(packaging[0].quantity_out, 30.0);
    }

    #[tokio::test]
    async fn test_submit_replaces_prior_day() {
        let (pool, summary_id) = test_pool().await;

        submit_daily_returns(
            &pool,
            7,
            "2024-03-01",
            summary_id,
            vec![product_item(9, 12.0), product_item(9, 3.0)],
            vec![],
        )
        .await
        .unwrap();

        submit_daily_returns(
            &pool,
            7,
            "2024-03-01",
            summary_id,
            vec![product_item(9, 5.0)],
            vec![],
        )
        .await
        .unwrap();

        let returns = list_product_returns(&pool, 7, "2024-03-01").await.unwrap();
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].quantity_returned, 5.0);
    }

    #[tokio::test]
    async fn test_submit_missing_summary() {
        let (pool, _) = test_pool().await;
        let err = submit_daily_returns(&pool, 7, "2024-03-01", 999, vec![], vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_does_not_touch_totals() {
        let (pool, summary_id) = test_pool().await;

        sqlx::query(
            "UPDATE driver_daily_summary SET total_cash_sales_value = 99.0 WHERE id = ?",
        )
        .bind(summary_id)
        .execute(&pool)
        .await
        .unwrap();

        submit_daily_returns(&pool, 7, "2024-03-01", summary_id, vec![product_item(9, 1.0)], vec![])
            .await
            .unwrap();

        let summary = daily_summary::find_by_id(&pool, summary_id).await.unwrap().unwrap();
        assert_eq!(summary.total_cash_sales_value, 99.0);
    }

    #[tokio::test]
    async fn test_interactive_return_requires_reason() {
        let (pool, _) = test_pool().await;

        let err = create_product_return(
            &pool,
            ProductReturnCreate {
                driver_id: 7,
                return_date: "2024-03-01".to_string(),
                product_id: 9,
                quantity_returned: 2.0,
                loss_reason_id: None,
                custom_reason_for_loss: Some("   ".to_string()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let created = create_product_return(
            &pool,
            ProductReturnCreate {
                driver_id: 7,
                return_date: "2024-03-01".to_string(),
                product_id: 9,
                quantity_returned: 2.0,
                loss_reason_id: Some(1),
                custom_reason_for_loss: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(created.loss_reason_id, Some(1));
    }

    #[tokio::test]
    async fn test_interactive_return_requires_started_day() {
        let (pool, _) = test_pool().await;

        let err = create_product_return(
            &pool,
            ProductReturnCreate {
                driver_id: 7,
                return_date: "2024-03-02".to_string(), // day not started
                product_id: 9,
                quantity_returned: 2.0,
                loss_reason_id: Some(1),
                custom_reason_for_loss: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}

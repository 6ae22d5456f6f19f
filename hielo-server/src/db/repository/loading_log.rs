//! Loading Log Repository
//!
//! Records quantities of product loaded onto a driver's vehicle, grouped
//! into batches by a key minted at creation time. Loads are inventory-only:
//! nothing here touches the daily summary totals.

use super::{RepoError, RepoResult, daily_summary, directory};
use shared::models::{
    LoadingBatchCreate, LoadingBatchUpdate, LoadingItemInput, LoadingLog, LoadingLogFilter,
    LoadingLogRow, ReconciliationStatus,
};
use sqlx::SqlitePool;

const LOG_COLUMNS: &str = "id, batch_key, driver_id, route_id, load_type, log_date, loaded_at, product_id, quantity_loaded, note, recorded_by, created_at, updated_at";

fn validate_items(items: &[LoadingItemInput]) -> RepoResult<()> {
    if items.is_empty() {
        return Err(RepoError::Validation(
            "Loading batch must contain at least one item".into(),
        ));
    }
    for item in items {
        if !item.quantity_loaded.is_finite() || item.quantity_loaded <= 0.0 {
            return Err(RepoError::Validation(format!(
                "Invalid quantity {} for product {}",
                item.quantity_loaded, item.product_id
            )));
        }
    }
    Ok(())
}

/// Reject mutation once the day has been reconciled.
async fn ensure_day_open(pool: &SqlitePool, driver_id: i64, log_date: &str) -> RepoResult<()> {
    if let Some(summary) = daily_summary::find_by_driver_date(pool, driver_id, log_date).await?
        && summary.reconciliation_status == ReconciliationStatus::Reconciled
    {
        return Err(RepoError::BusinessRule(format!(
            "Day {log_date} for driver {driver_id} is already reconciled"
        )));
    }
    Ok(())
}

/// Record a loading batch — one row per item, all sharing a freshly minted
/// batch key.
///
/// Whole-batch reject on empty items or any non-positive quantity; this path
/// has no per-row tolerance.
pub async fn record_batch(
    pool: &SqlitePool,
    data: LoadingBatchCreate,
    recorded_by: Option<i64>,
) -> RepoResult<Vec<LoadingLog>> {
    validate_items(&data.items)?;

    directory::find_driver(pool, data.driver_id)
        .await?
        .ok_or_else(|| RepoError::Validation(format!("Unknown driver: {}", data.driver_id)))?;

    let log_date = data
        .log_date
        .ok_or_else(|| RepoError::Validation("log_date is required".into()))?;

    let now = shared::util::now_millis();
    let loaded_at = data.loaded_at.unwrap_or(now);
    let batch_key = shared::util::mint_batch_key();

    let mut tx = pool.begin().await?;
    for item in &data.items {
        sqlx::query(
            "INSERT INTO loading_log (id, batch_key, driver_id, route_id, load_type, log_date, loaded_at, product_id, quantity_loaded, note, recorded_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
        )
        .bind(shared::util::snowflake_id())
        .bind(batch_key.clone())
        .bind(data.driver_id)
        .bind(data.route_id)
        .bind(data.load_type)
        .bind(log_date.clone())
        .bind(loaded_at)
        .bind(item.product_id)
        .bind(item.quantity_loaded)
        .bind(data.note.clone())
        .bind(recorded_by)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    find_by_batch_key(pool, &batch_key).await
}

/// Replace a batch's item rows wholesale, preserving the batch key and its
/// driver/date/load-type association.
pub async fn update_batch(
    pool: &SqlitePool,
    batch_key: &str,
    data: LoadingBatchUpdate,
) -> RepoResult<Vec<LoadingLog>> {
    validate_items(&data.items)?;

    let existing = find_by_batch_key(pool, batch_key).await?;
    let first = existing
        .first()
        .ok_or_else(|| RepoError::NotFound(format!("Loading batch {batch_key} not found")))?;

    ensure_day_open(pool, first.driver_id, &first.log_date).await?;

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM loading_log WHERE batch_key = ?")
        .bind(batch_key.to_string())
        .execute(&mut *tx)
        .await?;
    for item in &data.items {
        sqlx::query(
            "INSERT INTO loading_log (id, batch_key, driver_id, route_id, load_type, log_date, loaded_at, product_id, quantity_loaded, note, recorded_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )
        .bind(shared::util::snowflake_id())
        .bind(batch_key.to_string())
        .bind(first.driver_id)
        .bind(first.route_id)
        .bind(first.load_type)
        .bind(first.log_date.clone())
        .bind(first.loaded_at)
        .bind(item.product_id)
        .bind(item.quantity_loaded)
        .bind(data.note.clone())
        .bind(first.recorded_by)
        .bind(first.created_at)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    find_by_batch_key(pool, batch_key).await
}

/// Delete a whole batch. Blocked once the day is reconciled.
pub async fn delete_batch(pool: &SqlitePool, batch_key: &str) -> RepoResult<bool> {
    let existing = find_by_batch_key(pool, batch_key).await?;
    let first = existing
        .first()
        .ok_or_else(|| RepoError::NotFound(format!("Loading batch {batch_key} not found")))?;

    ensure_day_open(pool, first.driver_id, &first.log_date).await?;

    let rows = sqlx::query("DELETE FROM loading_log WHERE batch_key = ?")
        .bind(batch_key.to_string())
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn find_by_batch_key(pool: &SqlitePool, batch_key: &str) -> RepoResult<Vec<LoadingLog>> {
    let logs = sqlx::query_as::<_, LoadingLog>(&format!(
        "SELECT {LOG_COLUMNS} FROM loading_log WHERE batch_key = ? ORDER BY product_id"
    ))
    .bind(batch_key.to_string())
    .fetch_all(pool)
    .await?;
    Ok(logs)
}

/// Flat list with joined display names. One row per (batch, product);
/// grouping by batch key is the caller's concern.
pub async fn list(pool: &SqlitePool, filter: LoadingLogFilter) -> RepoResult<Vec<LoadingLogRow>> {
    let mut sql = String::from(
        "SELECT l.id, l.batch_key, l.driver_id, d.name AS driver_name, l.route_id, l.load_type, l.log_date, l.loaded_at, l.product_id, p.name AS product_name, l.quantity_loaded, l.note \
         FROM loading_log l \
         JOIN driver d ON d.id = l.driver_id \
         JOIN product p ON p.id = l.product_id \
         WHERE 1 = 1",
    );
    if filter.driver_id.is_some() {
        sql.push_str(" AND l.driver_id = ?");
    }
    if filter.date.is_some() {
        sql.push_str(" AND l.log_date = ?");
    }
    if filter.driver_name.is_some() {
        sql.push_str(" AND d.name LIKE ?");
    }
    sql.push_str(" ORDER BY l.loaded_at DESC, l.batch_key, l.product_id");

    let mut query = sqlx::query_as::<_, LoadingLogRow>(&sql);
    if let Some(driver_id) = filter.driver_id {
        query = query.bind(driver_id);
    }
    if let Some(date) = filter.date {
        query = query.bind(date);
    }
    if let Some(name) = filter.driver_name {
        query = query.bind(format!("%{name}%"));
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_util::memory_pool;
    use shared::models::{DailySummaryStart, LoadType};
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO driver (id, name, is_active) VALUES (7, 'Marco', 1)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO product (id, name, default_unit_price) VALUES (9, 'Ice bag 5kg', 2.5)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO product (id, name, default_unit_price) VALUES (10, 'Ice block', 4.0)")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn batch(driver_id: i64, items: Vec<(i64, f64)>) -> LoadingBatchCreate {
        LoadingBatchCreate {
            driver_id,
            route_id: None,
            load_type: LoadType::Initial,
            log_date: Some("2024-03-01".to_string()),
            loaded_at: Some(1_000),
            items: items
                .into_iter()
                .map(|(product_id, quantity_loaded)| LoadingItemInput {
                    product_id,
                    quantity_loaded,
                })
                .collect(),
            note: None,
        }
    }

    #[tokio::test]
    async fn test_record_batch_one_row_per_item() {
        let pool = test_pool().await;
        let rows = record_batch(&pool, batch(7, vec![(9, 100.0), (10, 20.0)]), Some(1))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        // All rows share the minted batch key
        assert_eq!(rows[0].batch_key, rows[1].batch_key);
        assert_eq!(rows[0].recorded_by, Some(1));
    }

    #[tokio::test]
    async fn test_record_batch_rejects_empty_items() {
        let pool = test_pool().await;
        let err = record_batch(&pool, batch(7, vec![]), None).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_record_batch_rejects_non_positive_quantity() {
        let pool = test_pool().await;
        let err = record_batch(&pool, batch(7, vec![(9, 100.0), (10, 0.0)]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        // Nothing persisted — the whole batch is rejected
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loading_log")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_record_batch_rejects_unknown_driver() {
        let pool = test_pool().await;
        let err = record_batch(&pool, batch(99, vec![(9, 10.0)]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_batch_replaces_items() {
        let pool = test_pool().await;
        let rows = record_batch(&pool, batch(7, vec![(9, 100.0), (10, 20.0)]), Some(1))
            .await
            .unwrap();
        let key = rows[0].batch_key.clone();

        let replaced = update_batch(
            &pool,
            &key,
            LoadingBatchUpdate {
                items: vec![LoadingItemInput {
                    product_id: 9,
                    quantity_loaded: 80.0,
                }],
                note: Some("corrected".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].batch_key, key);
        assert_eq!(replaced[0].quantity_loaded, 80.0);
        // Driver/date association preserved across the replace
        assert_eq!(replaced[0].driver_id, 7);
        assert_eq!(replaced[0].log_date, "2024-03-01");
    }

    #[tokio::test]
    async fn test_update_batch_missing_key() {
        let pool = test_pool().await;
        let err = update_batch(
            &pool,
            "no-such-batch",
            LoadingBatchUpdate {
                items: vec![LoadingItemInput {
                    product_id: 9,
                    quantity_loaded: 1.0,
                }],
                note: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_batch_blocked_after_reconciliation() {
        let pool = test_pool().await;
        let rows = record_batch(&pool, batch(7, vec![(9, 100.0)]), None)
            .await
            .unwrap();
        let key = rows[0].batch_key.clone();

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
        daily_summary::mark_reconciled(&pool, summary.id).await.unwrap();

        let err = update_batch(
            &pool,
            &key,
            LoadingBatchUpdate {
                items: vec![LoadingItemInput {
                    product_id: 9,
                    quantity_loaded: 50.0,
                }],
                note: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn test_delete_batch() {
        let pool = test_pool().await;
        let rows = record_batch(&pool, batch(7, vec![(9, 100.0), (10, 20.0)]), None)
            .await
            .unwrap();
        let key = rows[0].batch_key.clone();

        assert!(delete_batch(&pool, &key).await.unwrap());
        assert!(find_by_batch_key(&pool, &key).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO driver (id, name, is_active) VALUES (8, 'Paula', 1)")
            .execute(&pool)
            .await
            .unwrap();

        record_batch(&pool, batch(7, vec![(9, 100.0)]), None).await.unwrap();
        record_batch(&pool, batch(8, vec![(10, 30.0)]), None).await.unwrap();

        let all = list(&pool, LoadingLogFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let marco_only = list(
            &pool,
            LoadingLogFilter {
                driver_id: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(marco_only.len(), 1);
        assert_eq!(marco_only[0].driver_name, "Marco");

        let by_name = list(
            &pool,
            LoadingLogFilter {
                driver_name: Some("Pau".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].product_name, "Ice block");

        let by_date = list(
            &pool,
            LoadingLogFilter {
                date: Some("2024-03-02".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(by_date.is_empty());
    }
}

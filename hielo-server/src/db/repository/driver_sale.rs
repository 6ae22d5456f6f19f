//! Driver Sale Repository — batch sales processor
//!
//! A day's sales arrive as one batch and replace whatever was submitted
//! before (full-day replace, so resubmission is idempotent). Row-level data
//! problems are tolerated: bad entries and bad items are skipped with a
//! logged reason, never failing the batch. Structural problems (missing
//! summary) abort before any write.

use super::{RepoError, RepoResult, daily_summary};
use shared::models::{
    BatchSalesOutcome, Customer, DriverSale, DriverSaleItem, SaleEntryInput, SaleRowOutcome,
    SaleSkipReason, TransactionType,
};
use sqlx::SqlitePool;
use tracing::warn;

/// Resolve the unit price for a sale item.
///
/// Priority: explicit payload price → most recent customer-specific price
/// (by effective_date) → product default.
async fn resolve_unit_price(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    customer_id: i64,
    product_id: i64,
    explicit: Option<f64>,
    default_price: f64,
) -> RepoResult<f64> {
    if let Some(price) = explicit {
        return Ok(price);
    }
    let customer_price: Option<f64> = sqlx::query_scalar(
        "SELECT unit_price FROM customer_product_price WHERE customer_id = ? AND product_id = ? ORDER BY effective_date DESC, id DESC LIMIT 1",
    )
    .bind(customer_id)
    .bind(product_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(customer_price.unwrap_or(default_price))
}

/// A priced, validated item ready for insertion.
struct PricedItem {
    product_id: i64,
    quantity_sold: f64,
    unit_price: f64,
    transaction_type: TransactionType,
}

impl PricedItem {
    /// Monetary contribution — only SALE items carry value.
    fn line_total(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Sale => self.quantity_sold * self.unit_price,
            TransactionType::Giveaway | TransactionType::InternalUse => 0.0,
        }
    }
}

/// Submit the full day's sales for a summary in one transaction.
///
/// Returns a discriminated outcome per submitted entry so callers can see
/// exactly which rows were accepted and which were skipped, and why.
pub async fn submit_daily_sales(
    pool: &SqlitePool,
    summary_id: i64,
    entries: Vec<SaleEntryInput>,
) -> RepoResult<BatchSalesOutcome> {
    // Structural check — aborts before any write
    daily_summary::find_by_id(pool, summary_id)
        .await?
        .ok_or_else(|| {
            RepoError::NotFound(format!("Driver daily summary {summary_id} not found"))
        })?;

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    // Full-day replace: drop the previous submission cycle wholesale
    sqlx::query(
        "DELETE FROM driver_sale_item WHERE driver_sale_id IN (SELECT id FROM driver_sale WHERE driver_daily_summary_id = ?)",
    )
    .bind(summary_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM driver_sale WHERE driver_daily_summary_id = ?")
        .bind(summary_id)
        .execute(&mut *tx)
        .await?;

    let mut results: Vec<SaleRowOutcome> = Vec::with_capacity(entries.len());
    let mut processed_sales = 0_i64;
    let mut skipped_sales = 0_i64;
    let mut total_amount = 0.0_f64;

    for (index, entry) in entries.into_iter().enumerate() {
        let skip = |reason: SaleSkipReason, results: &mut Vec<SaleRowOutcome>| {
            warn!(
                summary_id,
                index,
                customer_id = entry.customer_id,
                ?reason,
                "Skipping sale entry"
            );
            results.push(SaleRowOutcome::Skipped { index, reason });
        };

        let customer: Option<Customer> =
            sqlx::query_as("SELECT id, name, route_id, is_active FROM customer WHERE id = ?")
                .bind(entry.customer_id)
                .fetch_optional(&mut *tx)
                .await?;
        let customer = match customer {
            Some(c) if c.is_active => c,
            Some(_) => {
                skip(SaleSkipReason::InactiveCustomer, &mut results);
                skipped_sales += 1;
                continue;
            }
            None => {
                skip(SaleSkipReason::UnknownCustomer, &mut results);
                skipped_sales += 1;
                continue;
            }
        };

        if entry.items.is_empty() {
            skip(SaleSkipReason::NoItems, &mut results);
            skipped_sales += 1;
            continue;
        }

        // Per-item tolerance: invalid items are dropped, the rest proceed
        let mut items: Vec<PricedItem> = Vec::with_capacity(entry.items.len());
        for item in &entry.items {
            if !item.quantity_sold.is_finite() || item.quantity_sold <= 0.0 {
                warn!(
                    summary_id,
                    index,
                    product_id = item.product_id,
                    quantity = item.quantity_sold,
                    "Dropping sale item with invalid quantity"
                );
                continue;
            }
            let default_price: Option<f64> =
                sqlx::query_scalar("SELECT default_unit_price FROM product WHERE id = ?")
                    .bind(item.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let Some(default_price) = default_price else {
                warn!(
                    summary_id,
                    index,
                    product_id = item.product_id,
                    "Dropping sale item with unknown product"
                );
                continue;
            };
            let unit_price = resolve_unit_price(
                &mut tx,
                customer.id,
                item.product_id,
                item.unit_price,
                default_price,
            )
            .await?;
            items.push(PricedItem {
                product_id: item.product_id,
                quantity_sold: item.quantity_sold,
                unit_price,
                transaction_type: item.transaction_type,
            });
        }

        if items.is_empty() {
            skip(SaleSkipReason::NoValidItems, &mut results);
            skipped_sales += 1;
            continue;
        }

        let total_sale_amount: f64 = items.iter().map(PricedItem::line_total).sum();

        let sale_id = shared::util::snowflake_id();
        sqlx::query(
            "INSERT INTO driver_sale (id, driver_daily_summary_id, customer_id, payment_type, note, total_sale_amount, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(sale_id)
        .bind(summary_id)
        .bind(entry.customer_id)
        .bind(entry.payment_type)
        .bind(entry.note.clone())
        .bind(total_sale_amount)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                "INSERT INTO driver_sale_item (id, driver_sale_id, product_id, quantity_sold, unit_price, transaction_type) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(shared::util::snowflake_id())
            .bind(sale_id)
            .bind(item.product_id)
            .bind(item.quantity_sold)
            .bind(item.unit_price)
            .bind(item.transaction_type)
            .execute(&mut *tx)
            .await?;
        }

        // Last-sale marker per customer — side effect, not part of the
        // financial invariant
        sqlx::query(
            "INSERT INTO customer_sale_stat (customer_id, route_id, sales_count, last_sale_at) VALUES (?1, ?2, 1, ?3) ON CONFLICT (customer_id) DO UPDATE SET route_id = excluded.route_id, sales_count = sales_count + 1, last_sale_at = excluded.last_sale_at",
        )
        .bind(customer.id)
        .bind(customer.route_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        processed_sales += 1;
        total_amount += total_sale_amount;
        results.push(SaleRowOutcome::Accepted {
            index,
            sale_id,
            total_sale_amount,
        });
    }

    daily_summary::recompute_totals(&mut tx, summary_id).await?;
    tx.commit().await?;

    let summary = daily_summary::find_by_id(pool, summary_id)
        .await?
        .ok_or_else(|| {
            RepoError::Database(format!("Driver daily summary {summary_id} vanished"))
        })?;

    Ok(BatchSalesOutcome {
        processed_sales,
        skipped_sales,
        total_amount,
        results,
        summary,
    })
}

/// Sales of one summary, items populated.
pub async fn find_by_summary(pool: &SqlitePool, summary_id: i64) -> RepoResult<Vec<DriverSale>> {
    let mut sales = sqlx::query_as::<_, DriverSale>(
        "SELECT id, driver_daily_summary_id, customer_id, payment_type, note, total_sale_amount, created_at FROM driver_sale WHERE driver_daily_summary_id = ? ORDER BY created_at, id",
    )
    .bind(summary_id)
    .fetch_all(pool)
    .await?;

    for sale in &mut sales {
        sale.items = sqlx::query_as::<_, DriverSaleItem>(
            "SELECT id, driver_sale_id, product_id, quantity_sold, unit_price, transaction_type FROM driver_sale_item WHERE driver_sale_id = ? ORDER BY id",
        )
        .bind(sale.id)
        .fetch_all(pool)
        .await?;
    }
    Ok(sales)
}

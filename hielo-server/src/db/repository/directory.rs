//! Directory Lookups
//!
//! Read-only access to the directory tables owned by the CRUD modules
//! outside this core. Customer and product lookups that must observe an
//! open batch transaction live with the sales processor instead.

use super::RepoResult;
use shared::models::{CustomerSaleStat, Driver};
use sqlx::SqlitePool;

pub async fn find_driver(pool: &SqlitePool, id: i64) -> RepoResult<Option<Driver>> {
    let driver =
        sqlx::query_as::<_, Driver>("SELECT id, name, is_active FROM driver WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(driver)
}

pub async fn find_customer_sale_stat(
    pool: &SqlitePool,
    customer_id: i64,
) -> RepoResult<Option<CustomerSaleStat>> {
    let stat = sqlx::query_as::<_, CustomerSaleStat>(
        "SELECT customer_id, route_id, sales_count, last_sale_at FROM customer_sale_stat WHERE customer_id = ?",
    )
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;
    Ok(stat)
}

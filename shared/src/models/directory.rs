//! Directory Models (司机/客户目录)
//!
//! Row types for the directory tables maintained by the CRUD modules
//! outside this core. Only the rows the reconciliation subsystem selects
//! whole are modelled here; scalar lookups (prices, product existence) go
//! straight through SQL in the sales processor.

use serde::{Deserialize, Serialize};

/// Driver entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Driver {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub route_id: Option<i64>,
    pub is_active: bool,
}

/// Per-customer sale marker, upserted by the batch sales processor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerSaleStat {
    pub customer_id: i64,
    pub route_id: Option<i64>,
    /// Running count of batch-submitted sales for this customer
    pub sales_count: i64,
    /// Last sale timestamp (Unix millis)
    pub last_sale_at: i64,
}

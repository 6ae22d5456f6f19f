//! Driver Daily Summary Model (司机日结)

use serde::{Deserialize, Serialize};

/// Reconciliation status — one-way Pending → Reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReconciliationStatus {
    Pending,
    Reconciled,
}

impl Default for ReconciliationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Driver daily summary — one row per (driver, sale date)
///
/// Anchors the day's sales, returns and reconciliation. The three payment
/// bucket totals are derived state: only `recompute_totals` writes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DriverDailySummary {
    pub id: i64,
    pub driver_id: i64,
    /// Sale date (YYYY-MM-DD)
    pub sale_date: String,
    pub route_id: Option<i64>,
    /// Σ total_sale_amount over CASH sales
    pub total_cash_sales_value: f64,
    /// Σ total_sale_amount over CREDIT sales
    pub total_new_credit_sales_value: f64,
    /// Σ total_sale_amount over every other payment type
    pub total_other_payment_sales_value: f64,
    pub reconciliation_status: ReconciliationStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Start-day payload (idempotent create by natural key)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummaryStart {
    pub driver_id: i64,
    /// Sale date (YYYY-MM-DD)
    pub sale_date: String,
    pub route_id: Option<i64>,
}

/// Route update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRouteUpdate {
    pub route_id: Option<i64>,
}

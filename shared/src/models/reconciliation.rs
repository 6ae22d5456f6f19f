//! Reconciliation Models (对账视图)

use serde::{Deserialize, Serialize};

use super::daily_summary::DriverDailySummary;

/// Per-product reconciliation row (derived, never stored)
///
/// `loss = loaded - sold - returned`. A negative loss signals a data-entry
/// or timing inconsistency and is surfaced as-is, never clamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductReconciliationRow {
    pub product_id: i64,
    pub product_name: String,
    pub loaded: f64,
    pub sold: f64,
    pub returned: f64,
    pub loss: f64,
}

/// Reconciliation view for one (driver, date)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub summary: DriverDailySummary,
    pub product_reconciliation: Vec<ProductReconciliationRow>,
}

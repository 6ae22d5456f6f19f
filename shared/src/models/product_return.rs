//! Product Return & Packaging Log Models (退货/包装回收)

use serde::{Deserialize, Serialize};

/// Product return row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductReturn {
    pub id: i64,
    pub driver_id: i64,
    /// Return date (YYYY-MM-DD)
    pub return_date: String,
    pub product_id: i64,
    pub quantity_returned: f64,
    pub loss_reason_id: Option<i64>,
    pub custom_reason_for_loss: Option<String>,
    pub driver_daily_summary_id: i64,
    pub created_at: i64,
}

/// Packaging log row (empty bags / baskets out vs. returned)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PackagingLog {
    pub id: i64,
    pub driver_id: i64,
    /// Log date (YYYY-MM-DD)
    pub log_date: String,
    pub packaging_type_id: i64,
    pub quantity_out: f64,
    pub quantity_returned: f64,
    pub driver_daily_summary_id: i64,
    pub created_at: i64,
}

/// One product item of a batch returns submission
///
/// Reasons may be null on the batch path; the interactive endpoint requires
/// one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReturnInput {
    pub product_id: i64,
    pub quantity_returned: f64,
    pub loss_reason_id: Option<i64>,
    pub custom_reason_for_loss: Option<String>,
}

/// One packaging item of a batch returns submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingLogInput {
    pub packaging_type_id: i64,
    #[serde(default)]
    pub quantity_out: f64,
    #[serde(default)]
    pub quantity_returned: f64,
}

/// Batch returns submission payload (full-day replace)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReturnsRequest {
    pub driver_id: i64,
    /// Return date (YYYY-MM-DD)
    pub return_date: String,
    pub driver_daily_summary_id: i64,
    #[serde(default)]
    pub product_items: Vec<ProductReturnInput>,
    #[serde(default)]
    pub packaging_items: Vec<PackagingLogInput>,
}

/// Interactive single product return payload (reason required)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReturnCreate {
    pub driver_id: i64,
    pub return_date: String,
    pub product_id: i64,
    pub quantity_returned: f64,
    pub loss_reason_id: Option<i64>,
    pub custom_reason_for_loss: Option<String>,
}

/// Result of a batch returns submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReturnsOutcome {
    pub product_returns: i64,
    pub packaging_logs: i64,
}

//! Driver Sale Models (司机销售)

use serde::{Deserialize, Serialize};

use super::daily_summary::DriverDailySummary;

/// Payment type of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentType {
    Cash,
    Debit,
    Credit,
}

/// Transaction type of a sale item
///
/// Only `Sale` contributes to monetary totals; `Giveaway` and `InternalUse`
/// are zero-value but still consume loaded inventory for reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TransactionType {
    Sale,
    Giveaway,
    InternalUse,
}

impl Default for TransactionType {
    fn default() -> Self {
        Self::Sale
    }
}

/// Driver sale — owned by exactly one daily summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DriverSale {
    pub id: i64,
    pub driver_daily_summary_id: i64,
    pub customer_id: i64,
    pub payment_type: PaymentType,
    pub note: Option<String>,
    /// Derived cache: Σ item totals over SALE items
    pub total_sale_amount: f64,
    pub created_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<DriverSaleItem>,
}

/// Driver sale line item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DriverSaleItem {
    pub id: i64,
    pub driver_sale_id: i64,
    pub product_id: i64,
    pub quantity_sold: f64,
    /// Resolved unit price (explicit → customer-specific → product default → 0)
    pub unit_price: f64,
    pub transaction_type: TransactionType,
}

/// One item of a batch sales entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemInput {
    pub product_id: i64,
    pub quantity_sold: f64,
    /// Explicit price overrides any directory lookup
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub transaction_type: TransactionType,
}

/// One sale entry of a daily batch submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleEntryInput {
    pub customer_id: i64,
    pub payment_type: PaymentType,
    pub note: Option<String>,
    #[serde(default)]
    pub items: Vec<SaleItemInput>,
}

/// Batch sales submission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSalesRequest {
    pub driver_daily_summary_id: i64,
    #[serde(default)]
    pub sales_data: Vec<SaleEntryInput>,
}

/// Why a sale entry was skipped (tolerated, not an error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleSkipReason {
    UnknownCustomer,
    InactiveCustomer,
    NoItems,
    NoValidItems,
}

/// Per-row outcome of a batch sales submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleRowOutcome {
    Accepted {
        /// Index of the entry in the submitted batch
        index: usize,
        sale_id: i64,
        total_sale_amount: f64,
    },
    Skipped {
        index: usize,
        reason: SaleSkipReason,
    },
}

/// Result of a batch sales submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSalesOutcome {
    pub processed_sales: i64,
    pub skipped_sales: i64,
    /// Σ total_sale_amount over accepted entries
    pub total_amount: f64,
    pub results: Vec<SaleRowOutcome>,
    /// Summary after recompute
    pub summary: DriverDailySummary,
}

//! Loading Log Model (装车记录)

use serde::{Deserialize, Serialize};

/// Load type — initial morning load vs. mid-day reload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LoadType {
    Initial,
    Reload,
}

impl Default for LoadType {
    fn default() -> Self {
        Self::Initial
    }
}

/// Loading log row — one per (batch, product)
///
/// Rows belonging to one physical loading event share a `batch_key` minted
/// at creation time. Presentation groups by that key; the store stays
/// normalized per product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LoadingLog {
    pub id: i64,
    /// Batch group key (UUID, minted on record)
    pub batch_key: String,
    pub driver_id: i64,
    pub route_id: Option<i64>,
    pub load_type: LoadType,
    /// Business date (YYYY-MM-DD)
    pub log_date: String,
    /// Load timestamp (Unix millis)
    pub loaded_at: i64,
    pub product_id: i64,
    pub quantity_loaded: f64,
    pub note: Option<String>,
    /// Recording area manager (from auth context)
    pub recorded_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Flat list row with joined display names (driver/product)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LoadingLogRow {
    pub id: i64,
    pub batch_key: String,
    pub driver_id: i64,
    pub driver_name: String,
    pub route_id: Option<i64>,
    pub load_type: LoadType,
    pub log_date: String,
    pub loaded_at: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity_loaded: f64,
    pub note: Option<String>,
}

/// One item of a loading batch payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingItemInput {
    pub product_id: i64,
    pub quantity_loaded: f64,
}

/// Record loading batch payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingBatchCreate {
    pub driver_id: i64,
    pub route_id: Option<i64>,
    #[serde(default)]
    pub load_type: LoadType,
    /// Business date (YYYY-MM-DD); defaults to today in the business timezone
    pub log_date: Option<String>,
    /// Load timestamp (Unix millis); defaults to now
    pub loaded_at: Option<i64>,
    pub items: Vec<LoadingItemInput>,
    pub note: Option<String>,
}

/// Replace loading batch payload (full item replace, batch key preserved)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingBatchUpdate {
    pub items: Vec<LoadingItemInput>,
    pub note: Option<String>,
}

/// Query filters for the flat loading log list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadingLogFilter {
    pub driver_id: Option<i64>,
    /// Business date (YYYY-MM-DD)
    pub date: Option<String>,
    /// Substring match on the driver directory name
    pub driver_name: Option<String>,
}

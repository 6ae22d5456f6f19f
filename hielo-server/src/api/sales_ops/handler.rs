//! Sales Ops API Handlers
//!
//! 批量提交走整日替换语义；行级数据问题被跳过并在响应的 `results`
//! 中标明，不会让整个请求失败。

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::info;

use crate::core::ServerState;
use crate::db::repository::{driver_sale, product_return, reconciliation};
use crate::utils::time;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::AppResult;
use shared::models::{
    BatchReturnsOutcome, BatchReturnsRequest, BatchSalesOutcome, BatchSalesRequest,
    ReconciliationSummary,
};

/// POST /api/sales-ops/sales-entry/batch - 提交整日销售批次
///
/// 同一 summary 重复提交产生相同的最终状态 (先删后插)。
pub async fn submit_sales_batch(
    State(state): State<ServerState>,
    Json(payload): Json<BatchSalesRequest>,
) -> AppResult<Json<BatchSalesOutcome>> {
    for entry in &payload.sales_data {
        validate_optional_text(&entry.note, "note", MAX_NOTE_LEN)?;
    }

    let outcome = driver_sale::submit_daily_sales(
        &state.pool,
        payload.driver_daily_summary_id,
        payload.sales_data,
    )
    .await?;

    info!(
        summary_id = payload.driver_daily_summary_id,
        processed = outcome.processed_sales,
        skipped = outcome.skipped_sales,
        total = outcome.total_amount,
        "Daily sales batch processed"
    );

    Ok(Json(outcome))
}

/// POST /api/sales-ops/batch-returns - 提交整日退货批次
pub async fn submit_returns_batch(
    State(state): State<ServerState>,
    Json(payload): Json<BatchReturnsRequest>,
) -> AppResult<Json<BatchReturnsOutcome>> {
    time::parse_date(&payload.return_date)?;
    for item in &payload.product_items {
        validate_optional_text(&item.custom_reason_for_loss, "custom_reason_for_loss", MAX_NOTE_LEN)?;
    }

    let outcome = product_return::submit_daily_returns(
        &state.pool,
        payload.driver_id,
        &payload.return_date,
        payload.driver_daily_summary_id,
        payload.product_items,
        payload.packaging_items,
    )
    .await?;

    info!(
        driver_id = payload.driver_id,
        return_date = %payload.return_date,
        product_returns = outcome.product_returns,
        packaging_logs = outcome.packaging_logs,
        "Daily returns batch processed"
    );

    Ok(Json(outcome))
}

/// Query params for the reconciliation view
#[derive(Debug, Deserialize)]
pub struct ReconciliationQuery {
    pub driver_id: i64,
    /// Business date (YYYY-MM-DD)
    pub date: String,
}

/// GET /api/sales-ops/reconciliation-summary - 对账视图
///
/// 只读派生视图：loaded − sold − returned = loss，负数原样返回。
pub async fn reconciliation_summary(
    State(state): State<ServerState>,
    Query(query): Query<ReconciliationQuery>,
) -> AppResult<Json<ReconciliationSummary>> {
    time::parse_date(&query.date)?;

    let view =
        reconciliation::reconciliation_summary(&state.pool, query.driver_id, &query.date).await?;
    Ok(Json(view))
}

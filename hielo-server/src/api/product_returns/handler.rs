//! Product Return API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::product_return;
use crate::utils::time;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::AppResult;
use shared::models::{ProductReturn, ProductReturnCreate};

/// POST /api/product-returns - 交互式录入单条退货 (必须带原因)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductReturnCreate>,
) -> AppResult<Json<ProductReturn>> {
    time::parse_date(&payload.return_date)?;
    validate_optional_text(
        &payload.custom_reason_for_loss,
        "custom_reason_for_loss",
        MAX_NOTE_LEN,
    )?;

    let created = product_return::create_product_return(&state.pool, payload).await?;
    Ok(Json(created))
}

/// Query params for listing returns
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub driver_id: i64,
    /// Return date (YYYY-MM-DD)
    pub date: String,
}

/// GET /api/product-returns - 按司机/日期列出退货
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ProductReturn>>> {
    time::parse_date(&query.date)?;
    let rows =
        product_return::list_product_returns(&state.pool, query.driver_id, &query.date).await?;
    Ok(Json(rows))
}

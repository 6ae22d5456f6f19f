//! Driver Daily Summary API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::daily_summary;
use crate::utils::time;
use crate::utils::{AppError, AppResult};
use shared::models::{DailySummaryStart, DriverDailySummary, SummaryRouteUpdate};

/// Query params for listing summaries
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
    pub date: Option<String>,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/sales-ops/driver-daily-summaries - 获取日结列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DriverDailySummary>>> {
    let summaries = if let Some(date) = query.date {
        time::parse_date(&date)?;
        daily_summary::find_by_date(&state.pool, &date).await
    } else {
        daily_summary::find_all(&state.pool, query.limit, query.offset).await
    }?;

    Ok(Json(summaries))
}

/// GET /api/sales-ops/driver-daily-summaries/:id - 获取单个日结
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DriverDailySummary>> {
    let summary = daily_summary::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Driver daily summary {} not found", id)))?;
    Ok(Json(summary))
}

/// POST /api/sales-ops/driver-daily-summaries - 开始日结 (幂等)
///
/// (driver_id, sale_date) 已存在时返回现有行，不报错。
pub async fn start_day(
    State(state): State<ServerState>,
    Json(payload): Json<DailySummaryStart>,
) -> AppResult<Json<DriverDailySummary>> {
    time::parse_date(&payload.sale_date)?;

    let summary = daily_summary::start_day(&state.pool, payload).await?;
    Ok(Json(summary))
}

/// PUT /api/sales-ops/driver-daily-summaries/:id/route - 更新线路
pub async fn update_route(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SummaryRouteUpdate>,
) -> AppResult<Json<DriverDailySummary>> {
    let summary = daily_summary::update_route(&state.pool, id, payload.route_id).await?;
    Ok(Json(summary))
}

/// POST /api/sales-ops/driver-daily-summaries/:id/reconcile - 标记日结完成
///
/// 单向转换，已完成的日结不可重开。
pub async fn reconcile(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DriverDailySummary>> {
    let summary = daily_summary::mark_reconciled(&state.pool, id).await?;
    Ok(Json(summary))
}

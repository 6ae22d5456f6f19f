//! Loading Log API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::loading_log;
use crate::utils::time;
use crate::utils::validation::{MAX_NOTE_LEN, validate_amount, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::{
    LoadingBatchCreate, LoadingBatchUpdate, LoadingLog, LoadingLogFilter, LoadingLogRow,
};

/// POST /api/loading-logs - 录入装车批次
pub async fn record(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(mut payload): Json<LoadingBatchCreate>,
) -> AppResult<Json<Vec<LoadingLog>>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    for item in &payload.items {
        validate_amount(item.quantity_loaded, "quantity_loaded")?;
    }

    // Default the business date to today in the configured timezone
    match &payload.log_date {
        Some(date) => {
            let parsed = time::parse_date(date)?;
            time::validate_not_future(parsed, state.config.timezone)?;
        }
        None => payload.log_date = Some(time::today_string(state.config.timezone)),
    }

    let rows = loading_log::record_batch(&state.pool, payload, Some(current_user.id)).await?;
    Ok(Json(rows))
}

/// PUT /api/loading-logs/:batch_key - 整批替换装车记录
pub async fn update(
    State(state): State<ServerState>,
    Path(batch_key): Path<String>,
    Json(payload): Json<LoadingBatchUpdate>,
) -> AppResult<Json<Vec<LoadingLog>>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let rows = loading_log::update_batch(&state.pool, &batch_key, payload).await?;
    Ok(Json(rows))
}

/// GET /api/loading-logs/:batch_key - 获取单个批次的所有行
pub async fn get_batch(
    State(state): State<ServerState>,
    Path(batch_key): Path<String>,
) -> AppResult<Json<Vec<LoadingLog>>> {
    let rows = loading_log::find_by_batch_key(&state.pool, &batch_key).await?;
    if rows.is_empty() {
        return Err(AppError::not_found(format!(
            "Loading batch {batch_key} not found"
        )));
    }
    Ok(Json(rows))
}

/// DELETE /api/loading-logs/:batch_key - 删除整批 (管理员)
pub async fn delete(
    State(state): State<ServerState>,
    Path(batch_key): Path<String>,
) -> AppResult<Json<bool>> {
    let deleted = loading_log::delete_batch(&state.pool, &batch_key).await?;
    Ok(Json(deleted))
}

/// GET /api/loading-logs - 平铺列表 (按批次分组由前端完成)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<LoadingLogFilter>,
) -> AppResult<Json<Vec<LoadingLogRow>>> {
    if let Some(date) = &filter.date {
        time::parse_date(date)?;
    }
    let rows = loading_log::list(&state.pool, filter).await?;
    Ok(Json(rows))
}

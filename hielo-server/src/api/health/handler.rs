//! Health API Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;

/// 简单健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (ok | error)
    status: &'static str,
    /// 版本号
    version: &'static str,
}

/// 详细健康检查响应
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    /// 数据库状态 (ok | error)
    database: &'static str,
    /// 业务时区
    timezone: String,
    environment: String,
}

/// GET /health - 简单健康检查
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/detailed - 详细健康检查 (含数据库探测)
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("Health check database probe failed: {}", e);
            "error"
        }
    };

    Json(DetailedHealthResponse {
        status: if database == "ok" { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        timezone: state.config.timezone.to_string(),
        environment: state.config.environment.clone(),
    })
}

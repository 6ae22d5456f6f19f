//! Sales Ops API 模块 (销售批次/退货批次/对账视图)

mod handler;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sales-ops", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route(
            "/reconciliation-summary",
            get(handler::reconciliation_summary),
        )
        .layer(middleware::from_fn(require_permission("sales_ops:read")));

    let write_routes = Router::new()
        .route("/sales-entry/batch", post(handler::submit_sales_batch))
        .route("/batch-returns", post(handler::submit_returns_batch))
        .layer(middleware::from_fn(require_permission("sales_ops:write")));

    read_routes.merge(write_routes)
}

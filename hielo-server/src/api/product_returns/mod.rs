//! Product Return API 模块 (交互式退货录入)
//!
//! 与批量端点不同，交互式录入强制要求损耗原因。

mod handler;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/product-returns", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .layer(middleware::from_fn(require_permission("sales_ops:read")));

    let write_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission("sales_ops:write")));

    read_routes.merge(write_routes)
}

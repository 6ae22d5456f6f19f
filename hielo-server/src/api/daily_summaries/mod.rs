//! Driver Daily Summary API 模块 (司机日结)

mod handler;

use axum::{
    Router,
    middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sales-ops/driver-daily-summaries", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("sales_ops:read")));

    let write_routes = Router::new()
        .route("/", post(handler::start_day))
        .route("/{id}/route", put(handler::update_route))
        .layer(middleware::from_fn(require_permission("sales_ops:write")));

    let reconcile_routes = Router::new()
        .route("/{id}/reconcile", post(handler::reconcile))
        .layer(middleware::from_fn(require_permission(
            "sales_ops:reconcile",
        )));

    read_routes.merge(write_routes).merge(reconcile_routes)
}

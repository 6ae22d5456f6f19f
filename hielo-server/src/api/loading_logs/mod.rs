//! Loading Log API 模块 (装车记录)

mod handler;

use axum::{
    Router,
    middleware,
    routing::{get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/loading-logs", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{batch_key}", get(handler::get_batch))
        .layer(middleware::from_fn(require_permission("loading:read")));

    let write_routes = Router::new()
        .route("/", post(handler::record))
        .route("/{batch_key}", put(handler::update))
        .layer(middleware::from_fn(require_permission("loading:write")));

    let admin_routes = Router::new()
        .route("/{batch_key}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_permission("loading:admin")));

    read_routes.merge(write_routes).merge(admin_routes)
}

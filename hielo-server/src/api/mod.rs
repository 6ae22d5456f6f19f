//! HTTP API 模块
//!
//! 每个子模块提供一个 `router()`，在 `routes::build_router` 中合并。
//! 权限层在各模块的路由定义处声明。

pub mod daily_summaries;
pub mod health;
pub mod loading_logs;
pub mod product_returns;
pub mod sales_ops;

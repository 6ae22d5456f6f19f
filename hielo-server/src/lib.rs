//! Hielo Ops Server - 冰块配送运营后台
//!
//! # 架构概述
//!
//! 本 crate 实现司机日销售对账子系统：装车记录 → 司机销售 →
//! 产品退货 → 对账视图。
//!
//! - **数据库** (`db`): SQLite (sqlx)，全部变更操作单事务执行
//! - **认证** (`auth`): JWT 验证 + 权限中间件 (令牌由外部服务签发)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! hielo-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 验证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── routes/        # 路由组装和中间件
//! ├── utils/         # 错误、日志、时间、校验
//! └── db/            # 连接池、迁移、repository
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod routes;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___      __
   / / / (_)__  / /___
  / /_/ / / _ \/ / __ \
 / __  / /  __/ / /_/ /
/_/ /_/_/\___/_/\____/
        ____
       / __ \____  _____
      / / / / __ \/ ___/
     / /_/ / /_/ (__  )
     \____/ .___/____/
         /_/
    "#
    );
}

//! 认证授权模块
//!
//! 令牌由外部认证服务签发；本模块只做验证和权限检查：
//! - [`JwtService`] - JWT 令牌验证
//! - [`CurrentUser`] - 当前用户上下文
//! - [`require_auth`] - 认证中间件
//! - [`require_permission`] - 权限检查中间件

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_permission};

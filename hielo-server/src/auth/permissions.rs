//! Permission Definitions
//!
//! Simplified RBAC for the sales-ops core. Tokens are issued by the external
//! auth service; the permission strings here are the contract between that
//! service and this backend's route layers.

/// 可配置权限列表
pub const ALL_PERMISSIONS: &[&str] = &[
    // === 装车记录 ===
    "loading:read",      // 查看装车记录
    "loading:write",     // 录入/替换装车批次
    "loading:admin",     // 删除装车批次
    // === 销售日结 ===
    "sales_ops:read",      // 查看日结、对账视图
    "sales_ops:write",     // 提交销售/退货批次、开始日结
    "sales_ops:reconcile", // 标记日结完成
];

/// Admin 专属权限（不在可配置列表中）
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &["all"];

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

/// 区域经理默认权限（全部可配置权限）
pub const DEFAULT_AREA_MANAGER_PERMISSIONS: &[&str] = &[
    "loading:read",
    "loading:write",
    "loading:admin",
    "sales_ops:read",
    "sales_ops:write",
    "sales_ops:reconcile",
];

/// 只读角色默认权限
pub const DEFAULT_VIEWER_PERMISSIONS: &[&str] = &[
    "loading:read",
    "sales_ops:read",
];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    match role_name {
        "admin" => DEFAULT_ADMIN_PERMISSIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        "area_manager" => DEFAULT_AREA_MANAGER_PERMISSIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        "viewer" => DEFAULT_VIEWER_PERMISSIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        _ => vec![],
    }
}

//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 概览面板 (需要认证)
    Dashboard,
    /// 分店列表 (需要认证)
    Branches,
    /// 新建分店 (需要认证)
    AddBranch,
    /// 分店详情 (需要认证)
    BranchDetail(i64),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" | "/dashboard" => Self::Dashboard,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard/branches" => Self::Branches,
            "/dashboard/branches/add" => Self::AddBranch,
            _ => path
                .strip_prefix("/dashboard/branches/")
                .and_then(|id| id.parse().ok())
                .map_or(Self::NotFound, Self::BranchDetail),
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Branches => "/dashboard/branches".to_string(),
            Self::AddBranch => "/dashboard/branches/add".to_string(),
            Self::BranchDetail(id) => format!("/dashboard/branches/{}", id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Branches | Self::AddBranch | Self::BranchDetail(_)
        )
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

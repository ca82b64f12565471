//! 分店管理后台前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `app`: 组装核心库的会话与分店存储
//! - `components`: UI 组件层

mod app;
mod components {
    pub mod add_branch;
    pub mod branch_detail;
    pub mod branches;
    pub mod dashboard;
    mod icons;
    pub mod layout;
    pub mod login;
    pub mod register;
}

use crate::app::AppContext;
use crate::components::add_branch::AddBranchPage;
use crate::components::branch_detail::BranchDetailPage;
use crate::components::branches::BranchListPage;
use crate::components::dashboard::DashboardPage;
use crate::components::layout::DashboardLayout;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，实现核心库的传输层与存储 trait。
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::{FetchHttpClient, read_attachment};
    pub use router::LocationNavigator;
    pub use storage::LocalStorage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! {
            <DashboardLayout>
                <DashboardPage />
            </DashboardLayout>
        }
        .into_any(),
        AppRoute::Branches => view! {
            <DashboardLayout>
                <BranchListPage />
            </DashboardLayout>
        }
        .into_any(),
        AppRoute::AddBranch => view! {
            <DashboardLayout>
                <AddBranchPage />
            </DashboardLayout>
        }
        .into_any(),
        AppRoute::BranchDetail(id) => view! {
            <DashboardLayout>
                <BranchDetailPage id=id />
            </DashboardLayout>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to=AppRoute::Dashboard class="btn btn-primary mt-6">
                        "Back to dashboard"
                    </Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 组装存储并回填会话
    let app = AppContext::new();
    provide_context(app);

    // 2. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = app.is_authenticated_signal();

    view! {
        // 3. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}

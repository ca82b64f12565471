//! 受保护页面的外框：侧边栏 + 顶栏

use crate::app::use_app;
use crate::components::icons::{Building, LayoutDashboard, LogOut};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

#[component]
pub fn DashboardLayout(children: Children) -> impl IntoView {
    let app = use_app();

    // 导航由路由服务的认证状态监听自动完成
    let on_logout = move |_| app.session().logout();

    view! {
        <div class="min-h-screen bg-base-200 flex">
            <aside class="w-64 bg-base-100 shadow-xl hidden md:flex flex-col">
                <div class="p-6 text-xl font-bold text-primary">"Ashoka Admin"</div>
                <ul class="menu p-4 gap-1 w-full">
                    <NavItem to=AppRoute::Dashboard active=|r| matches!(r, AppRoute::Dashboard)>
                        <LayoutDashboard attr:class="h-4 w-4" />
                        "Dashboard"
                    </NavItem>
                    <NavItem
                        to=AppRoute::Branches
                        active=|r| {
                            matches!(r, AppRoute::Branches | AppRoute::AddBranch | AppRoute::BranchDetail(_))
                        }
                    >
                        <Building attr:class="h-4 w-4" />
                        "Branches"
                    </NavItem>
                </ul>
            </aside>

            <div class="flex-1 flex flex-col">
                <div class="navbar bg-base-100 shadow px-6">
                    <div class="flex-1 flex flex-col items-start">
                        <span class="font-semibold">
                            {move || app.session_state.with(|s| s.email.clone().unwrap_or_default())}
                        </span>
                        <span class="text-xs text-base-content/60">
                            {move || app.session_state.with(|s| s.role.clone().unwrap_or_default())}
                        </span>
                    </div>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" />
                        "Log out"
                    </button>
                </div>
                <main class="p-4 md:p-8 max-w-7xl w-full mx-auto">{children()}</main>
            </div>
        </div>
    }
}

/// 侧边栏菜单项，当前路由命中 `active` 时高亮
#[component]
fn NavItem(to: AppRoute, active: fn(&AppRoute) -> bool, children: Children) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let class = move || {
        if active(&router.current_route().get()) {
            "flex gap-2 menu-active"
        } else {
            "flex gap-2"
        }
    };
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to.clone());
    };

    view! {
        <li>
            <a href=href class=class on:click=on_click>
                {children()}
            </a>
        </li>
    }
}

//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history / window.location 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use branchdesk::Navigator;
use leptos::prelude::*;
use wasm_bindgen::JsValue;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 地址栏写入方式
#[derive(Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    /// 新增历史记录（用户主动导航）
    Push,
    /// 覆盖当前记录（重定向、后退前进）
    Replace,
}

fn write_history(path: &str, mode: HistoryMode) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = match mode {
        HistoryMode::Push => history.push_state_with_url(&JsValue::NULL, "", Some(path)),
        HistoryMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(path)),
    };
    if let Err(e) = result {
        log::warn!("[Router] History update for {} failed: {:?}", path, e);
    }
}

// ============================================================================
// 会话失效跳转
// ============================================================================

/// 会话失效时整页跳转到登录入口
///
/// 已经在登录页时不跳转，避免登录返回 401 时反复刷新。
pub struct LocationNavigator {
    login_path: String,
}

impl LocationNavigator {
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }
}

impl Navigator for LocationNavigator {
    fn to_login(&self) {
        if !needs_login_redirect(&current_path(), &self.login_path) {
            return;
        }
        log::info!("[Router] Session expired. Redirecting to {}", self.login_path);
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(&self.login_path) {
            log::warn!("[Router] Redirect to {} failed: {:?}", self.login_path, e);
        }
    }
}

/// 已在登录页（忽略末尾斜杠）时不再跳转
fn needs_login_redirect(current: &str, login_path: &str) -> bool {
    current.trim_end_matches('/') != login_path.trim_end_matches('/')
}

// ============================================================================
// 路由服务
// ============================================================================

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证检查信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: RwSignal<AppRoute>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        Self {
            current_route: RwSignal::new(initial_route),
            is_authenticated,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route.read_only()
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path));
    }

    pub fn navigate_to(&self, route: AppRoute) {
        self.load(route, HistoryMode::Push);
    }

    /// 守卫：返回实际应加载的路由
    fn resolve(&self, target: AppRoute) -> AppRoute {
        let is_auth = self.is_authenticated.get_untracked();

        if target.requires_auth() && !is_auth {
            log::info!("[Router] Access Denied. Redirecting to Login.");
            return AppRoute::auth_failure_redirect();
        }

        if target.should_redirect_when_authenticated() && is_auth {
            log::info!("[Router] Already authenticated. Redirecting to Dashboard.");
            return AppRoute::auth_success_redirect();
        }

        target
    }

    /// 守卫后写入地址栏并切换界面
    fn load(&self, target: AppRoute, mode: HistoryMode) {
        let route = self.resolve(target);
        write_history(&route.to_path(), mode);
        self.current_route.set(route);
    }

    /// 首次加载时对地址栏中的路由执行守卫
    fn guard_initial_route(&self) {
        let initial = self.current_route.get_untracked();
        let resolved = self.resolve(initial.clone());
        if resolved != initial {
            self.load(resolved, HistoryMode::Replace);
        }
    }

    /// 后退/前进按钮同样经过守卫
    fn listen_popstate(&self) {
        let router = *self;
        // 监听器与应用同寿命，不需要保留句柄
        let _ = leptos::leptos_dom::helpers::window_event_listener(leptos::ev::popstate, move |_| {
            router.load(AppRoute::from_path(&current_path()), HistoryMode::Replace);
        });
    }

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();

            if is_auth && route.should_redirect_when_authenticated() {
                log::info!("[Router] Auth state changed: logged in, redirecting to dashboard.");
                router.navigate_to(AppRoute::auth_success_redirect());
            } else if !is_auth && route.requires_auth() {
                log::info!("[Router] Auth state changed: logged out, redirecting to login.");
                router.navigate_to(AppRoute::auth_failure_redirect());
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    router.guard_initial_route();
    router.listen_popstate();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，拦截点击并交给路由服务
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}

//! 应用上下文
//!
//! 启动时组装核心库的各个部件并注入到 Leptos Context：
//! 配置 -> 存储 -> 会话上下文 -> 协调器 -> API 客户端 -> 会话存储 / 分店存储。
//! 存储的状态放在 `RwSignal` 中，存储每次修改都会驱动界面刷新。

use crate::web::{self, FetchHttpClient, LocationNavigator};
use branchdesk::config::{
    VAR_API_BASE_URL, VAR_LOGIN_PATH, VAR_LOGOUT_ON_FORBIDDEN, VAR_SNAPSHOT_KEY, VAR_TOKEN_KEY,
};
use branchdesk::{
    ApiClient, BranchState, BranchStore, ClientConfig, KeyValueStore, SessionContext,
    SessionCoordinator, SessionState, SessionStore, StateCell,
};
use leptos::prelude::*;
use std::rc::Rc;

// =========================================================
// 响应式状态容器
// =========================================================

/// 以 `RwSignal` 实现的状态容器
///
/// 存储内部读取不追踪依赖，界面通过 `AppContext` 暴露的信号订阅。
pub struct SignalCell<T: Send + Sync + 'static>(RwSignal<T>);

impl<T: Send + Sync + 'static> SignalCell<T> {
    pub fn new(signal: RwSignal<T>) -> Self {
        Self(signal)
    }
}

impl<T: Send + Sync + 'static> Clone for SignalCell<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for SignalCell<T> {}

impl<T: Send + Sync + 'static> StateCell<T> for SignalCell<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.0.with_untracked(f)
    }

    fn update(&self, f: impl FnOnce(&mut T)) {
        self.0.update(f)
    }
}

pub type Session = SessionStore<FetchHttpClient, SignalCell<SessionState>>;
pub type Branches = BranchStore<FetchHttpClient, SignalCell<BranchState>>;

// =========================================================
// 配置
// =========================================================

/// 编译期注入的配置变量，未设置时使用默认值
fn build_config() -> ClientConfig {
    ClientConfig::from_vars(|name| {
        let value = match name {
            VAR_API_BASE_URL => option_env!("BRANCHDESK_API_BASE_URL"),
            VAR_TOKEN_KEY => option_env!("BRANCHDESK_TOKEN_KEY"),
            VAR_SNAPSHOT_KEY => option_env!("BRANCHDESK_SNAPSHOT_KEY"),
            VAR_LOGIN_PATH => option_env!("BRANCHDESK_LOGIN_PATH"),
            VAR_LOGOUT_ON_FORBIDDEN => option_env!("BRANCHDESK_LOGOUT_ON_FORBIDDEN"),
            _ => None,
        };
        value.map(str::to_string)
    })
}

// =========================================================
// 应用上下文
// =========================================================

/// 应用上下文
///
/// 只包含 Copy 句柄，可以随意在组件和闭包间传递。
#[derive(Clone, Copy)]
pub struct AppContext {
    /// 会话状态（界面订阅用）
    pub session_state: RwSignal<SessionState>,
    /// 分店状态（界面订阅用）
    pub branch_state: RwSignal<BranchState>,
    session: StoredValue<Rc<Session>, LocalStorage>,
    branches: StoredValue<Rc<Branches>, LocalStorage>,
    token_key: StoredValue<String>,
}

impl AppContext {
    /// 组装全部部件，并在首次渲染前回填会话
    pub fn new() -> Self {
        let config = build_config();
        log::info!("[App] API base URL: {}", config.base_url);

        let session_state = RwSignal::new(SessionState::default());
        let branch_state = RwSignal::new(BranchState::default());

        let context = SessionContext::new(Rc::new(web::LocalStorage), &config);
        let coordinator = Rc::new(SessionCoordinator::new(
            context.clone(),
            SignalCell::new(session_state),
            LocationNavigator::new(config.login_path.clone()),
        ));

        let token_key = config.token_key.clone();
        let api = Rc::new(
            ApiClient::new(config, FetchHttpClient, context).with_expiry_listener(coordinator),
        );

        let session = Rc::new(SessionStore::new(
            api.clone(),
            SignalCell::new(session_state),
        ));
        session.rehydrate();

        let branches = Rc::new(BranchStore::new(api, SignalCell::new(branch_state)));

        Self {
            session_state,
            branch_state,
            session: StoredValue::new_local(session),
            branches: StoredValue::new_local(branches),
            token_key: StoredValue::new(token_key),
        }
    }

    pub fn session(&self) -> Rc<Session> {
        self.session.get_value()
    }

    pub fn branches(&self) -> Rc<Branches> {
        self.branches.get_value()
    }

    /// 路由守卫使用的认证信号
    ///
    /// 会话状态未认证但存储里仍有 token 时也放行，由后续请求的 401 负责收尾。
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.session_state;
        let token_key = self.token_key;
        Signal::derive(move || {
            state.with(|s| s.is_authenticated)
                || token_key.with_value(|key| web::LocalStorage.get(key).is_some_and(|t| !t.is_empty()))
        })
    }
}

/// 从 Context 获取应用上下文
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}

//! 会话失效协调器
//!
//! 401/403 发生时唯一负责收尾的地方：清除持久化会话、重置内存状态、跳转登录页。
//! 多个请求同时失效时会被多次调用，每一步都是幂等的。

use super::{SessionContext, SessionState};
use crate::api::AuthExpiryListener;
use crate::state::StateCell;

/// 导航抽象，浏览器端跳转到登录页
pub trait Navigator {
    fn to_login(&self);
}

pub struct SessionCoordinator<S, N> {
    context: SessionContext,
    state: S,
    navigator: N,
}

impl<S, N> SessionCoordinator<S, N>
where
    S: StateCell<SessionState>,
    N: Navigator,
{
    pub fn new(context: SessionContext, state: S, navigator: N) -> Self {
        Self {
            context,
            state,
            navigator,
        }
    }
}

impl<S, N> AuthExpiryListener for SessionCoordinator<S, N>
where
    S: StateCell<SessionState>,
    N: Navigator,
{
    fn on_auth_expired(&self, status: u16) {
        log::info!("[Session] Auth expired (HTTP {}), clearing session", status);
        self.context.clear();
        self.state.update(|s| *s = SessionState::default());
        self.navigator.to_login();
    }
}

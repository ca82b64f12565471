//! 会话存储
//!
//! 持有已认证身份（token、邮箱、角色、权限集合），提供登录、注册、登出。
//! `is_authenticated` 为 true 当且仅当 `access_token` 非空且由一次成功的登录写入。

mod context;
mod coordinator;

pub use context::{SessionContext, SessionSnapshot};
pub use coordinator::{Navigator, SessionCoordinator};

use crate::api::ApiClient;
use crate::request::HttpClient;
use crate::state::{LocalState, StateCell};
use crate::validation::{self, LOGIN_MIN_PASSWORD_LEN, REGISTER_MIN_PASSWORD_LEN};
use branchdesk_shared::{LoginRequest, RegisterRequest};
use std::collections::BTreeSet;
use std::rc::Rc;

pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Please try again.";
pub const REGISTER_FALLBACK_MESSAGE: &str = "Registration failed. Please try again.";

/// 会话状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub access_token: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub permissions: BTreeSet<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    /// 需要持久化的部分
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            access_token: self.access_token.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            permissions: self.permissions.clone(),
            is_authenticated: self.is_authenticated,
        }
    }

    /// 用快照覆盖持久化字段，瞬时标志保持不变
    pub fn restore(&mut self, snapshot: SessionSnapshot) {
        self.access_token = snapshot.access_token;
        self.email = snapshot.email;
        self.role = snapshot.role;
        self.permissions = snapshot.permissions;
        self.is_authenticated = snapshot.is_authenticated;
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// 会话存储
///
/// 同一时刻允许多个 `login` 在途，不做去重；最后完成的响应覆盖状态。
pub struct SessionStore<C: HttpClient, S: StateCell<SessionState> = LocalState<SessionState>> {
    api: Rc<ApiClient<C>>,
    state: S,
}

impl<C: HttpClient, S: StateCell<SessionState>> SessionStore<C, S> {
    pub fn new(api: Rc<ApiClient<C>>, state: S) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.with(SessionState::snapshot)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(|s| s.is_authenticated)
    }

    /// 启动时从持久化快照回填会话
    pub fn rehydrate(&self) {
        let Some(snapshot) = self.api.session().rehydrate() else {
            return;
        };
        log::debug!(
            "[Session] Rehydrated snapshot (authenticated: {})",
            snapshot.is_authenticated
        );
        self.state.update(|s| s.restore(snapshot));
    }

    pub async fn login(&self, email: &str, password: &str, role: &str) -> bool {
        if let Err(e) = validation::validate_credentials(email, password, LOGIN_MIN_PASSWORD_LEN) {
            self.state.update(|s| s.error = Some(e.message));
            return false;
        }

        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            role: role.to_string(),
        };

        match self.api.call(&request).await {
            Ok(resp) => {
                // Core 在下一次请求时从持久化存储读取 token
                self.api.session().set_token(&resp.access_token);
                self.state.update(|s| {
                    s.access_token = Some(resp.access_token);
                    s.email = Some(resp.email);
                    s.role = Some(resp.role);
                    s.permissions = resp.permissions.into_iter().collect();
                    s.is_authenticated = true;
                    s.is_loading = false;
                    s.error = None;
                });
                self.persist();
                log::info!("[Session] Logged in");
                true
            }
            Err(e) => {
                let message = e.message_or(LOGIN_FALLBACK_MESSAGE);
                log::debug!("[Session] Login failed: {}", e);
                if e.is_auth_expired() {
                    // 协调器已清空持久化条目并重置状态，这里只补上错误信息
                    self.state.update(|s| {
                        s.is_loading = false;
                        s.error = Some(message);
                    });
                    return false;
                }
                self.api.session().remove_token();
                self.state.update(|s| {
                    s.access_token = None;
                    s.is_authenticated = false;
                    s.is_loading = false;
                    s.error = Some(message);
                });
                self.persist();
                false
            }
        }
    }

    /// 注册只创建身份，不会进入已认证状态，调用方需要再登录
    pub async fn register(&self, email: &str, password: &str, role: &str) -> bool {
        if let Err(e) =
            validation::validate_credentials(email, password, REGISTER_MIN_PASSWORD_LEN)
        {
            self.state.update(|s| s.error = Some(e.message));
            return false;
        }

        self.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let request = RegisterRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            role: role.to_string(),
        };

        match self.api.call(&request).await {
            Ok(resp) => {
                self.state.update(|s| {
                    s.email = Some(resp.email);
                    s.role = Some(resp.role);
                    s.permissions = resp.permissions.into_iter().collect();
                    s.is_loading = false;
                    s.error = None;
                });
                self.persist();
                log::info!("[Session] Registered");
                true
            }
            Err(e) => {
                let message = e.message_or(REGISTER_FALLBACK_MESSAGE);
                log::debug!("[Session] Registration failed: {}", e);
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
                false
            }
        }
    }

    /// 登出：清除持久化 token 并把所有字段重置为默认值，可重复调用
    pub fn logout(&self) {
        self.api.session().remove_token();
        self.state.update(|s| *s = SessionState::default());
        self.persist();
        log::info!("[Session] Logged out");
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }

    fn persist(&self) {
        let snapshot = self.snapshot();
        self.api.session().persist(&snapshot);
    }
}

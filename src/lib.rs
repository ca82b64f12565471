//! 分店管理后台的客户端核心
//!
//! - `api`：HTTP Client Core，负责 Bearer 注入与 401/403 拦截
//! - `session`：会话上下文、会话存储与会话失效协调器
//! - `branch`：分店存储
//!
//! 不依赖任何浏览器 API：传输层、持久化存储、状态容器、导航都通过 trait 注入，
//! 浏览器实现位于 frontend crate。

pub mod api;
pub mod branch;
pub mod config;
pub mod error;
pub mod request;
pub mod session;
pub mod state;
pub mod storage;
pub mod validation;

pub use api::{ApiClient, AuthExpiryListener};
pub use branch::{BranchState, BranchStore};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ValidationError};
pub use request::{HttpClient, HttpRequest, HttpResponse, RequestBody, TransportError};
pub use session::{
    Navigator, SessionContext, SessionCoordinator, SessionSnapshot, SessionState, SessionStore,
};
pub use state::{LocalState, StateCell};
pub use storage::{KeyValueStore, MemoryStorage};

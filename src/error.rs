use crate::request::TransportError;

// =========================================================
// API 错误
// =========================================================

/// HTTP Client Core 返回给调用方的失败分类
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// 401 (以及配置开启时的 403)：会话已失效，强制登出已经执行
    #[error("session expired (HTTP {status})")]
    AuthExpired {
        status: u16,
        message: Option<String>,
    },
    /// 403 且未开启强制登出
    #[error("forbidden")]
    Forbidden { message: Option<String> },
    /// 其他非 2xx 响应
    #[error("server responded with HTTP {status}")]
    Server {
        status: u16,
        message: Option<String>,
    },
    /// 没有收到任何响应
    #[error("transport failure: {0}")]
    Transport(String),
    /// 2xx 响应体与期望类型不符
    #[error("failed to decode response: {0}")]
    Decode(String),
    /// 请求体无法序列化
    #[error("failed to encode request: {0}")]
    Encode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// 服务端在响应体中给出的 `message`
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::AuthExpired { message, .. }
            | ApiError::Forbidden { message }
            | ApiError::Server { message, .. } => message.as_deref(),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Encode(_) => None,
        }
    }

    /// 优先使用服务端消息，否则使用固定的兜底文案
    pub fn message_or(&self, fallback: &str) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired { .. })
    }

    /// 响应状态码（传输层失败时为 None）
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthExpired { status, .. } | ApiError::Server { status, .. } => {
                Some(*status)
            }
            ApiError::Forbidden { .. } => Some(403),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Encode(_) => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        ApiError::Transport(e.0)
    }
}

// =========================================================
// 本地校验错误
// =========================================================

/// 在任何网络请求之前就被拦下的输入错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_server_message() {
        let err = ApiError::Server {
            status: 409,
            message: Some("Branch already exists".into()),
        };
        assert_eq!(err.message_or("fallback"), "Branch already exists");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn transport_failure_uses_fallback() {
        let err: ApiError = TransportError::new("connection refused").into();
        assert_eq!(err.message_or("Failed to fetch branches."), "Failed to fetch branches.");
        assert_eq!(err.status(), None);
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn auth_expired_keeps_message() {
        let err = ApiError::AuthExpired {
            status: 401,
            message: Some("Invalid credentials".into()),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.message_or("Login failed."), "Invalid credentials");
    }
}

// =========================================================
// 动态运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，如果对应的变量没有定义，则使用这些值
pub const DEFAULT_API_BASE_URL: &str = "https://ashokaapi.elitceler.com/api/v1";
pub const DEFAULT_TOKEN_KEY: &str = "accessToken";
pub const DEFAULT_SNAPSHOT_KEY: &str = "auth-storage";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_LOGOUT_ON_FORBIDDEN: bool = true;

pub const VAR_API_BASE_URL: &str = "BRANCHDESK_API_BASE_URL";
pub const VAR_TOKEN_KEY: &str = "BRANCHDESK_TOKEN_KEY";
pub const VAR_SNAPSHOT_KEY: &str = "BRANCHDESK_SNAPSHOT_KEY";
pub const VAR_LOGIN_PATH: &str = "BRANCHDESK_LOGIN_PATH";
pub const VAR_LOGOUT_ON_FORBIDDEN: &str = "BRANCHDESK_LOGOUT_ON_FORBIDDEN";

/// 客户端配置
/// 负责从变量中读取配置，读不到就用默认值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 所有 API 请求共用的基础地址（不带末尾斜杠）
    pub base_url: String,
    /// 持久化存储中保存裸 token 的键
    pub token_key: String,
    /// 持久化存储中保存会话快照的键
    pub snapshot_key: String,
    /// 登录入口路径，强制登出时跳转到这里
    pub login_path: String,
    /// 403 是否也视为会话失效
    pub logout_on_forbidden: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

impl ClientConfig {
    /// 通过查找函数构建配置
    ///
    /// 浏览器端传入编译期变量，原生环境传入进程环境变量。
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str, default: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let logout_on_forbidden = lookup(VAR_LOGOUT_ON_FORBIDDEN)
            .and_then(|v| parse_flag(&v))
            .unwrap_or(DEFAULT_LOGOUT_ON_FORBIDDEN);

        Self {
            base_url: read(VAR_API_BASE_URL, DEFAULT_API_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            token_key: read(VAR_TOKEN_KEY, DEFAULT_TOKEN_KEY),
            snapshot_key: read(VAR_SNAPSHOT_KEY, DEFAULT_SNAPSHOT_KEY),
            login_path: read(VAR_LOGIN_PATH, DEFAULT_LOGIN_PATH),
            logout_on_forbidden,
        }
    }

    /// 从进程环境变量构建配置
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.token_key, "accessToken");
        assert_eq!(config.snapshot_key, "auth-storage");
        assert_eq!(config.login_path, "/login");
        assert!(config.logout_on_forbidden);
    }

    #[test]
    fn reads_overrides_and_trims_trailing_slash() {
        let vars: HashMap<&str, &str> = [
            (VAR_API_BASE_URL, "http://localhost:3000/api/v1//"),
            (VAR_LOGOUT_ON_FORBIDDEN, "off"),
            (VAR_TOKEN_KEY, "   "),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::from_vars(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.base_url, "http://localhost:3000/api/v1");
        assert!(!config.logout_on_forbidden);
        // 空白值回落到默认值
        assert_eq!(config.token_key, DEFAULT_TOKEN_KEY);
    }

    #[test]
    fn unparseable_flag_keeps_default() {
        let config = ClientConfig::from_vars(|k| {
            (k == VAR_LOGOUT_ON_FORBIDDEN).then(|| "maybe".to_string())
        });
        assert!(config.logout_on_forbidden);
    }

    #[test]
    fn url_joins_with_single_slash() {
        let config = ClientConfig::default().with_base_url("http://api.test/v1/");
        assert_eq!(config.url("/branch"), "http://api.test/v1/branch");
        assert_eq!(config.url("branch/3"), "http://api.test/v1/branch/3");
    }
}

//! 会话上下文
//!
//! 持久化会话数据的唯一入口，以显式生命周期注入到发起 HTTP 调用的各层：
//! 创建 (`new`) -> 启动时回填 (`rehydrate`) -> 清除 (`clear`) / 销毁 (`dispose`)。
//!
//! 存储中有两个条目：
//! - 裸 token：HTTP Client Core 每次请求都会读取
//! - 会话快照：只在启动时读取一次，用于回填会话状态

use crate::config::ClientConfig;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::rc::Rc;

const SNAPSHOT_VERSION: u32 = 0;

/// 会话快照：会话状态中需要持久化的部分
///
/// 加载中/错误等瞬时标志永远不会被持久化。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl SessionSnapshot {
    /// 声称已认证却没有 token 的快照按未认证处理
    fn normalized(mut self) -> Self {
        if self.access_token.as_deref().is_none_or(str::is_empty) {
            self.access_token = None;
            self.is_authenticated = false;
        }
        self
    }
}

/// 存储中的快照外层结构
#[derive(Debug, Serialize, Deserialize)]
struct PersistedEnvelope {
    state: SessionSnapshot,
    #[serde(default)]
    version: u32,
}

/// 会话上下文
///
/// 克隆后共享同一个存储后端。
#[derive(Clone)]
pub struct SessionContext {
    storage: Rc<dyn KeyValueStore>,
    token_key: String,
    snapshot_key: String,
}

impl SessionContext {
    pub fn new(storage: Rc<dyn KeyValueStore>, config: &ClientConfig) -> Self {
        Self {
            storage,
            token_key: config.token_key.clone(),
            snapshot_key: config.snapshot_key.clone(),
        }
    }

    /// 当前持久化的 token（空字符串视为不存在）
    pub fn token(&self) -> Option<String> {
        self.storage
            .get(&self.token_key)
            .filter(|token| !token.is_empty())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: &str) -> bool {
        self.storage.set(&self.token_key, token)
    }

    pub fn remove_token(&self) -> bool {
        self.storage.delete(&self.token_key)
    }

    /// 启动时读取快照
    ///
    /// 快照缺失或损坏时返回 None。
    pub fn rehydrate(&self) -> Option<SessionSnapshot> {
        let raw = self.storage.get(&self.snapshot_key)?;
        match serde_json::from_str::<PersistedEnvelope>(&raw) {
            Ok(envelope) => Some(envelope.state.normalized()),
            Err(e) => {
                log::warn!("[Session] Discarding unreadable snapshot: {}", e);
                None
            }
        }
    }

    pub fn persist(&self, snapshot: &SessionSnapshot) -> bool {
        let envelope = PersistedEnvelope {
            state: snapshot.clone(),
            version: SNAPSHOT_VERSION,
        };
        match serde_json::to_string(&envelope) {
            Ok(raw) => self.storage.set(&self.snapshot_key, &raw),
            Err(e) => {
                log::error!("[Session] Failed to serialize snapshot: {}", e);
                false
            }
        }
    }

    /// 删除 token 与快照两个条目
    pub fn clear(&self) {
        self.storage.delete(&self.token_key);
        self.storage.delete(&self.snapshot_key);
    }

    /// 结束上下文生命周期，清除持久化数据
    pub fn dispose(self) {
        self.clear();
    }
}

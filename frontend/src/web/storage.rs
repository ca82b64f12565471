//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现核心库的 `KeyValueStore`。

use branchdesk::KeyValueStore;

/// 浏览器 LocalStorage
///
/// 无状态，每次操作都重新获取 `window.localStorage`。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorage {
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        let Some(storage) = Self::storage() else {
            return false;
        };
        // 配额用尽或隐私模式下写入会失败
        match storage.set_item(key, value) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[Storage] Failed to write {}: {:?}", key, e);
                false
            }
        }
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .is_some_and(|s| s.remove_item(key).is_ok())
    }
}

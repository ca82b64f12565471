//! 持久化键值存储抽象
//!
//! 浏览器端由 `localStorage` 实现，测试与非浏览器宿主使用 `MemoryStorage`。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 持久化键值存储
///
/// 接口与浏览器 `localStorage` 一致：读取失败视为不存在，写入/删除返回是否成功。
pub trait KeyValueStore {
    /// 获取存储的字符串值
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除存储的键值对
    fn delete(&self, key: &str) -> bool;
}

/// 内存键值存储，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

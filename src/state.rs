//! 状态容器抽象
//!
//! 存储（Store）只通过 `StateCell` 读写自己的状态，不关心背后是
//! 普通的 `RefCell` 还是界面框架的响应式信号。

use std::cell::RefCell;
use std::rc::Rc;

/// 单线程状态容器
///
/// 实现方不得在回调之外持有借用；存储在 await 之前总是结束借用。
pub trait StateCell<T> {
    /// 只读访问
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R;

    /// 原地修改
    fn update(&self, f: impl FnOnce(&mut T));

    /// 克隆出当前状态
    fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }
}

/// 基于 `Rc<RefCell<T>>` 的本地状态，克隆后共享同一份数据
#[derive(Debug, Default)]
pub struct LocalState<T>(Rc<RefCell<T>>);

impl<T> LocalState<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }
}

impl<T> Clone for LocalState<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> StateCell<T> for LocalState<T> {
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.0.borrow_mut())
    }
}

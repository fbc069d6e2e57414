//! 位置片段抽象
//!
//! 路由的唯一信号是 URL `#` 之后的片段。浏览器实现见前端 `web::location`，
//! 这里提供接口与内存实现。

use std::cell::RefCell;
use std::rc::Rc;

/// URL 片段的读写与变更监听
pub trait Location {
    /// 当前片段（不含 `#`）
    fn fragment(&self) -> String;
    /// 设置片段；与当前值相同时不触发变更事件（与浏览器 hashchange 一致）
    fn set_fragment(&self, path: &str);
    /// 注册片段变更监听器
    fn listen(&self, listener: Box<dyn Fn()>);
}

/// 内存中的位置实现
///
/// 克隆后共享状态；`history` 记录每一次实际发生的跳转。
#[derive(Clone, Default)]
pub struct MemoryLocation {
    inner: Rc<MemoryLocationInner>,
}

#[derive(Default)]
struct MemoryLocationInner {
    current: RefCell<String>,
    history: RefCell<Vec<String>>,
    listeners: RefCell<Vec<Box<dyn Fn()>>>,
}

impl MemoryLocation {
    pub fn new(initial: &str) -> Self {
        let location = Self::default();
        *location.inner.current.borrow_mut() = initial.trim_start_matches('#').to_string();
        location
    }

    /// 已发生的跳转（不含初始片段）
    pub fn history(&self) -> Vec<String> {
        self.inner.history.borrow().clone()
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> String {
        self.inner.current.borrow().clone()
    }

    fn set_fragment(&self, path: &str) {
        let path = path.trim_start_matches('#');
        if *self.inner.current.borrow() == path {
            return;
        }
        *self.inner.current.borrow_mut() = path.to_string();
        self.inner.history.borrow_mut().push(path.to_string());
        for listener in self.inner.listeners.borrow().iter() {
            listener();
        }
    }

    fn listen(&self, listener: Box<dyn Fn()>) {
        self.inner.listeners.borrow_mut().push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn set_fragment_notifies_only_on_change() {
        let location = MemoryLocation::new("#/posts");
        let fired = Rc::new(Cell::new(0));
        {
            let fired = fired.clone();
            location.listen(Box::new(move || fired.set(fired.get() + 1)));
        }

        location.set_fragment("/posts");
        assert_eq!(fired.get(), 0);

        location.set_fragment("/login");
        assert_eq!(fired.get(), 1);
        assert_eq!(location.fragment(), "/login");
        assert_eq!(location.history(), vec!["/login".to_string()]);
    }
}

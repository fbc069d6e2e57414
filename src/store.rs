//! 会话用户存储模块
//!
//! 持有唯一一份缓存的会话用户，并同步写穿到持久化键值存储。
//! "是否登录"由 `Option<SessionUser>` 派生，两者不可能不一致。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use talkboard_shared::SessionUser;

// =========================================================
// 抽象接口定义
// =========================================================

/// 持久化键值存储能力（浏览器中为 localStorage）
///
/// 所有操作都不会失败：读取出错视为 `None`，写入出错返回 `false`。
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

// =========================================================
// 内存实现 (MemoryStore)
// =========================================================

/// 内存键值存储
///
/// 克隆后共享同一份数据，可用来模拟"进程重启后仍在"的持久化存储。
#[derive(Clone, Default)]
pub struct MemoryStore {
    map: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接写入原始字符串（绕过序列化）
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.insert_raw(key, value);
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.map.borrow_mut().remove(key);
        true
    }
}

// =========================================================
// 会话用户存储 (UserStore)
// =========================================================

type Listener = Box<dyn Fn(Option<&SessionUser>)>;

/// 会话用户存储
///
/// 进程内唯一实例，以 `Rc<UserStore>` 注入到访问层、路由和页面。
/// 页面只能通过这里的方法读写身份，不能直接触碰存储。
pub struct UserStore {
    storage: Box<dyn KeyValueStore>,
    key: String,
    user: RefCell<Option<SessionUser>>,
    listeners: RefCell<Vec<Listener>>,
}

impl UserStore {
    pub fn new(storage: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            storage: Box::new(storage),
            key: key.into(),
            user: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn get_user(&self) -> Option<SessionUser> {
        self.user.borrow().clone()
    }

    /// 替换当前用户并立即持久化
    pub fn set_user(&self, user: SessionUser) {
        match serde_json::to_string(&user) {
            Ok(json) => {
                if !self.storage.set(&self.key, &json) {
                    tracing::warn!(key = %self.key, "failed to persist session user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize session user"),
        }
        *self.user.borrow_mut() = Some(user);
        self.notify();
    }

    /// 原地修改当前用户（如修改资料后），没有用户时不做任何事
    pub fn update_user<F>(&self, f: F)
    where
        F: FnOnce(&mut SessionUser),
    {
        let updated = {
            let mut slot = self.user.borrow_mut();
            match slot.as_mut() {
                Some(user) => {
                    f(user);
                    Some(user.clone())
                }
                None => None,
            }
        };
        if let Some(user) = updated {
            self.set_user(user);
        }
    }

    /// 清除当前用户并删除持久化记录（重复调用无副作用）
    pub fn clear_user(&self) {
        self.user.borrow_mut().take();
        self.storage.delete(&self.key);
        self.notify();
    }

    /// 从持久化存储恢复用户
    ///
    /// 记录损坏时视为未登录并清除残留键，从不报错。
    pub fn restore_user(&self) -> Option<SessionUser> {
        let raw = self.storage.get(&self.key)?;
        match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => {
                *self.user.borrow_mut() = Some(user.clone());
                self.notify();
                Some(user)
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding corrupted session user");
                self.clear_user();
                None
            }
        }
    }

    /// 订阅用户变化，每次变更后以最新值回调
    ///
    /// 回调中不能再调用 `subscribe`。
    pub fn subscribe(&self, listener: impl Fn(Option<&SessionUser>) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    fn notify(&self) {
        let snapshot = self.user.borrow().clone();
        for listener in self.listeners.borrow().iter() {
            listener(snapshot.as_ref());
        }
    }
}

#[cfg(test)]
mod tests;

//! 应用上下文
//!
//! 持有启动时装配好的服务（API、用户存储、位置），并把会话用户
//! 镜像为信号，通过 Context 在组件间共享。

use leptos::prelude::*;
use talkboard::{BoardApi, Services};
use talkboard_shared::SessionUser;

use crate::web::{FetchTransport, Timeout};

const TOAST_MILLIS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Clone, Copy)]
pub struct AppContext {
    services: StoredValue<Services<FetchTransport>, LocalStorage>,
    toast_timer: StoredValue<Option<Timeout>, LocalStorage>,
    /// 当前会话用户（只读）
    pub user: ReadSignal<Option<SessionUser>>,
    pub toast: ReadSignal<Option<Toast>>,
    set_toast: WriteSignal<Option<Toast>>,
}

impl AppContext {
    pub fn new(services: Services<FetchTransport>) -> Self {
        let (user, set_user) = signal(services.users.get_user());
        services
            .users
            .subscribe(move |u| set_user.set(u.cloned()));

        let (toast, set_toast) = signal(None);
        Self {
            services: StoredValue::new_local(services),
            toast_timer: StoredValue::new_local(None),
            user,
            toast,
            set_toast,
        }
    }

    pub fn api(&self) -> BoardApi<FetchTransport> {
        self.services.with_value(|s| s.api.clone())
    }

    pub fn services(&self) -> Services<FetchTransport> {
        self.services.get_value()
    }

    /// 跳转到 `path`（修改片段，由路由器完成解析）
    pub fn navigate(&self, path: &str) {
        self.services.with_value(|s| s.location.set_fragment(path));
    }

    /// 显示提示，3 秒后自动消失；新提示会替换旧提示
    pub fn show_toast(&self, message: impl Into<String>, kind: ToastKind) {
        self.set_toast.set(Some(Toast {
            message: message.into(),
            kind,
        }));

        let set_toast = self.set_toast;
        let timer = Timeout::new(TOAST_MILLIS, move || set_toast.set(None));
        self.toast_timer.set_value(timer);
    }

    pub fn dismiss_toast(&self) {
        self.toast_timer.set_value(None);
        self.set_toast.set(None);
    }
}

/// 从 Context 获取应用上下文
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}

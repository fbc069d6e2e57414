//! talkboard 前端应用
//!
//! 采用 Context-Driven 的架构：
//! - `web`: 浏览器能力的适配（fetch、localStorage、location.hash、日志）与路由出口
//! - `context`: 启动时装配的服务与会话用户信号
//! - `components`: 页面与 UI 组件

mod config;
mod context;
mod components {
    pub mod change_password;
    pub mod edit_profile;
    pub mod form;
    pub mod header;
    pub mod login;
    pub mod modal;
    pub mod not_found;
    pub mod post_detail;
    pub mod post_editor;
    pub mod post_list;
    pub mod signup;
    pub mod time;
    pub mod toast;
}
pub(crate) mod web;

use std::rc::Rc;

use leptos::prelude::*;
use talkboard::{RouteId, Services};

use crate::components::toast::ToastHost;
use crate::components::{
    change_password, edit_profile, login, not_found, post_detail, post_editor, post_list, signup,
};
use crate::context::AppContext;
use crate::web::router::{BuildPage, RouterOutlet};
use crate::web::{BrowserStorage, FetchTransport, HashLocation};

pub use config::log_level;
pub use web::init_logging;

/// 路由 -> 页面
fn page_for(route: RouteId) -> BuildPage {
    match route {
        RouteId::Home | RouteId::PostList => post_list::page,
        RouteId::Login => login::page,
        RouteId::Signup => signup::page,
        RouteId::EditProfile => edit_profile::page,
        RouteId::ChangePassword => change_password::page,
        RouteId::PostDetail => post_detail::page,
        RouteId::EditPost => post_editor::edit_page,
        RouteId::NewPost => post_editor::new_page,
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = match config::client_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid build configuration, using defaults");
            Default::default()
        }
    };

    // 1. 恢复会话并装配访问层
    let services = Services::start(
        config,
        FetchTransport::new(),
        BrowserStorage,
        Rc::new(HashLocation),
    );

    // 2. 提供应用上下文
    provide_context(AppContext::new(services));

    view! {
        <ToastHost />
        // 3. 路由出口：守卫、懒加载与渲染都由引擎完成
        <RouterOutlet pages=page_for not_found=not_found::render />
    }
}

//! 路由出口
//!
//! 把引擎的 `Router` 接到 Leptos 上：
//! - 每个页面在独立的子 `Owner` 下构建，换页时清理旧页面的信号与副作用
//! - 挂载回调把最新视图放进出口，并在需要登录时给出提示

use std::rc::Rc;

use futures::FutureExt;
use leptos::prelude::*;
use talkboard::{
    Outcome, PageContext, PageHandler, PageRegistry, RedirectReason, RenderError, RouteId, Router,
};

use crate::context::{ToastKind, use_app};
use crate::web::BrowserSpawner;

/// 页面构建函数
pub type BuildPage = fn(PageContext) -> Result<AnyView, RenderError>;

/// 路由表中的一个页面
#[derive(Clone)]
pub struct Page {
    build: BuildPage,
    parent: Owner,
}

/// 已构建的页面及其所属的响应式作用域
pub struct MountedPage {
    owner: Owner,
    view: AnyView,
}

impl PageHandler for Page {
    type View = MountedPage;

    fn render(&self, ctx: PageContext) -> Result<MountedPage, RenderError> {
        let owner = self.parent.child();
        match owner.with(|| (self.build)(ctx)) {
            Ok(view) => Ok(MountedPage { owner, view }),
            Err(e) => {
                owner.cleanup();
                Err(e)
            }
        }
    }
}

/// 路由出口组件
///
/// 根据路由解析结果渲染对应的页面；`pages` 把路由映射到页面构建函数。
#[component]
pub fn RouterOutlet(
    pages: fn(RouteId) -> BuildPage,
    not_found: fn() -> AnyView,
) -> impl IntoView {
    let app = use_app();
    let services = app.services();
    let parent = Owner::current().unwrap_or_else(Owner::new);

    let registry = {
        let parent = parent.clone();
        PageRegistry::new(move |id| {
            let page = Page {
                build: pages(id),
                parent: parent.clone(),
            };
            futures::future::ready(Ok(page)).boxed_local()
        })
    };
    let router = Rc::new(Router::new(services.location, services.users, registry));

    let current = StoredValue::new_local(Option::<AnyView>::None);
    let mounted_owner = StoredValue::new_local(Option::<Owner>::None);
    let (version, set_version) = signal(0u64);

    let show = move |owner: Owner, view: AnyView| {
        let previous = mounted_owner.try_update_value(|slot| slot.replace(owner)).flatten();
        if let Some(previous) = previous {
            previous.cleanup();
        }
        current.set_value(Some(view));
        set_version.update(|v| *v += 1);
    };

    let mount = move |outcome: Outcome<MountedPage>| match outcome {
        Outcome::Mounted { route, view } => {
            tracing::debug!(%route, "page mounted");
            show(view.owner, view.view);
        }
        Outcome::NotFound { fragment } => {
            tracing::info!(%fragment, "showing not-found page");
            let owner = parent.child();
            let view = owner.with(not_found);
            show(owner, view);
        }
        Outcome::Redirected {
            reason: RedirectReason::LoginRequired,
            ..
        } => {
            app.show_toast("请先登录", ToastKind::Info);
        }
        Outcome::Redirected { .. } | Outcome::Superseded => {}
    };

    router.init(BrowserSpawner, mount);
    // 监听器只持有弱引用，路由器随出口存活
    let _router = StoredValue::new_local(router);

    move || {
        version.get();
        current.try_update_value(|slot| slot.take()).flatten()
    }
}

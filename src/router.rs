//! 路由服务模块 - 核心引擎
//!
//! 实现了"监听 -> 匹配 -> 守卫 -> 加载 -> 渲染"的导航流程：
//! - 片段变化时解析目标路由
//! - 认证守卫查询 `UserStore`
//! - `PageRegistry` 按需加载并缓存页面处理器
//! - 每次解析推进代数计数器，过期的解析不会挂载任何东西

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawn, LocalSpawnExt};

use crate::error::{LoadError, RenderError};
use crate::location::Location;
use crate::route::{Access, Params, RouteId, match_route, paths};
use crate::store::UserStore;

// =========================================================
// 代数计数器 (Generations)
// =========================================================

/// 导航代数计数器
///
/// 每次解析开始时加一；异步回调通过 `NavToken` 判断自己是否已过期。
#[derive(Debug, Clone, Default)]
pub struct Generations(Arc<AtomicU64>);

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始新的一代并返回其令牌
    pub fn advance(&self) -> NavToken {
        let generation = self.0.fetch_add(1, Ordering::SeqCst) + 1;
        NavToken {
            generation,
            counter: self.0.clone(),
        }
    }

    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// 某一次导航的令牌
#[derive(Debug, Clone)]
pub struct NavToken {
    generation: u64,
    counter: Arc<AtomicU64>,
}

impl NavToken {
    /// 自捕获以来是否没有发生新的导航
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl PartialEq for NavToken {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation && Arc::ptr_eq(&self.counter, &other.counter)
    }
}

// =========================================================
// 页面上下文与处理器
// =========================================================

/// 传给页面处理器的上下文
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub route: RouteId,
    pub params: Params,
    /// 进程内的第一次解析（直接打开或刷新页面）
    pub first_navigation: bool,
    /// 上一个成功渲染的页面
    pub previous: Option<RouteId>,
    pub token: NavToken,
}

impl PageContext {
    /// 读取必需的路由参数
    pub fn param(&self, name: &'static str) -> Result<&str, RenderError> {
        self.params.get(name).ok_or(RenderError::MissingParam(name))
    }

    /// 这次访问是否应计入浏览数
    ///
    /// 直接打开/刷新页面，或从编辑页返回，都不计数。
    pub fn counts_as_view(&self) -> bool {
        !self.first_navigation && self.previous != Some(RouteId::EditPost)
    }
}

/// 页面处理器
pub trait PageHandler {
    type View;

    fn render(&self, ctx: PageContext) -> Result<Self::View, RenderError>;
}

/// 以普通函数实现的页面
pub type PageFn<V> = fn(PageContext) -> Result<V, RenderError>;

impl<V> PageHandler for PageFn<V> {
    type View = V;

    fn render(&self, ctx: PageContext) -> Result<V, RenderError> {
        (self)(ctx)
    }
}

// =========================================================
// 页面注册表 (PageRegistry)
// =========================================================

type Loader<H> = Box<dyn Fn(RouteId) -> LocalBoxFuture<'static, Result<H, LoadError>>>;

/// 按路由懒加载并缓存页面处理器
///
/// 只有被导航到的页面才会加载；加载失败不缓存，下次导航会重试。
pub struct PageRegistry<H> {
    loader: Loader<H>,
    loaded: RefCell<HashMap<RouteId, H>>,
    loads: Cell<usize>,
}

impl<H: Clone> PageRegistry<H> {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn(RouteId) -> LocalBoxFuture<'static, Result<H, LoadError>> + 'static,
    {
        Self {
            loader: Box::new(loader),
            loaded: RefCell::new(HashMap::new()),
            loads: Cell::new(0),
        }
    }

    pub async fn get(&self, id: RouteId) -> Result<H, LoadError> {
        if let Some(handler) = self.loaded.borrow().get(&id) {
            return Ok(handler.clone());
        }

        self.loads.set(self.loads.get() + 1);
        let handler = (self.loader)(id).await?;
        self.loaded.borrow_mut().insert(id, handler.clone());
        Ok(handler)
    }

    pub fn is_loaded(&self, id: RouteId) -> bool {
        self.loaded.borrow().contains_key(&id)
    }

    /// 调用加载器的次数
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }
}

// =========================================================
// 解析结果
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// 未登录访问会员页面
    LoginRequired,
    /// 已登录访问游客页面
    AlreadyLoggedIn,
}

/// 一次解析的结果（尚未渲染）
#[derive(Debug)]
pub enum Resolution<H> {
    Render { handler: H, ctx: PageContext },
    Redirect {
        to: &'static str,
        reason: RedirectReason,
    },
    NotFound { fragment: String },
    /// 加载期间发生了新的导航
    Superseded,
}

/// 交给挂载回调的最终结果
#[derive(Debug)]
pub enum Outcome<V> {
    Mounted { route: RouteId, view: V },
    Redirected {
        to: &'static str,
        reason: RedirectReason,
    },
    NotFound { fragment: String },
    Superseded,
}

// =========================================================
// 路由器 (Router)
// =========================================================

pub struct Router<H> {
    location: Rc<dyn Location>,
    users: Rc<UserStore>,
    pages: PageRegistry<H>,
    generations: Generations,
    first_navigation: Cell<bool>,
    previous: Cell<Option<RouteId>>,
    initialized: Cell<bool>,
}

impl<H> Router<H>
where
    H: PageHandler + Clone + 'static,
    H::View: 'static,
{
    pub fn new(location: Rc<dyn Location>, users: Rc<UserStore>, pages: PageRegistry<H>) -> Self {
        Self {
            location,
            users,
            pages,
            generations: Generations::new(),
            first_navigation: Cell::new(true),
            previous: Cell::new(None),
            initialized: Cell::new(false),
        }
    }

    /// 修改片段；实际的解析由片段变更监听触发
    pub fn navigate_to(&self, path: &str) {
        self.location.set_fragment(path);
    }

    pub fn generations(&self) -> &Generations {
        &self.generations
    }

    pub fn pages(&self) -> &PageRegistry<H> {
        &self.pages
    }

    /// 解析当前片段
    pub async fn resolve(&self) -> Resolution<H> {
        let token = self.generations.advance();
        let first_navigation = self.first_navigation.replace(false);
        let fragment = self.location.fragment();
        tracing::debug!(%fragment, generation = token.generation(), first_navigation, "resolving route");

        let Some(matched) = match_route(&fragment) else {
            tracing::info!(%fragment, "no route matched");
            return Resolution::NotFound { fragment };
        };
        let route = matched.entry.id;

        let logged_in = self.users.is_logged_in();
        let redirect = match matched.entry.access {
            Access::Member if !logged_in => Some((paths::LOGIN, RedirectReason::LoginRequired)),
            Access::Guest if logged_in => Some((paths::POSTS, RedirectReason::AlreadyLoggedIn)),
            _ => None,
        };
        if let Some((to, reason)) = redirect {
            tracing::info!(%route, to, ?reason, "route guard redirect");
            self.location.set_fragment(to);
            return Resolution::Redirect { to, reason };
        }

        let handler = match self.pages.get(route).await {
            Ok(handler) => handler,
            Err(e) => {
                tracing::warn!(%route, error = %e, "page loader failed");
                if !token.is_current() {
                    return Resolution::Superseded;
                }
                return Resolution::NotFound { fragment };
            }
        };

        if !token.is_current() {
            tracing::debug!(%route, generation = token.generation(), "resolution superseded");
            return Resolution::Superseded;
        }

        Resolution::Render {
            handler,
            ctx: PageContext {
                route,
                params: matched.params,
                first_navigation,
                previous: self.previous.get(),
                token,
            },
        }
    }

    /// 解析并渲染当前片段
    pub async fn resolve_and_render(&self) -> Outcome<H::View> {
        match self.resolve().await {
            Resolution::Render { handler, ctx } => {
                let route = ctx.route;
                match handler.render(ctx) {
                    Ok(view) => {
                        self.previous.set(Some(route));
                        Outcome::Mounted { route, view }
                    }
                    Err(e) => {
                        tracing::warn!(%route, error = %e, "page render failed");
                        Outcome::NotFound {
                            fragment: self.location.fragment(),
                        }
                    }
                }
            }
            Resolution::Redirect { to, reason } => Outcome::Redirected { to, reason },
            Resolution::NotFound { fragment } => Outcome::NotFound { fragment },
            Resolution::Superseded => Outcome::Superseded,
        }
    }

    /// 注册片段变更监听并执行第一次解析
    ///
    /// 每次解析都作为独立任务交给 `spawner`，结果交给 `mount`。重复调用无效。
    pub fn init<S, M>(self: &Rc<Self>, spawner: S, mount: M)
    where
        S: LocalSpawn + 'static,
        M: Fn(Outcome<H::View>) + 'static,
    {
        if self.initialized.replace(true) {
            tracing::warn!("router already initialized");
            return;
        }

        let mount: Rc<dyn Fn(Outcome<H::View>)> = Rc::new(mount);
        let router = Rc::downgrade(self);
        let schedule = Rc::new(move || {
            let Some(router) = router.upgrade() else {
                return;
            };
            let mount = mount.clone();
            let task = async move {
                let outcome = router.resolve_and_render().await;
                mount(outcome);
            };
            if let Err(e) = spawner.spawn_local(task) {
                tracing::warn!(error = ?e, "failed to schedule route resolution");
            }
        });

        {
            let schedule = schedule.clone();
            self.location.listen(Box::new(move || schedule()));
        }
        schedule();
    }
}

#[cfg(test)]
mod tests;

use super::*;
use crate::location::MemoryLocation;
use crate::store::MemoryStore;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::FutureExt;
use talkboard_shared::{Id, SessionUser};

type TestPage = PageFn<String>;

// =========================================================
// 测试页面
// =========================================================

fn render_route(ctx: PageContext) -> Result<String, RenderError> {
    Ok(format!("{}|first={}|prev={:?}", ctx.route, ctx.first_navigation, ctx.previous))
}

fn render_with_id(ctx: PageContext) -> Result<String, RenderError> {
    let id = ctx.param("id")?;
    Ok(format!("{}:{}", ctx.route, id))
}

fn render_broken(_ctx: PageContext) -> Result<String, RenderError> {
    Err(RenderError::Failed("boom".to_string()))
}

fn page_for(id: RouteId) -> TestPage {
    match id {
        RouteId::PostDetail | RouteId::EditPost => render_with_id,
        _ => render_route,
    }
}

// =========================================================
// 测试夹具
// =========================================================

struct Fixture {
    location: MemoryLocation,
    users: Rc<UserStore>,
    /// 被调用过的加载器
    loaded: Rc<RefCell<Vec<RouteId>>>,
    router: Rc<Router<TestPage>>,
}

fn fixture(initial: &str) -> Fixture {
    fixture_with(initial, |id| async move { Ok(page_for(id)) }.boxed_local())
}

fn fixture_with<F>(initial: &str, loader: F) -> Fixture
where
    F: Fn(RouteId) -> LocalBoxFuture<'static, Result<TestPage, LoadError>> + 'static,
{
    let location = MemoryLocation::new(initial);
    let users = Rc::new(UserStore::new(MemoryStore::new(), "user"));
    let loaded = Rc::new(RefCell::new(Vec::new()));
    let pages = {
        let loaded = loaded.clone();
        PageRegistry::new(move |id| {
            loaded.borrow_mut().push(id);
            loader(id)
        })
    };
    let router = Rc::new(Router::new(
        Rc::new(location.clone()),
        users.clone(),
        pages,
    ));
    Fixture {
        location,
        users,
        loaded,
        router,
    }
}

fn sample_user() -> SessionUser {
    SessionUser {
        user_id: Id::Number(1),
        email: "a@b.com".to_string(),
        nickname: "n".to_string(),
        profile_image_url: None,
    }
}

fn describe(outcome: Outcome<String>) -> String {
    match outcome {
        Outcome::Mounted { view, .. } => view,
        Outcome::Redirected { to, reason } => format!("redirect {} {:?}", to, reason),
        Outcome::NotFound { fragment } => format!("not-found {}", fragment),
        Outcome::Superseded => "superseded".to_string(),
    }
}

/// 初始化路由器，把每次挂载结果记录下来
fn start(f: &Fixture, pool: &LocalPool) -> Rc<RefCell<Vec<String>>> {
    let mounted = Rc::new(RefCell::new(Vec::new()));
    let sink = mounted.clone();
    f.router.init(pool.spawner(), move |outcome| {
        sink.borrow_mut().push(describe(outcome));
    });
    mounted
}

// =========================================================
// 认证守卫
// =========================================================

#[test]
fn member_route_without_user_redirects_and_never_renders() {
    let f = fixture("#/posts/new");
    let mut pool = LocalPool::new();
    let mounted = start(&f, &pool);
    pool.run_until_stalled();

    assert_eq!(f.location.fragment(), "/login");
    assert!(!f.loaded.borrow().contains(&RouteId::NewPost));
    assert_eq!(
        *mounted.borrow(),
        vec![
            "redirect /login LoginRequired".to_string(),
            "login|first=false|prev=None".to_string(),
        ]
    );
}

#[test]
fn guest_route_with_user_redirects_to_posts() {
    let f = fixture("#/login");
    f.users.set_user(sample_user());
    let mut pool = LocalPool::new();
    let mounted = start(&f, &pool);
    pool.run_until_stalled();

    assert_eq!(f.location.fragment(), "/posts");
    assert_eq!(mounted.borrow()[0], "redirect /posts AlreadyLoggedIn");
    assert_eq!(mounted.borrow()[1], "post-list|first=false|prev=None");
}

#[test]
fn member_route_with_user_renders() {
    let f = fixture("#/posts/42/edit");
    f.users.set_user(sample_user());
    let mut pool = LocalPool::new();
    let mounted = start(&f, &pool);
    pool.run_until_stalled();

    assert_eq!(*mounted.borrow(), vec!["edit-post:42".to_string()]);
}

// =========================================================
// 首次导航与上一页
// =========================================================

#[test]
fn first_navigation_flag_is_consumed_once() {
    let f = fixture("#/posts");
    f.users.set_user(sample_user());
    let mut pool = LocalPool::new();
    let mounted = start(&f, &pool);
    pool.run_until_stalled();

    f.router.navigate_to("/");
    pool.run_until_stalled();

    assert_eq!(
        *mounted.borrow(),
        vec![
            "post-list|first=true|prev=None".to_string(),
            "home|first=false|prev=Some(PostList)".to_string(),
        ]
    );
}

#[test]
fn context_carries_previous_route() {
    let f = fixture("#/posts/5/edit");
    f.users.set_user(sample_user());

    let mut pool = LocalPool::new();
    pool.run_until(async {
        let _ = f.router.resolve_and_render().await;
        f.location.set_fragment("/posts/5");
        match f.router.resolve().await {
            Resolution::Render { ctx, .. } => {
                assert_eq!(ctx.route, RouteId::PostDetail);
                assert_eq!(ctx.previous, Some(RouteId::EditPost));
                assert!(!ctx.first_navigation);
                assert_eq!(ctx.params.get("id"), Some("5"));
            }
            other => panic!("unexpected resolution: {:?}", other),
        }
    });
}

#[test]
fn view_counting_skips_direct_visits_and_returns_from_edit() {
    let f = fixture("#/posts/5");
    f.users.set_user(sample_user());

    let mut pool = LocalPool::new();
    pool.run_until(async {
        let counts = |resolution: Resolution<TestPage>| match resolution {
            Resolution::Render { ctx, .. } => ctx.counts_as_view(),
            other => panic!("unexpected resolution: {:?}", other),
        };

        // 直接打开
        assert!(!counts(f.router.resolve().await));
        let _ = f.router.resolve_and_render().await;

        f.location.set_fragment("/posts");
        let _ = f.router.resolve_and_render().await;
        f.location.set_fragment("/posts/5");
        assert!(counts(f.router.resolve().await));

        f.location.set_fragment("/posts/5/edit");
        let _ = f.router.resolve_and_render().await;
        f.location.set_fragment("/posts/5");
        assert!(!counts(f.router.resolve().await));
    });
}

// =========================================================
// 未找到
// =========================================================

#[test]
fn unknown_fragment_is_not_found() {
    let f = fixture("#/nowhere");
    let mut pool = LocalPool::new();
    let mounted = start(&f, &pool);
    pool.run_until_stalled();
    assert_eq!(*mounted.borrow(), vec!["not-found /nowhere".to_string()]);
}

#[test]
fn loader_failure_is_not_found_and_not_cached() {
    let f = fixture_with("#/posts", |_| {
        async { Err(LoadError("chunk missing".to_string())) }.boxed_local()
    });
    f.users.set_user(sample_user());
    let mut pool = LocalPool::new();
    let mounted = start(&f, &pool);
    pool.run_until_stalled();

    assert_eq!(*mounted.borrow(), vec!["not-found /posts".to_string()]);
    assert!(!f.router.pages().is_loaded(RouteId::PostList));

    f.router.navigate_to("/");
    f.router.navigate_to("/posts");
    pool.run_until_stalled();
    assert_eq!(f.router.pages().load_count(), 3);
}

#[test]
fn render_failure_is_not_found() {
    let f = fixture_with("#/posts", |_| async { Ok(render_broken as TestPage) }.boxed_local());
    f.users.set_user(sample_user());
    let mut pool = LocalPool::new();
    let mounted = start(&f, &pool);
    pool.run_until_stalled();
    assert_eq!(*mounted.borrow(), vec!["not-found /posts".to_string()]);
}

#[test]
fn missing_param_is_render_error() {
    let f = fixture("#/posts");
    let ctx = PageContext {
        route: RouteId::PostDetail,
        params: Params::default(),
        first_navigation: false,
        previous: None,
        token: f.router.generations().advance(),
    };
    assert_eq!(render_with_id(ctx), Err(RenderError::MissingParam("id")));
}

// =========================================================
// 懒加载与代数
// =========================================================

#[test]
fn pages_are_loaded_once_and_only_when_visited() {
    let f = fixture("#/posts");
    f.users.set_user(sample_user());
    let mut pool = LocalPool::new();
    let _mounted = start(&f, &pool);
    pool.run_until_stalled();

    f.router.navigate_to("/posts/1");
    pool.run_until_stalled();
    f.router.navigate_to("/posts");
    pool.run_until_stalled();
    f.router.navigate_to("/posts/2");
    pool.run_until_stalled();

    assert_eq!(
        *f.loaded.borrow(),
        vec![RouteId::PostList, RouteId::PostDetail]
    );
    assert!(!f.router.pages().is_loaded(RouteId::NewPost));
}

#[test]
fn slow_load_is_superseded_by_newer_navigation() {
    let gate: Rc<RefCell<Option<oneshot::Receiver<()>>>> = Rc::new(RefCell::new(None));
    let (release, wait) = oneshot::channel::<()>();
    *gate.borrow_mut() = Some(wait);

    let f = {
        let gate = gate.clone();
        fixture_with("#/posts/1", move |id| {
            let wait = if id == RouteId::PostDetail {
                gate.borrow_mut().take()
            } else {
                None
            };
            async move {
                if let Some(wait) = wait {
                    let _ = wait.await;
                }
                Ok(page_for(id))
            }
            .boxed_local()
        })
    };
    f.users.set_user(sample_user());

    let mut pool = LocalPool::new();
    let mounted = start(&f, &pool);
    pool.run_until_stalled();
    assert!(mounted.borrow().is_empty());

    // 加载尚未完成时跳转到列表
    f.router.navigate_to("/posts");
    pool.run_until_stalled();
    assert_eq!(*mounted.borrow(), vec!["post-list|first=false|prev=None".to_string()]);

    release.send(()).unwrap();
    pool.run_until_stalled();
    assert_eq!(
        *mounted.borrow(),
        vec![
            "post-list|first=false|prev=None".to_string(),
            "superseded".to_string(),
        ]
    );
}

#[test]
fn tokens_expire_on_next_navigation() {
    let generations = Generations::new();
    let first = generations.advance();
    assert!(first.is_current());

    let second = generations.advance();
    assert!(!first.is_current());
    assert!(second.is_current());
    assert_eq!(generations.current(), second.generation());
    assert_ne!(first, second);
}

#[test]
fn init_twice_is_ignored() {
    let f = fixture("#/login");
    let mut pool = LocalPool::new();
    let mounted = start(&f, &pool);
    let _again = start(&f, &pool);
    pool.run_until_stalled();
    assert_eq!(*mounted.borrow(), vec!["login|first=true|prev=None".to_string()]);
}

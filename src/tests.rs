//! 端到端场景：装配好的服务 + 路由器 + 模拟后端

use super::*;
use crate::request::MockHttpClient;
use futures::FutureExt;
use futures::executor::LocalPool;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use talkboard_shared::Id;
use talkboard_shared::protocol::HttpMethod;

const BASE: &str = "http://api.test";

type Page = PageFn<String>;

fn show_route(ctx: PageContext) -> Result<String, RenderError> {
    Ok(ctx.route.to_string())
}

struct World {
    http: Rc<MockHttpClient>,
    storage: MemoryStore,
    location: MemoryLocation,
    services: Services<Rc<MockHttpClient>>,
}

fn world(initial: &str, storage: MemoryStore) -> World {
    let http = Rc::new(MockHttpClient::new());
    let location = MemoryLocation::new(initial);
    let services = Services::start(
        ClientConfig::new(BASE).unwrap(),
        http.clone(),
        storage.clone(),
        Rc::new(location.clone()),
    );
    World {
        http,
        storage,
        location,
        services,
    }
}

fn router_for(w: &World) -> Rc<Router<Page>> {
    let pages = PageRegistry::new(|_| async { Ok(show_route as Page) }.boxed_local());
    Rc::new(Router::new(
        w.services.location.clone(),
        w.services.users.clone(),
        pages,
    ))
}

#[test]
fn login_then_guest_page_redirects_to_posts() {
    let w = world("#/login", MemoryStore::new());
    w.http.mock_json(
        HttpMethod::Post,
        &format!("{}/auth/login", BASE),
        200,
        json!({"code": "LOGIN_OK", "data": {"userId": 1, "email": "a@b.com", "nickname": "n"}}),
    );

    let router = router_for(&w);
    let mounted = Rc::new(RefCell::new(Vec::new()));
    let mut pool = LocalPool::new();
    {
        let mounted = mounted.clone();
        router.init(pool.spawner(), move |outcome| {
            if let Outcome::Mounted { route, .. } = outcome {
                mounted.borrow_mut().push(route);
            }
        });
    }
    pool.run_until_stalled();
    assert_eq!(*mounted.borrow(), vec![RouteId::Login]);

    let user = pool.run_until(w.services.api.login("a@b.com", "password1")).unwrap();
    assert_eq!(user.user_id, Id::Number(1));
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.nickname, "n");
    assert_eq!(user.profile_image_url, None);
    assert!(w.services.users.is_logged_in());

    // 已登录时访问登录页
    router.navigate_to("/posts/1");
    pool.run_until_stalled();
    router.navigate_to("/login");
    pool.run_until_stalled();

    assert_eq!(w.location.fragment(), "/posts");
    assert_eq!(
        *mounted.borrow(),
        vec![RouteId::Login, RouteId::PostDetail, RouteId::PostList]
    );
}

#[test]
fn missing_post_shows_mapped_message() {
    let w = world("#/posts/999", MemoryStore::new());
    w.services
        .users
        .set_user(serde_json::from_value(json!({"userId": 1, "email": "a@b.com", "nickname": "n"})).unwrap());
    w.http.mock_json(
        HttpMethod::Get,
        &format!("{}/posts/999", BASE),
        404,
        json!({"code": "POST_NOT_FOUND", "data": null}),
    );

    let mut pool = LocalPool::new();
    let err = pool.run_until(w.services.api.get_post("999")).unwrap_err();

    let fallback = "帖子加载失败";
    let shown = messages::describe(&err, fallback);
    assert_eq!(shown, "帖子不存在或已被删除");
    assert_ne!(shown, fallback);
    // 404 不影响会话
    assert!(w.services.users.is_logged_in());
}

#[test]
fn session_survives_restart() {
    let storage = MemoryStore::new();
    {
        let w = world("#/login", storage.clone());
        w.http.mock_json(
            HttpMethod::Post,
            &format!("{}/auth/login", BASE),
            200,
            json!({"code": "LOGIN_OK", "data": {"userId": "u-1", "email": "a@b.com", "nickname": "n"}}),
        );
        LocalPool::new()
            .run_until(w.services.api.login("a@b.com", "password1"))
            .unwrap();
        assert!(w.storage.contains("user"));
    }

    let restarted = world("#/posts", storage);
    assert!(restarted.services.users.is_logged_in());
    assert_eq!(
        restarted.services.users.get_user().unwrap().user_id,
        Id::Text("u-1".to_string())
    );
}

#[test]
fn expired_session_sends_user_back_to_login() {
    let w = world("#/posts", MemoryStore::new());
    w.services
        .users
        .set_user(serde_json::from_value(json!({"userId": 1, "email": "a@b.com", "nickname": "n"})).unwrap());
    w.http.mock_json(
        HttpMethod::Get,
        &format!("{}/posts?page=1&size=10", BASE),
        401,
        json!({"detail": "Not authenticated"}),
    );

    let router = router_for(&w);
    let mounted = Rc::new(RefCell::new(Vec::new()));
    let mut pool = LocalPool::new();
    {
        let mounted = mounted.clone();
        router.init(pool.spawner(), move |outcome| {
            if let Outcome::Mounted { route, .. } = outcome {
                mounted.borrow_mut().push(route);
            }
        });
    }
    pool.run_until_stalled();

    let err = pool.run_until(w.services.api.list_posts(1)).unwrap_err();
    assert_eq!(err.status(), Some(401));
    pool.run_until_stalled();

    assert!(!w.services.users.is_logged_in());
    assert!(!w.storage.contains("user"));
    assert_eq!(*mounted.borrow(), vec![RouteId::PostList, RouteId::Login]);
}

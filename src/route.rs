//! 路由定义模块 - 领域模型
//!
//! 纯粹的路由表与匹配逻辑，不依赖于 DOM。
//! 匹配规则：先精确匹配，再按声明顺序尝试带参数的模式，第一个结构匹配者胜出。

use std::fmt::{self, Display};

/// 应用页面标识（封闭枚举，加载器必须穷举）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    /// `/`，与帖子列表相同的页面
    Home,
    Login,
    Signup,
    PostList,
    EditProfile,
    ChangePassword,
    PostDetail,
    EditPost,
    NewPost,
}

impl RouteId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::PostList => "post-list",
            Self::EditProfile => "edit-profile",
            Self::ChangePassword => "change-password",
            Self::PostDetail => "post-detail",
            Self::EditPost => "edit-post",
            Self::NewPost => "new-post",
        }
    }
}

impl Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 路由访问限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 需要登录，未登录重定向到登录页
    Member,
    /// 仅限游客（登录、注册），已登录重定向到帖子列表
    Guest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: &'static str,
    pub id: RouteId,
    pub access: Access,
}

/// 路由表（声明顺序即匹配顺序）
pub static ROUTES: &[RouteEntry] = &[
    RouteEntry {
        pattern: "/",
        id: RouteId::Home,
        access: Access::Member,
    },
    RouteEntry {
        pattern: "/login",
        id: RouteId::Login,
        access: Access::Guest,
    },
    RouteEntry {
        pattern: "/signup",
        id: RouteId::Signup,
        access: Access::Guest,
    },
    RouteEntry {
        pattern: "/posts",
        id: RouteId::PostList,
        access: Access::Member,
    },
    RouteEntry {
        pattern: "/profile/edit",
        id: RouteId::EditProfile,
        access: Access::Member,
    },
    RouteEntry {
        pattern: "/profile/password",
        id: RouteId::ChangePassword,
        access: Access::Member,
    },
    RouteEntry {
        pattern: "/posts/:id",
        id: RouteId::PostDetail,
        access: Access::Member,
    },
    RouteEntry {
        pattern: "/posts/:id/edit",
        id: RouteId::EditPost,
        access: Access::Member,
    },
    RouteEntry {
        pattern: "/posts/new",
        id: RouteId::NewPost,
        access: Access::Member,
    },
];

/// 常用路径
pub mod paths {
    use std::fmt::Display;

    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const SIGNUP: &str = "/signup";
    pub const POSTS: &str = "/posts";
    pub const NEW_POST: &str = "/posts/new";
    pub const EDIT_PROFILE: &str = "/profile/edit";
    pub const CHANGE_PASSWORD: &str = "/profile/password";

    pub fn post(id: impl Display) -> String {
        format!("/posts/{}", id)
    }

    pub fn edit_post(id: impl Display) -> String {
        format!("/posts/{}/edit", id)
    }
}

/// 从路由模式中提取的参数（按出现顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Params {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub entry: &'static RouteEntry,
    pub params: Params,
}

/// 把原始片段整理为路径：去掉 `#` 与查询串，空片段视为 `/`
pub fn normalize_fragment(raw: &str) -> String {
    let path = raw.trim_start_matches('#');
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// 在路由表中查找片段对应的路由
pub fn match_route(fragment: &str) -> Option<RouteMatch> {
    match_in(ROUTES, fragment)
}

fn match_in(table: &'static [RouteEntry], fragment: &str) -> Option<RouteMatch> {
    let path = normalize_fragment(fragment);

    if let Some(entry) = table.iter().find(|e| e.pattern == path) {
        return Some(RouteMatch {
            entry,
            params: Params::default(),
        });
    }

    table
        .iter()
        .filter(|e| e.pattern.contains(':'))
        .find_map(|entry| {
            match_pattern(entry.pattern, &path).map(|params| RouteMatch { entry, params })
        })
}

/// 逐段匹配；变量段必须恰好占据一个非空段
fn match_pattern(pattern: &str, path: &str) -> Option<Params> {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.iter().zip(path_segments.iter()) {
        match expected.strip_prefix(':') {
            Some(name) => {
                if actual.is_empty() {
                    return None;
                }
                params.push((name.to_string(), actual.to_string()));
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(Params(params))
}

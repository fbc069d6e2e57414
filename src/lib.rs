//! talkboard 客户端引擎
//!
//! 与平台无关的部分：会话用户存储、HTTP 访问层、路由表与哈希路由、
//! 论坛 API、错误消息与表单校验。浏览器相关的实现都在前端 crate。

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod location;
pub mod messages;
pub mod request;
pub mod route;
pub mod router;
pub mod store;
pub mod validation;

pub use api::{BoardApi, LikeState, PostPage};
pub use app::Services;
pub use client::{ApiClient, Envelope};
pub use config::ClientConfig;
pub use error::{ApiError, ClientError, ClientResult, ConfigError, LoadError, RenderError};
pub use location::{Location, MemoryLocation};
pub use request::{HttpClient, HttpRequest, HttpResponse, MultipartForm, RequestBody};
pub use route::{Access, Params, RouteId};
pub use router::{
    NavToken, Outcome, PageContext, PageFn, PageHandler, PageRegistry, RedirectReason, Router,
};
pub use store::{KeyValueStore, MemoryStore, UserStore};

#[cfg(test)]
mod tests;

//! HTTP 访问层
//!
//! 所有网络调用的唯一出口：
//! - 每个请求都携带凭据（Cookie 会话）
//! - 非表单请求带 `Content-Type: application/json`
//! - 响应统一归一化为 `Envelope` / `ApiError`
//! - 401 时清除会话用户并跳转登录页（可按调用关闭）
//! - 不做任何重试

mod envelope;

use std::rc::Rc;

use serde::Serialize;
use talkboard_shared::protocol::HttpMethod;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::location::Location;
use crate::request::{HttpClient, HttpRequest, MultipartForm, RequestBody};
use crate::route::paths;
use crate::store::UserStore;

pub use envelope::{Envelope, normalize};

struct ClientInner<C> {
    config: ClientConfig,
    http: C,
    users: Rc<UserStore>,
    location: Rc<dyn Location>,
}

/// API 客户端
///
/// 克隆开销很小（共享内部状态），`without_session_redirect` 返回的是同一客户端的另一个视图。
pub struct ApiClient<C> {
    inner: Rc<ClientInner<C>>,
    redirect_on_unauthorized: bool,
}

impl<C> Clone for ApiClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            redirect_on_unauthorized: self.redirect_on_unauthorized,
        }
    }
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(
        config: ClientConfig,
        http: C,
        users: Rc<UserStore>,
        location: Rc<dyn Location>,
    ) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                config,
                http,
                users,
                location,
            }),
            redirect_on_unauthorized: true,
        }
    }

    /// 401 是预期结果的调用（登录、注册等）使用：不清除会话、不跳转
    pub fn without_session_redirect(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            redirect_on_unauthorized: false,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn users(&self) -> &Rc<UserStore> {
        &self.inner.users
    }

    // --- 每个 HTTP 动词一个操作 ---

    pub async fn get(&self, path: &str) -> ClientResult<Envelope> {
        self.send(HttpMethod::Get, path, RequestBody::Empty).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Envelope> {
        let body = encode(body)?;
        self.send(HttpMethod::Post, path, body).await
    }

    /// 无请求体的 POST（如点赞）
    pub async fn post_empty(&self, path: &str) -> ClientResult<Envelope> {
        self.send(HttpMethod::Post, path, RequestBody::Empty).await
    }

    /// 二进制表单 POST（文件上传）
    pub async fn post_form(&self, path: &str, form: MultipartForm) -> ClientResult<Envelope> {
        self.send(HttpMethod::Post, path, RequestBody::Multipart(form))
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Envelope> {
        let body = encode(body)?;
        self.send(HttpMethod::Put, path, body).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<Envelope> {
        let body = encode(body)?;
        self.send(HttpMethod::Patch, path, body).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Envelope> {
        self.send(HttpMethod::Delete, path, RequestBody::Empty)
            .await
    }

    async fn send(&self, method: HttpMethod, path: &str, body: RequestBody) -> ClientResult<Envelope> {
        let url = self.inner.config.url(path);
        let is_form = matches!(body, RequestBody::Multipart(_));

        let mut req = HttpRequest::new(&url, method)
            .with_credentials()
            .with_body(body);
        if !is_form {
            req = req.with_header("Content-Type", "application/json");
        }

        tracing::debug!(method = method.as_str(), %url, "api request");
        let resp = self.inner.http.send(req).await?;

        match normalize(resp.status, &resp.body) {
            Ok(envelope) => Ok(envelope),
            Err(err) => {
                if err.is_unauthorized() && self.redirect_on_unauthorized {
                    tracing::info!(%url, "session expired, redirecting to login");
                    self.inner.users.clear_user();
                    self.inner.location.set_fragment(paths::LOGIN);
                }
                tracing::debug!(status = err.status, code = ?err.code, "api error");
                Err(ClientError::Api(err))
            }
        }
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ClientResult<RequestBody> {
    serde_json::to_string(body)
        .map(RequestBody::Json)
        .map_err(|e| ClientError::Encode(e.to_string()))
}

#[cfg(test)]
mod tests;

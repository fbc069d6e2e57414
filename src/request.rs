use std::collections::HashMap;

use talkboard_shared::protocol::HttpMethod;

use crate::error::ClientError;

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 二进制表单中的一个字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// multipart/form-data 负载
///
/// 不强制 Content-Type，由传输层生成带 boundary 的头。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub parts: Vec<(String, FormValue)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts
            .push((name.to_string(), FormValue::Text(value.to_string())));
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        self.parts.push((
            name.to_string(),
            FormValue::File {
                file_name: file_name.to_string(),
                mime: mime.to_string(),
                bytes,
            },
        ));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(String),
    Multipart(MultipartForm),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
    /// 是否携带凭据（Cookie）
    pub with_credentials: bool,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: RequestBody::Empty,
            with_credentials: false,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_credentials(mut self) -> Self {
        self.with_credentials = true;
        self
    }
}

/// 通用 HTTP 响应结构（状态码 + 原始 body 文本）
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 JsFuture 等类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    /// 发送请求；只有拿不到响应时才返回 `ClientError::Network`
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ClientError>;
}

#[async_trait::async_trait(?Send)]
impl<T: HttpClient + ?Sized> HttpClient for std::rc::Rc<T> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ClientError> {
        (**self).send(req).await
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // ("METHOD url", Ok((Status, Body)) 或网络错误)
    responses: RefCell<HashMap<String, Result<(u16, String), String>>>,
    // 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method.as_str(), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert(Self::key(method, url), Ok((status, body.to_string())));
    }

    pub fn mock_json(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.mock_response(method, url, status, &body.to_string());
    }

    pub fn mock_network_error(&self, method: HttpMethod, url: &str) {
        self.responses.borrow_mut().insert(
            Self::key(method, url),
            Err("Failed to fetch".to_string()),
        );
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ClientError> {
        let key = Self::key(req.method, &req.url);
        self.requests.borrow_mut().push(req);

        match self.responses.borrow().get(&key) {
            Some(Ok((status, body))) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Err(msg)) => Err(ClientError::Network(msg.clone())),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

// =========================================================
// 测试工具: ReqwestHttpClient（真实 HTTP，带 Cookie 存储）
// =========================================================

#[cfg(test)]
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(test)]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("reqwest client"),
        }
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ClientError> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        builder = match req.body {
            RequestBody::Empty => builder,
            RequestBody::Json(json) => builder.body(json),
            RequestBody::Multipart(form) => {
                let mut multipart = reqwest::multipart::Form::new();
                for (name, value) in form.parts {
                    multipart = match value {
                        FormValue::Text(text) => multipart.text(name, text),
                        FormValue::File {
                            file_name,
                            mime,
                            bytes,
                        } => {
                            let part = reqwest::multipart::Part::bytes(bytes)
                                .file_name(file_name)
                                .mime_str(&mime)
                                .map_err(|e| ClientError::Encode(e.to_string()))?;
                            multipart.part(name, part)
                        }
                    };
                }
                builder.multipart(multipart)
            }
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Reqwest Error: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Reqwest Body Error: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

//! HTTP 传输层
//!
//! 使用 `web_sys::fetch` 实现引擎的 `HttpClient`：
//! 只负责把请求发出去并取回 (状态码, body 文本)，归一化由引擎完成。

use async_trait::async_trait;
use js_sys::{Array, Uint8Array};
use talkboard::request::FormValue;
use talkboard::{ClientError, HttpClient, HttpRequest, HttpResponse, MultipartForm, RequestBody};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, FormData, Headers, Request, RequestCredentials, RequestInit, Response,
};

/// 基于 fetch 的传输实现
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ClientError> {
        let headers = Headers::new()
            .map_err(|e| ClientError::Encode(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| ClientError::Encode(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if req.with_credentials {
            opts.set_credentials(RequestCredentials::Include);
        }

        match req.body {
            RequestBody::Empty => {}
            RequestBody::Json(body) => opts.set_body(&JsValue::from_str(&body)),
            RequestBody::Multipart(form) => opts.set_body(&to_form_data(form)?.into()),
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| ClientError::Encode(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| ClientError::Network("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ClientError::Network(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ClientError::Network(format!("Response 类型转换失败: {:?}", e)))?;

        let status = response.status();
        if status == 204 {
            return Ok(HttpResponse {
                status,
                body: String::new(),
            });
        }

        Ok(HttpResponse {
            status,
            body: read_text(&response).await,
        })
    }
}

/// 读取响应体；读取失败按空 body 处理
async fn read_text(response: &Response) -> String {
    let Ok(promise) = response.text() else {
        return String::new();
    };
    match JsFuture::from(promise).await {
        Ok(text) => text.as_string().unwrap_or_default(),
        Err(e) => {
            tracing::debug!(error = ?e, "failed to read response body");
            String::new()
        }
    }
}

fn to_form_data(form: MultipartForm) -> Result<FormData, ClientError> {
    let data =
        FormData::new().map_err(|e| ClientError::Encode(format!("创建 FormData 失败: {:?}", e)))?;

    for (name, value) in form.parts {
        let appended = match value {
            FormValue::Text(text) => data.append_with_str(&name, &text),
            FormValue::File {
                file_name,
                mime,
                bytes,
            } => {
                let parts = Array::of1(&Uint8Array::from(bytes.as_slice()));
                let options = BlobPropertyBag::new();
                options.set_type(&mime);
                let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
                    .map_err(|e| ClientError::Encode(format!("创建 Blob 失败: {:?}", e)))?;
                data.append_with_blob_and_filename(&name, &blob, &file_name)
            }
        };
        appended.map_err(|e| ClientError::Encode(format!("写入表单字段失败: {:?}", e)))?;
    }

    Ok(data)
}

//! 响应归一化
//!
//! 任何 HTTP 响应都被整理为 `{code, data}` 信封（成功）或 `ApiError`（失败），
//! 调用方永远看不到原始响应或 JSON 解析异常。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use talkboard_shared::{CODE_OK, CODE_UNKNOWN};

use crate::error::{ApiError, ClientError, ClientResult};

/// 统一响应信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// 合成的空成功信封 `{code: "OK", data: null}`
    pub fn ok() -> Self {
        Self {
            code: CODE_OK.to_string(),
            data: Value::Null,
        }
    }

    /// 按期望类型解码 data
    pub fn into_data<T: DeserializeOwned>(self) -> ClientResult<T> {
        serde_json::from_value(self.data).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// 解码 data，`null` 视为 `None`
    pub fn into_optional_data<T: DeserializeOwned>(self) -> ClientResult<Option<T>> {
        if self.data.is_null() {
            Ok(None)
        } else {
            self.into_data().map(Some)
        }
    }
}

/// 把 (状态码, body 文本) 归一化为信封或错误
///
/// - 204: 不读取 body，直接返回 `{OK, null}`
/// - 其他状态: 尝试解析 JSON；空 body 或解析失败时，2xx 合成 `{OK, null}`，
///   非 2xx 合成 `{UNKNOWN, null}`
pub fn normalize(status: u16, body: &str) -> Result<Envelope, ApiError> {
    if status == 204 {
        return Ok(Envelope::ok());
    }

    let parsed = if body.trim().is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(body).ok()
    };

    if (200..300).contains(&status) {
        return Ok(parsed.map(success_envelope).unwrap_or_else(Envelope::ok));
    }

    let parsed = parsed.unwrap_or_else(|| {
        serde_json::json!({
            "code": CODE_UNKNOWN,
            "data": null,
        })
    });
    Err(failure(status, &parsed))
}

fn success_envelope(body: Value) -> Envelope {
    match body {
        Value::Object(mut map) if map.contains_key("code") || map.contains_key("data") => {
            let code = map
                .get("code")
                .and_then(non_empty_str)
                .unwrap_or(CODE_OK)
                .to_string();
            let data = map.remove("data").unwrap_or(Value::Null);
            Envelope { code, data }
        }
        // 不符合信封形态的 JSON 整体视为 data
        other => Envelope {
            code: CODE_OK.to_string(),
            data: other,
        },
    }
}

/// 从失败响应体解析错误
///
/// message 优先级: code → detail(字符串) → detail.code → `HTTP <status>`
fn failure(status: u16, body: &Value) -> ApiError {
    let code = body.get("code").and_then(non_empty_str);
    let detail = body.get("detail");
    let detail_text = detail.and_then(non_empty_str);
    let detail_code = detail
        .and_then(|d| d.get("code"))
        .and_then(non_empty_str);

    let message = code
        .or(detail_text)
        .or(detail_code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status));

    ApiError {
        message,
        code: code.or(detail_code).map(str::to_string),
        status,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

use thiserror::Error;

// =========================================================
// 应用错误 (非 2xx 响应)
// =========================================================

/// 非 2xx 响应归一化后的错误
///
/// - `message`: 按优先级解析出的消息（code → detail 字符串 → detail.code → `HTTP <status>`）
/// - `code`: 机器可读的错误码，可能为空
/// - `status`: HTTP 状态码
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub code: Option<String>,
    pub status: u16,
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

// =========================================================
// 客户端错误
// =========================================================

/// 访问层向调用方暴露的唯一错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// 后端返回了非 2xx 响应
    #[error(transparent)]
    Api(#[from] ApiError),
    /// fetch 本身失败（断网、CORS、DNS 等），没有拿到任何响应
    #[error("网络错误: {0}")]
    Network(String),
    /// 请求体序列化失败
    #[error("请求构建失败: {0}")]
    Encode(String),
    /// 成功响应的 data 与期望的类型不符
    #[error("响应解析失败: {0}")]
    Decode(String),
}

impl ClientError {
    /// 错误码（仅应用错误才有）
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api(e) => e.code.as_deref(),
            _ => None,
        }
    }

    /// HTTP 状态码（仅应用错误才有）
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(e) => Some(e.status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

// =========================================================
// 路由相关错误
// =========================================================

/// 页面加载失败（加载器报错）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("页面加载失败: {0}")]
pub struct LoadError(pub String);

/// 页面渲染失败（如缺少必需的路由参数）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("缺少路由参数: {0}")]
    MissingParam(&'static str),
    #[error("页面渲染失败: {0}")]
    Failed(String),
}

// =========================================================
// 配置错误
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("无效的 API 地址: {0}")]
    InvalidBaseUrl(String),
}

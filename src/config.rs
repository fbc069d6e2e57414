use crate::error::ConfigError;

// =========================================================
// 客户端配置 (Client Configuration)
// =========================================================

/// 这些是默认值，构建时未提供对应变量则使用它们
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_STORAGE_KEY: &str = "user";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub const VAR_API_BASE: &str = "TALKBOARD_API_BASE";
pub const VAR_USER_KEY: &str = "TALKBOARD_USER_KEY";
pub const VAR_PAGE_SIZE: &str = "TALKBOARD_PAGE_SIZE";

/// 客户端配置
///
/// 通过 `from_lookup` 注入变量来源：浏览器端为构建期 `option_env!`，
/// 测试中为 HashMap。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 后端根地址（无结尾 `/`）
    pub base_url: String,
    /// 持久化会话用户的存储键
    pub user_storage_key: String,
    /// 帖子列表每页条数
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_storage_key: DEFAULT_USER_STORAGE_KEY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// 从变量来源读取配置，读不到就用默认值
    ///
    /// 页大小无法解析或为 0 时回退到默认值；API 地址非法则报错。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match lookup(VAR_API_BASE) {
            Some(url) => normalize_base_url(&url)?,
            None => DEFAULT_BASE_URL.to_string(),
        };

        let user_storage_key = lookup(VAR_USER_KEY)
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_STORAGE_KEY.to_string());

        let page_size = lookup(VAR_PAGE_SIZE)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self {
            base_url,
            user_storage_key,
            page_size,
        })
    }

    /// 拼接完整请求地址
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

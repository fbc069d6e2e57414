use serde::{Deserialize, Serialize};
use std::fmt;

pub mod date;
pub mod format;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 成功响应的默认 code（204 或空 body 时合成）
pub const CODE_OK: &str = "OK";
/// 非 2xx 且 body 无法解析时合成的 code
pub const CODE_UNKNOWN: &str = "UNKNOWN";

/// 帖子标题的最大长度（字符数）
pub const POST_TITLE_MAX_CHARS: usize = 26;
/// 昵称的最大长度（字符数）
pub const NICKNAME_MAX_CHARS: usize = 10;
/// 密码的最小长度
pub const PASSWORD_MIN_CHARS: usize = 8;

// =========================================================
// 标识符 (Identifiers)
// =========================================================

/// 后端返回的不透明标识符
///
/// 后端可能返回数字或字符串，客户端只负责原样回传，从不解释其含义。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 本地缓存的会话用户
///
/// 记录存在即视为已登录；字段名与后端 JSON 保持一致 (camelCase)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: Id,
    pub email: String,
    pub nickname: String,
    // 旧版后端使用 profileImage 字段名
    #[serde(default, alias = "profileImage", skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default, alias = "id")]
    pub user_id: Option<Id>,
    #[serde(default)]
    pub nickname: String,
    #[serde(default, alias = "profileImage")]
    pub profile_image_url: Option<String>,
}

/// 帖子列表中的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    #[serde(alias = "id")]
    pub post_id: Id,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub author: Author,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedFile {
    #[serde(default)]
    pub file_id: Option<Id>,
    #[serde(alias = "url")]
    pub file_url: String,
}

/// 帖子详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(alias = "id")]
    pub post_id: Id,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub file: Option<AttachedFile>,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub is_mine: bool,
    #[serde(default, alias = "isLiked")]
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(alias = "id")]
    pub comment_id: Id,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub is_mine: bool,
}

// =========================================================
// 请求体 (Request Bodies)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// 创建与编辑帖子共用的请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<Id>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

// =========================================================
// 响应体 (Response Payloads)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCreated {
    #[serde(alias = "id")]
    pub post_id: Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_id: Id,
    #[serde(alias = "url")]
    pub file_url: String,
}

/// 帖子列表的两种返回形态：裸数组，或带 hasNext 的分页对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostListPayload {
    Items(Vec<PostSummary>),
    #[serde(rename_all = "camelCase")]
    Paged {
        posts: Vec<PostSummary>,
        #[serde(default)]
        has_next: Option<bool>,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeSummary {
    #[serde(default)]
    pub like_count: Option<u64>,
}

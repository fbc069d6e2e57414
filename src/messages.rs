//! 错误码 → 用户可见消息
//!
//! 已知错误码映射为固定文案，未知错误码使用调用方给出的默认文案。

use crate::error::ClientError;
use crate::validation::Field;

const NETWORK_MESSAGE: &str = "网络连接失败，请稍后重试";

/// (错误码, 消息, 关联字段)
static CODES: &[(&str, &str, Option<Field>)] = &[
    // 账号
    ("INVALID_CREDENTIALS", "邮箱或密码不正确", Some(Field::Form)),
    ("USER_NOT_FOUND", "用户不存在", Some(Field::Form)),
    ("UNAUTHORIZED", "登录已过期，请重新登录", None),
    ("FORBIDDEN", "没有操作权限", None),
    ("INVALID_EMAIL_FORMAT", "请输入正确的邮箱格式", Some(Field::Email)),
    ("EMAIL_ALREADY_EXISTS", "该邮箱已被注册", Some(Field::Email)),
    ("INVALID_PASSWORD_FORMAT", "密码至少需要 8 个字符", Some(Field::Password)),
    ("INVALID_NICKNAME_FORMAT", "昵称格式不正确", Some(Field::Nickname)),
    ("NICKNAME_ALREADY_EXISTS", "该昵称已被使用", Some(Field::Nickname)),
    // 帖子
    ("POST_NOT_FOUND", "帖子不存在或已被删除", None),
    ("INVALID_TITLE", "标题最多 26 个字符", Some(Field::Title)),
    ("TITLE_REQUIRED", "请输入标题", Some(Field::Title)),
    ("CONTENT_REQUIRED", "请输入内容", Some(Field::Content)),
    // 评论与点赞
    ("COMMENT_NOT_FOUND", "评论不存在或已被删除", None),
    ("ALREADY_LIKED", "已经点过赞了", None),
    ("LIKE_NOT_FOUND", "还没有点赞", None),
    // 文件
    ("FILE_TOO_LARGE", "文件过大", None),
    ("INVALID_FILE_TYPE", "只能上传图片文件", None),
    ("FILE_NOT_FOUND", "文件不存在", None),
    // 其他
    ("RATE_LIMIT_EXCEEDED", "请求过于频繁，请稍后再试", None),
    ("INTERNAL_SERVER_ERROR", "服务器出错了，请稍后重试", None),
];

fn lookup(code: &str) -> Option<&'static (&'static str, &'static str, Option<Field>)> {
    CODES.iter().find(|(c, _, _)| *c == code)
}

/// 错误码对应的固定消息
pub fn message_for(code: &str) -> Option<&'static str> {
    lookup(code).map(|(_, message, _)| *message)
}

/// 生成展示给用户的错误消息
pub fn describe(err: &ClientError, fallback: &str) -> String {
    match err {
        ClientError::Api(api) => api
            .code
            .as_deref()
            .and_then(message_for)
            .unwrap_or(fallback)
            .to_string(),
        ClientError::Network(_) => NETWORK_MESSAGE.to_string(),
        ClientError::Encode(_) | ClientError::Decode(_) => fallback.to_string(),
    }
}

/// 错误码应显示在哪个表单字段下
pub fn field_for(code: &str) -> Option<Field> {
    lookup(code).and_then(|(_, _, field)| *field)
}

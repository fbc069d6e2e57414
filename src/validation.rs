//! 表单校验
//!
//! 每个表单返回 `FieldErrors`，页面按字段把消息显示在对应输入框下方。

use talkboard_shared::{NICKNAME_MAX_CHARS, PASSWORD_MIN_CHARS, POST_TITLE_MAX_CHARS};

/// 表单字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    PasswordConfirm,
    Nickname,
    Title,
    Content,
    /// 不属于任何字段的表单级消息
    Form,
}

/// 按字段收集的校验消息（每个字段只保留第一条）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(Field, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push((field, message.into()));
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn check(&mut self, field: Field, result: Result<(), &'static str>) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }
}

// =========================================================
// 单字段规则
// =========================================================

pub fn email(value: &str) -> Result<(), &'static str> {
    let value = value.trim();
    if value.is_empty() {
        return Err("请输入邮箱");
    }
    if !looks_like_email(value) {
        return Err("请输入正确的邮箱格式（例如 example@example.com）");
    }
    Ok(())
}

fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

pub fn password(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        return Err("请输入密码");
    }
    if value.chars().count() < PASSWORD_MIN_CHARS {
        return Err("密码至少需要 8 个字符");
    }
    Ok(())
}

pub fn password_confirm(value: &str, confirm: &str) -> Result<(), &'static str> {
    if confirm.is_empty() {
        return Err("请再次输入密码");
    }
    if value != confirm {
        return Err("两次输入的密码不一致");
    }
    Ok(())
}

pub fn nickname(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("请输入昵称");
    }
    if value.chars().any(char::is_whitespace) {
        return Err("昵称不能包含空格");
    }
    if value.chars().count() > NICKNAME_MAX_CHARS {
        return Err("昵称最多 10 个字符");
    }
    Ok(())
}

pub fn title(value: &str) -> Result<(), &'static str> {
    let value = value.trim();
    if value.is_empty() {
        return Err("请输入标题");
    }
    if value.chars().count() > POST_TITLE_MAX_CHARS {
        return Err("标题最多 26 个字符");
    }
    Ok(())
}

pub fn content(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("请输入内容");
    }
    Ok(())
}

// =========================================================
// 表单
// =========================================================

/// 登录只检查是否填写
pub fn login_form(email_value: &str, password_value: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if email_value.trim().is_empty() || password_value.is_empty() {
        errors.push(Field::Form, "请输入邮箱和密码");
    }
    errors
}

pub fn signup_form(
    email_value: &str,
    password_value: &str,
    confirm_value: &str,
    nickname_value: &str,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(Field::Email, email(email_value));
    errors.check(Field::Password, password(password_value));
    errors.check(
        Field::PasswordConfirm,
        password_confirm(password_value, confirm_value),
    );
    errors.check(Field::Nickname, nickname(nickname_value));
    errors
}

pub fn password_form(password_value: &str, confirm_value: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(Field::Password, password(password_value));
    errors.check(
        Field::PasswordConfirm,
        password_confirm(password_value, confirm_value),
    );
    errors
}

pub fn profile_form(nickname_value: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(Field::Nickname, nickname(nickname_value));
    errors
}

pub fn post_form(title_value: &str, content_value: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(Field::Title, title(title_value));
    errors.check(Field::Content, content(content_value));
    errors
}

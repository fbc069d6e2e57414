use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

// =========================================================
// Endpoint Definitions
// =========================================================

/// Backend endpoint paths (relative to the configured base URL).
pub mod endpoints {
    use super::Display;

    pub const LOGIN: &str = "/auth/login";
    pub const SIGNUP: &str = "/auth/signup";
    pub const LOGOUT: &str = "/auth/logout";
    pub const PASSWORD: &str = "/auth/password";
    pub const ME: &str = "/users/me";
    pub const FILES: &str = "/files";
    pub const POSTS: &str = "/posts";

    /// Multipart field name for uploaded files
    pub const FILE_FIELD: &str = "file";

    pub fn posts_page(page: u32, size: u32) -> String {
        format!("{}?page={}&size={}", POSTS, page, size)
    }

    pub fn post(id: impl Display) -> String {
        format!("{}/{}", POSTS, id)
    }

    pub fn post_views(id: impl Display) -> String {
        format!("{}/{}/views", POSTS, id)
    }

    pub fn post_like(id: impl Display) -> String {
        format!("{}/{}/like", POSTS, id)
    }

    pub fn post_comments(id: impl Display) -> String {
        format!("{}/{}/comments", POSTS, id)
    }

    pub fn comment(id: impl Display) -> String {
        format!("/comments/{}", id)
    }
}

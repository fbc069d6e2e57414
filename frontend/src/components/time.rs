use chrono::FixedOffset;
use talkboard_shared::date::{Timestamp, format_created_at};

use crate::web::{local_offset_seconds, now_millis};

/// 按浏览器时区把创建时间格式化为相对时间
pub fn created_label(raw: &str) -> String {
    let offset = FixedOffset::east_opt(local_offset_seconds())
        .or_else(|| FixedOffset::east_opt(0));
    match offset {
        Some(offset) => format_created_at(raw, Timestamp::new(now_millis()), offset),
        None => raw.to_string(),
    }
}

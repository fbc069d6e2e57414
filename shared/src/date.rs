//! 时间显示模块
//!
//! - `Timestamp`: 可序列化的毫秒时间戳，作为"当前时间"在各层之间传递
//! - `relative_time`: 把帖子/评论的创建时间格式化为相对时间
//!
//! 获取当前时间依赖运行环境（浏览器中为 `Date.now()`），
//! 因此本模块只接收外部传入的 `now`，保持纯函数。

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::ops::Sub;
use std::time::Duration;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// 从 RFC 3339 字符串解析（后端的 createdAt 格式）
    ///
    /// 不带时区的 `YYYY-MM-DDTHH:MM:SS` 按 UTC 处理。
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.timestamp_millis()));
        }
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Self(naive.and_utc().timestamp_millis()))
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 计算两个时间戳之间的差值，未来时间按 0 处理
    fn sub(self, rhs: Timestamp) -> Self::Output {
        let diff_ms = (self.0 - rhs.0).max(0);
        Duration::from_millis(diff_ms as u64)
    }
}

// =========================================================
// 相对时间格式化
// =========================================================

/// 相对时间格式化
///
/// - 1 分钟内: "刚刚"
/// - 1 小时内: "N 分钟前"
/// - 24 小时内: "N 小时前"
/// - 7 天内: "N 天前"
/// - 其余: `YYYY.MM.DD`（按 `offset` 时区）
pub fn relative_time(created: Timestamp, now: Timestamp, offset: FixedOffset) -> String {
    let diff = (now - created).as_millis() as i64;

    if diff < MINUTE_MS {
        "刚刚".to_string()
    } else if diff < HOUR_MS {
        format!("{} 分钟前", diff / MINUTE_MS)
    } else if diff < DAY_MS {
        format!("{} 小时前", diff / HOUR_MS)
    } else if diff < WEEK_MS {
        format!("{} 天前", diff / DAY_MS)
    } else {
        DateTime::from_timestamp_millis(created.as_millis())
            .map(|dt| dt.with_timezone(&offset).format("%Y.%m.%d").to_string())
            .unwrap_or_default()
    }
}

/// 格式化后端返回的时间字符串；无法解析时原样返回
pub fn format_created_at(raw: &str, now: Timestamp, offset: FixedOffset) -> String {
    match Timestamp::parse(raw) {
        Some(created) => relative_time(created, now, offset),
        None => raw.to_string(),
    }
}

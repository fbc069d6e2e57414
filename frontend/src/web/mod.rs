//! 原生 Web API 封装模块
//!
//! 此模块提供对浏览器原生 API 的轻量级封装，实现引擎定义的各项能力
//! （传输、存储、位置、任务调度），以及日志输出和定时器。

mod console;
mod file;
mod http;
mod location;
pub mod router;
mod spawn;
mod storage;
mod timer;

pub use console::init_logging;
pub use file::{read_file, selected_file};
pub use http::FetchTransport;
pub use location::HashLocation;
pub use spawn::BrowserSpawner;
pub use storage::BrowserStorage;
pub use timer::Timeout;

/// 当前时间（毫秒）
pub fn now_millis() -> i64 {
    js_sys::Date::now() as i64
}

/// 浏览器本地时区相对 UTC 的偏移（秒，东为正）
pub fn local_offset_seconds() -> i32 {
    // getTimezoneOffset 以分钟为单位，西为正
    -(js_sys::Date::new_0().get_timezone_offset() as i32) * 60
}

//! 构建期配置
//!
//! 变量在编译时通过 `option_env!` 注入（例如 `TALKBOARD_API_BASE=... trunk build`）。

use talkboard::config::{VAR_API_BASE, VAR_PAGE_SIZE, VAR_USER_KEY};
use talkboard::{ClientConfig, ConfigError};
use tracing_subscriber::filter::LevelFilter;

const VAR_LOG: &str = "TALKBOARD_LOG";

fn build_var(name: &str) -> Option<String> {
    let value = match name {
        VAR_API_BASE => option_env!("TALKBOARD_API_BASE"),
        VAR_USER_KEY => option_env!("TALKBOARD_USER_KEY"),
        VAR_PAGE_SIZE => option_env!("TALKBOARD_PAGE_SIZE"),
        VAR_LOG => option_env!("TALKBOARD_LOG"),
        _ => None,
    };
    value.map(str::to_string)
}

pub fn client_config() -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_lookup(build_var)
}

/// 日志级别，默认 `info`
pub fn log_level() -> LevelFilter {
    build_var(VAR_LOG)
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO)
}

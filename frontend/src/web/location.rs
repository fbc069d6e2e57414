//! `location.hash` 封装
//!
//! 所有对 window.location 的操作都集中在此模块。

use talkboard::Location;
use wasm_bindgen::prelude::*;

fn browser_location() -> Option<web_sys::Location> {
    web_sys::window().map(|w| w.location())
}

/// 基于 URL 片段的位置实现
#[derive(Debug, Clone, Copy, Default)]
pub struct HashLocation;

impl Location for HashLocation {
    fn fragment(&self) -> String {
        browser_location()
            .and_then(|l| l.hash().ok())
            .map(|hash| hash.trim_start_matches('#').to_string())
            .unwrap_or_default()
    }

    fn set_fragment(&self, path: &str) {
        let path = path.trim_start_matches('#');
        if self.fragment() == path {
            return;
        }
        if let Some(location) = browser_location() {
            if let Err(e) = location.set_hash(path) {
                tracing::warn!(error = ?e, path, "failed to set location hash");
            }
        }
    }

    fn listen(&self, listener: Box<dyn Fn()>) {
        let closure = Closure::<dyn Fn()>::new(move || listener());

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }
}

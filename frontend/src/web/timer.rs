//! 定时器封装模块
//!
//! 使用 `web_sys` 的原生 `setTimeout`。

use wasm_bindgen::prelude::*;

/// 一次性定时器
///
/// 封装 `setTimeout` API。`Timeout` 被 drop 时若尚未触发则自动取消。
pub struct Timeout {
    handle: i32,
    #[allow(dead_code)]
    closure: Closure<dyn FnMut()>,
}

impl Timeout {
    /// 创建定时器；拿不到 window 或注册失败时返回 `None`
    pub fn new<F>(millis: u32, callback: F) -> Option<Self>
    where
        F: FnOnce() + 'static,
    {
        let mut callback = Some(callback);
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(callback) = callback.take() {
                callback();
            }
        });

        let handle = web_sys::window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis as i32,
            )
            .ok()?;

        Some(Self { handle, closure })
    }

    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(self.handle);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

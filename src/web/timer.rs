//! 定时器封装模块
//!
//! 封装 `setInterval` / `clearInterval`。`Interval` 被 drop 时自动清除，
//! 与组件的 `on_cleanup` 搭配使用可避免悬挂的回调。

use wasm_bindgen::prelude::*;

/// 周期性定时器
pub struct Interval {
    handle: i32,
    #[allow(dead_code)]
    closure: Closure<dyn Fn()>,
}

// 单线程 CSR/WASM 运行时：`on_cleanup` 要求 `Send + Sync`，而内部的
// `Closure<dyn Fn()>` 从不跨线程传递，故手动标注。
unsafe impl Send for Interval {}
unsafe impl Sync for Interval {}

impl Interval {
    /// 创建新的周期性定时器
    ///
    /// # 参数
    /// - `millis`: 间隔时间（毫秒）
    /// - `callback`: 每次间隔触发的回调函数
    ///
    /// # Panics
    /// 无法获取 window 对象或设置定时器失败时 panic（仅限浏览器环境使用）
    pub fn new<F>(millis: u32, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        let closure = Closure::new(callback);
        let window = web_sys::window().expect("无法获取 window 对象");

        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis as i32,
            )
            .expect("设置定时器失败");

        Self { handle, closure }
    }

    /// 取消定时器，drop 时自动调用
    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}

//! LocalStorage 封装模块
//!
//! 对 `web_sys::Storage` 的轻量封装。所有读写失败（隐私模式、配额、
//! 无 window 环境）都折叠为 `None`/静默失败，持久化缺失不视为错误。

/// 浏览器 LocalStorage 访问封装
pub struct LocalStorage;

impl LocalStorage {
    fn backing() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 读取指定键的字符串值，键不存在或读取失败时返回 `None`
    pub fn get(key: &str) -> Option<String> {
        Self::backing()?.get_item(key).ok()?
    }

    /// 写入键值对，返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::backing()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除指定键，返回操作是否成功
    pub fn remove(key: &str) -> bool {
        Self::backing()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

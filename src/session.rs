//! 会话状态模块
//!
//! 单一事实来源：凭证与用户画像只能由本模块写入（登录、登出、失效、
//! 画像合并），其余组件（路由守卫、请求拦截器）只读取或通过回调触发
//! 失效。每次变更完成后持久化存储与内存保持一致，启动时从持久化
//! 存储播种。

use std::rc::Rc;

use leptos::prelude::*;
use serde_json::{Map, Value};

use crate::api::{ApiClient, ApiError};
use crate::protocol::{LoginRequest, ROLE_ADMIN};
use crate::web::LocalStorage;

// 条件编译日志：测试在宿主机运行，不能触碰 JS API
#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

// =========================================================
// 持久化键
// =========================================================

pub const STORAGE_KEY_TOKEN: &str = "platform_token";
pub const STORAGE_KEY_PROFILE: &str = "platform_user_info";

// =========================================================
// 能力标签与用户画像
// =========================================================

/// 路由级别的能力标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// 管理员权限
    Admin,
}

/// 用户画像：开放的属性映射
///
/// 服务端返回什么就存什么，客户端只解读少数约定键（`role`、
/// `realName`、`username`、配额计数）。未知或缺失的 `role` 一律
/// 视为非特权用户。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    fields: Map<String, Value>,
}

impl UserProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// 从持久化的 JSON 字符串解析；只接受 JSON 对象
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => Some(Self { fields }),
            _ => None,
        }
    }

    /// 序列化为持久化用的 JSON 字符串
    pub fn to_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }

    pub fn role(&self) -> Option<&str> {
        self.fields.get("role").and_then(Value::as_str)
    }

    /// 界面展示名：优先真实姓名，其次用户名
    pub fn display_name(&self) -> Option<&str> {
        self.fields
            .get("realName")
            .and_then(Value::as_str)
            .or_else(|| self.fields.get("username").and_then(Value::as_str))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(Value::as_i64)
    }

    /// 浅合并：逐键覆盖，不递归
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.fields.insert(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// =========================================================
// 会话状态
// =========================================================

/// 凭证与画像的快照；二者只会被一起写入、一起清除
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub token: Option<String>,
    pub profile: UserProfile,
}

impl SessionState {
    /// 认证与否只取决于凭证是否存在
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_privileged(&self, capability: Capability) -> bool {
        match capability {
            Capability::Admin => self.role() == Some(ROLE_ADMIN),
        }
    }

    fn role(&self) -> Option<&str> {
        self.profile.role()
    }
}

// =========================================================
// 存储适配器
// =========================================================

/// 持久化存储的注入点
///
/// 浏览器环境用 [`BrowserStorage`]，测试用内存实现。
pub trait StorageAdapter {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// 基于 LocalStorage 的存储适配器
pub struct BrowserStorage;

impl StorageAdapter for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get(key)
    }

    fn set(&self, key: &str, value: &str) {
        LocalStorage::set(key, value);
    }

    fn remove(&self, key: &str) {
        LocalStorage::remove(key);
    }
}

// =========================================================
// 登录错误
// =========================================================

/// 登录失败：携带可展示的原因，永远作为返回值而不是异常传播
#[derive(Debug, Clone, PartialEq)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// 从拦截器错误映射：优先服务端消息，否则通用提示
    pub fn from_api(error: &ApiError) -> Self {
        Self::new(error.server_message().unwrap_or("登录失败"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

// =========================================================
// 会话存储
// =========================================================

/// 进程内唯一的会话持有者
///
/// 在应用启动时显式构造一次，经 Context 注入给需要它的组件；
/// 状态本体在 `RwSignal` 中，路由守卫通过派生信号观察。
#[derive(Clone)]
pub struct SessionStore {
    state: RwSignal<SessionState>,
    storage: Rc<dyn StorageAdapter>,
}

// 单线程 CSR/WASM 运行时：会话存储经 Context 注入，`provide_context` 要求
// `Send + Sync`。内部的 `Rc<dyn StorageAdapter>` 从不跨线程传递，故手动标注。
unsafe impl Send for SessionStore {}
unsafe impl Sync for SessionStore {}

impl SessionStore {
    /// 构造并从持久化存储播种初始状态
    pub fn new(storage: Rc<dyn StorageAdapter>) -> Self {
        let initial = Self::seed(storage.as_ref());
        Self {
            state: RwSignal::new(initial),
            storage,
        }
    }

    /// 播种规则：
    /// - 无凭证 → 未认证
    /// - 有凭证、画像缺失或非法 → 保留凭证，画像重置为默认（不中断启动）
    fn seed(storage: &dyn StorageAdapter) -> SessionState {
        let token = storage.get(STORAGE_KEY_TOKEN).filter(|t| !t.is_empty());
        let profile = match storage.get(STORAGE_KEY_PROFILE) {
            Some(raw) => UserProfile::parse(&raw).unwrap_or_else(|| {
                log_warn!("[Session] 持久化画像无法解析，已重置");
                UserProfile::default()
            }),
            None => UserProfile::default(),
        };
        SessionState { token, profile }
    }

    // ---------------------------------------------------------
    // 变更操作（唯一写入方）
    // ---------------------------------------------------------

    /// 登录：先走网络，成功后一次性写入凭证与画像并持久化。
    /// 失败时状态保持原样，以 `AuthError` 返回原因。
    pub async fn login(&self, api: &ApiClient, request: &LoginRequest) -> Result<(), AuthError> {
        match api.login(request).await {
            Ok(response) => {
                self.apply_login(response.token, UserProfile::new(response.user_info));
                Ok(())
            }
            Err(error) => Err(AuthError::from_api(&error)),
        }
    }

    /// 凭证与画像一起落库、一起写入内存；中间没有挂起点
    pub fn apply_login(&self, token: String, profile: UserProfile) {
        self.storage.set(STORAGE_KEY_TOKEN, &token);
        self.storage.set(STORAGE_KEY_PROFILE, &profile.to_json());
        self.state.set(SessionState {
            token: Some(token),
            profile,
        });
    }

    /// 登出：清空内存与持久化存储，可重复调用
    pub fn logout(&self) {
        self.storage.remove(STORAGE_KEY_TOKEN);
        self.storage.remove(STORAGE_KEY_PROFILE);
        self.state.set(SessionState::default());
    }

    /// 会话失效：服务端拒绝凭证时由拦截器触发，效果与登出一致
    pub fn invalidate(&self) {
        log_warn!("[Session] 凭证已失效，清除会话");
        self.logout();
    }

    /// 本地画像编辑：浅合并并重新持久化，不需要重新认证
    pub fn merge_profile(&self, patch: Map<String, Value>) {
        self.state.update(|state| state.profile.merge(patch));
        self.state
            .with_untracked(|state| self.storage.set(STORAGE_KEY_PROFILE, &state.profile.to_json()));
    }

    // ---------------------------------------------------------
    // 派生查询
    // ---------------------------------------------------------

    /// 当前凭证；请求拦截器的凭证提供函数每次调用都读这里
    pub fn token(&self) -> Option<String> {
        self.state.with_untracked(|state| state.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with_untracked(SessionState::is_authenticated)
    }

    pub fn is_privileged(&self, capability: Capability) -> bool {
        self.state
            .with_untracked(|state| state.is_privileged(capability))
    }

    /// 只读状态信号，供界面响应式读取
    pub fn state(&self) -> ReadSignal<SessionState> {
        self.state.read_only()
    }

    /// 认证状态信号（注入路由服务，实现解耦）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(SessionState::is_authenticated))
    }

    /// 管理员能力信号（注入路由服务）
    pub fn is_admin_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_privileged(Capability::Admin)))
    }
}

/// 从 Context 获取会话存储
pub fn use_session() -> SessionStore {
    use_context::<SessionStore>().expect("SessionStore should be provided")
}

#[cfg(test)]
mod tests;

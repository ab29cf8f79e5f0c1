//! 请求拦截器 / API 客户端模块
//!
//! 所有出站调用的唯一通道。出站阶段按需附加 Bearer 凭证；入站阶段把
//! 每个响应归类为 成功 / 业务失败 / 传输失败 / 网络不可达 / 请求配置
//! 错误，统一转成「提示一次 + 返回 Err」的失败契约。401 额外触发
//! `on_unauthorized` 回调，由宿主应用自行完成会话清除与整页跳转，
//! 拦截器本身不持有导航逻辑。

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;

use leptos::prelude::*;

use crate::protocol::{
    ApiResponse, ChatRequest, ChatResponse, CreateUserRequest, GENERIC_FAILURE, LoginRequest,
    LoginResponse, SettingsMap, StatisticsData, UpdateSettingRequest, UpdateStatusRequest,
    UserAccount,
};

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
// 失败分类
// =========================================================

/// 入站分类结果：每个失败恰好落入一类
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 传输成功，但信封标记业务失败
    Domain { message: String },
    /// 传输失败，携带 HTTP 状态码（及服务端消息，若可读出）
    Status { status: u16, message: Option<String> },
    /// 没有收到任何响应（网络不可达）
    Network(String),
    /// 请求在发出前就已非法（构造 / 序列化失败）
    Request(String),
}

impl ApiError {
    /// 统一的用户提示语；按状态码派发，未识别的状态用服务端消息兜底
    pub fn notice(&self) -> String {
        match self {
            ApiError::Domain { message } => message.clone(),
            ApiError::Status { status, message } => match status {
                401 => "登录已过期，请重新登录".to_string(),
                403 => "权限不足".to_string(),
                404 => "请求的资源不存在".to_string(),
                500 => "服务器内部错误".to_string(),
                _ => message
                    .clone()
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            },
            ApiError::Network(_) => "网络连接失败，请检查网络".to_string(),
            ApiError::Request(_) => "请求配置错误".to_string(),
        }
    }

    /// 服务端给出的原始消息（登录表单等内联展示用）
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Domain { message } => Some(message),
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Domain { message } => write!(f, "{message}"),
            ApiError::Status { status, .. } => write!(f, "HTTP {status}: {}", self.notice()),
            ApiError::Network(detail) => write!(f, "网络错误: {detail}"),
            ApiError::Request(detail) => write!(f, "请求构造失败: {detail}"),
        }
    }
}

/// 信封拆包后的成功结果，镜像服务端的 `{ data, message }`
#[derive(Debug, Clone)]
pub struct ApiSuccess<T> {
    pub data: Option<T>,
    pub message: Option<String>,
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

// =========================================================
// API 客户端
// =========================================================

/// 出站 / 入站拦截器对
///
/// 三个注入点都是显式回调，在应用启动时装配：
/// - `credential`: 凭证提供函数，**每次调用**时咨询，不保存默认头
/// - `notify`: 用户提示能力
/// - `on_unauthorized`: 401 时触发，宿主负责失效会话并整页跳转
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    credential: Rc<dyn Fn() -> Option<String>>,
    notify: Rc<dyn Fn(&str)>,
    on_unauthorized: Rc<dyn Fn()>,
}

// 单线程 CSR/WASM 运行时：拦截器经 Context 注入，`provide_context` 要求
// `Send + Sync`。内部的 `Rc<dyn Fn>` 回调从不跨线程传递，故手动标注。
unsafe impl Send for ApiClient {}
unsafe impl Sync for ApiClient {}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        credential: impl Fn() -> Option<String> + 'static,
        notify: impl Fn(&str) + 'static,
        on_unauthorized: impl Fn() + 'static,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            credential: Rc::new(credential),
            notify: Rc::new(notify),
            on_unauthorized: Rc::new(on_unauthorized),
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // ---------------------------------------------------------
    // 出站阶段
    // ---------------------------------------------------------

    /// 凭证存在则附加认证头；缺失时请求照常发出，由服务端裁决
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match (self.credential)() {
            Some(token) => builder.header("Authorization", &bearer(&token)),
            None => builder,
        }
    }

    // ---------------------------------------------------------
    // 入站阶段
    // ---------------------------------------------------------

    /// 失败的统一出口：提示一次；401 额外触发会话失效回调。
    /// 每个失败的调用恰好经过这里一次。
    fn report(&self, error: ApiError) -> ApiError {
        (self.notify)(&error.notice());
        if error.is_unauthorized() {
            log_warn!("[Api] 收到 401，触发会话失效");
            (self.on_unauthorized)();
        }
        error
    }

    /// 非 2xx 响应：按状态码归类，尽力从响应体读出服务端消息
    async fn status_failure(response: Response) -> ApiError {
        let status = response.status();
        let message = response
            .json::<ApiResponse<Value>>()
            .await
            .ok()
            .and_then(|body| body.message);
        ApiError::Status { status, message }
    }

    async fn run<T: DeserializeOwned>(
        &self,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<ApiSuccess<T>, ApiError> {
        let request = request.map_err(|e| ApiError::Request(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(Self::status_failure(response).await);
        }

        let envelope: ApiResponse<T> = response.json().await.map_err(|_| ApiError::Domain {
            message: GENERIC_FAILURE.to_string(),
        })?;

        if envelope.is_success() {
            Ok(ApiSuccess {
                data: envelope.data,
                message: envelope.message,
            })
        } else {
            Err(ApiError::Domain {
                message: envelope
                    .message
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            })
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: Result<Request, gloo_net::Error>,
    ) -> Result<ApiSuccess<T>, ApiError> {
        self.run(request).await.map_err(|error| self.report(error))
    }

    // ---------------------------------------------------------
    // 动词辅助
    // ---------------------------------------------------------

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiSuccess<T>, ApiError> {
        let request = self.authorize(Request::get(&self.url(path))).build();
        self.execute(request).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiSuccess<T>, ApiError> {
        let request = self.authorize(Request::post(&self.url(path))).json(body);
        self.execute(request).await
    }

    async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiSuccess<T>, ApiError> {
        let request = self.authorize(Request::put(&self.url(path))).json(body);
        self.execute(request).await
    }

    /// `data` 必须存在的端点共用的拆包
    fn required<T>(&self, success: ApiSuccess<T>) -> Result<T, ApiError> {
        match success.data {
            Some(data) => Ok(data),
            None => Err(self.report(ApiError::Domain {
                message: GENERIC_FAILURE.to_string(),
            })),
        }
    }

    // ---------------------------------------------------------
    // 端点
    // ---------------------------------------------------------

    /// 登录验证。失败语义与其他调用一致，调用方（会话存储）
    /// 再把错误转成可内联展示的 `AuthError`。
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let success = self.post("/auth/login", request).await?;
        self.required(success)
    }

    /// 发送一轮对话
    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let success = self.post("/chat/send", request).await?;
        self.required(success)
    }

    /// 使用统计
    pub async fn get_statistics(&self) -> Result<StatisticsData, ApiError> {
        let success = self.get("/statistics").await?;
        self.required(success)
    }

    /// 账号列表（管理员）
    pub async fn list_users(&self) -> Result<Vec<UserAccount>, ApiError> {
        let success = self.get("/users").await?;
        self.required(success)
    }

    /// 开通账号（管理员）；返回服务端的成功消息
    pub async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<Option<String>, ApiError> {
        let success: ApiSuccess<Value> = self.post("/users", request).await?;
        Ok(success.message)
    }

    /// 启用 / 停用账号（管理员）
    pub async fn update_user_status(&self, id: &str, status: &str) -> Result<(), ApiError> {
        let body = UpdateStatusRequest {
            user_status: status.to_string(),
        };
        let _: ApiSuccess<Value> = self.put(&format!("/users/{id}/status"), &body).await?;
        Ok(())
    }

    /// 系统设置映射（管理员）
    pub async fn get_settings(&self) -> Result<SettingsMap, ApiError> {
        let success = self.get("/system/settings/map").await?;
        self.required(success)
    }

    /// 更新单项系统设置（管理员）
    pub async fn update_setting(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let body = UpdateSettingRequest {
            value: value.to_string(),
        };
        let _: ApiSuccess<Value> = self.put(&format!("/system/settings/{key}"), &body).await?;
        Ok(())
    }
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().expect("ApiClient should be provided")
}

#[cfg(test)]
mod tests;

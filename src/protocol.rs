use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
pub const ROLE_USER: &str = "ROLE_USER";

/// 所有失败路径的兜底提示语
pub const GENERIC_FAILURE: &str = "请求失败";

// =========================================================
// 标准响应信封 (Response Envelope)
// =========================================================

/// The standard wrapper shape used by every server response.
///
/// The backend marks success either with `success == true` or with
/// `code == 200`; both fields may be absent on older endpoints, so they
/// are all optional here and checked through [`ApiResponse::is_success`].
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.success || self.code == Some(200)
    }
}

// =========================================================
// 认证 (Authentication)
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Success payload of `POST /auth/login`.
///
/// `user_info` is kept as a raw JSON object: the client treats the profile
/// as an open attribute map and only interprets well-known keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    // 服务端额外返回 tokenType / expiresIn；凭证被视为不透明字符串，
    // 客户端不解读有效期
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user_info: Map<String, Value>,
}

// =========================================================
// 对话 (Chat)
// =========================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub tokens_used: Option<i64>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

// =========================================================
// 使用统计 (Statistics)
// =========================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsData {
    #[serde(default)]
    pub total_conversations: Option<i64>,
    #[serde(default)]
    pub total_tokens_used: Option<i64>,
    #[serde(default)]
    pub remaining_tokens: Option<i64>,
    #[serde(default)]
    pub total_files: Option<i64>,
    #[serde(default)]
    pub monthly_conversations: Option<i64>,
    #[serde(default)]
    pub monthly_tokens_used: Option<i64>,
    #[serde(default)]
    pub today_conversations: Option<i64>,
    #[serde(default)]
    pub today_tokens_used: Option<i64>,
    #[serde(default)]
    pub trend_data: Vec<TrendPoint>,
    #[serde(default)]
    pub usage_type_stats: HashMap<String, i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: String,
    #[serde(default)]
    pub tokens_used: Option<i64>,
    #[serde(default)]
    pub conversations: Option<i64>,
}

// =========================================================
// 账号管理 (Account Management)
// =========================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub token_limit: Option<i64>,
    #[serde(default)]
    pub user_status: Option<String>,
    #[serde(default)]
    pub remaining_tokens: Option<i64>,
    #[serde(default)]
    pub used_tokens: Option<i64>,
}

impl UserAccount {
    pub fn is_active(&self) -> bool {
        self.user_status.as_deref() != Some("DISABLED")
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub user_status: String,
}

// =========================================================
// 系统设置 (System Settings)
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}

/// 设置以 key → value 的映射返回，见 `GET /system/settings/map`
pub type SettingsMap = HashMap<String, String>;

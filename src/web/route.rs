//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖 DOM 或 web_sys：定义应用的所有路由、
//! 每个路由的访问要求，以及一次路由切换的准入判定。

use std::fmt::Display;

use crate::session::Capability;

/// 权限不足时的用户提示
pub const NOTICE_FORBIDDEN: &str = "权限不足";

/// 应用路由枚举
///
/// 每个路由携带静态的访问策略：是否需要认证（默认需要）、
/// 需要的能力标签、页面标题。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面（无需认证）
    #[default]
    Login,
    /// 使用对话（默认落地页）
    Chat,
    /// 下载客户端
    Download,
    /// 使用统计
    Statistics,
    /// 账号管理（管理员）
    AccountManage,
    /// 开通账号（管理员）
    CreateAccount,
    /// 系统设置（管理员）
    SystemSettings,
    /// 页面未找到
    NotFound,
}

/// 一次路由切换的准入结果
///
/// 每条路径恰好产生一个结果，判定始终同步完成。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// 放行
    Allow,
    /// 重定向到 `target`，可附带一条用户提示
    Redirect {
        target: AppRoute,
        notice: Option<&'static str>,
    },
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/dashboard" => Self::Chat,
            "/login" => Self::Login,
            "/download" => Self::Download,
            "/statistics" => Self::Statistics,
            "/account-manage" => Self::AccountManage,
            "/create-account" => Self::CreateAccount,
            "/system-settings" => Self::SystemSettings,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Chat => "/dashboard",
            Self::Download => "/download",
            Self::Statistics => "/statistics",
            Self::AccountManage => "/account-manage",
            Self::CreateAccount => "/create-account",
            Self::SystemSettings => "/system-settings",
            Self::NotFound => "/404",
        }
    }

    /// 页面标题（路由服务会追加产品名后缀）
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "登录",
            Self::Chat => "使用对话",
            Self::Download => "下载客户端",
            Self::Statistics => "使用统计",
            Self::AccountManage => "账号管理",
            Self::CreateAccount => "开通账号",
            Self::SystemSettings => "系统设置",
            Self::NotFound => "页面未找到",
        }
    }

    /// 该路由是否需要认证（登录页与 404 之外默认需要）
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::NotFound)
    }

    /// 该路由额外要求的能力标签
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            Self::AccountManage | Self::CreateAccount | Self::SystemSettings => {
                Some(Capability::Admin)
            }
            _ => None,
        }
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 默认的已认证落地页
    pub fn landing() -> Self {
        Self::Chat
    }

    /// **核心守卫逻辑：一次路由切换的准入判定**
    ///
    /// 判定顺序是约定的一部分：
    /// 1. 需要认证且未认证 → 重定向登录页（能力检查不会对未认证用户执行）
    /// 2. 要求能力且不具备 → 提示并重定向默认落地页
    /// 3. 已认证访问登录页 → 重定向默认落地页
    /// 4. 放行
    ///
    /// 页面标题属于路由服务的副作用，不参与判定。
    pub fn admit(
        &self,
        is_authenticated: bool,
        is_privileged: impl Fn(Capability) -> bool,
    ) -> Admission {
        if self.requires_auth() && !is_authenticated {
            return Admission::Redirect {
                target: Self::auth_failure_redirect(),
                notice: None,
            };
        }

        if let Some(capability) = self.required_capability() {
            if !is_privileged(capability) {
                return Admission::Redirect {
                    target: Self::landing(),
                    notice: Some(NOTICE_FORBIDDEN),
                };
            }
        }

        if matches!(self, Self::Login) && is_authenticated {
            return Admission::Redirect {
                target: Self::landing(),
                notice: None,
            };
        }

        Admission::Allow
    }

    /// 侧边栏菜单项（按展示顺序）
    pub fn menu() -> &'static [AppRoute] {
        &[
            Self::Chat,
            Self::Download,
            Self::Statistics,
            Self::AccountManage,
            Self::CreateAccount,
            Self::SystemSettings,
        ]
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests;

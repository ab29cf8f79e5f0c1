//! AI Platform 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话状态（单一事实来源）
//! - `api`: 请求拦截器 / API 客户端
//! - `web::route` / `web::router`: 路由定义与守卫引擎
//! - `notify`: 用户提示能力
//! - `components`: UI 组件层
//!
//! 三个核心件在 `App` 中显式构造并注入：守卫只读会话信号；拦截器
//! 通过凭证提供函数读取凭证，通过 `on_unauthorized` 回调触发会话
//! 失效与整页跳转——组件之间不共享可变默认状态。

pub mod api;
pub mod notify;
pub mod protocol;
pub mod session;

mod components {
    pub mod account_manage;
    pub mod chat;
    pub mod create_account;
    pub mod download;
    mod icons;
    pub mod layout;
    pub mod login;
    pub mod statistics;
    pub mod system_settings;
}

// 原生 Web API 封装模块
pub(crate) mod web {
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use storage::LocalStorage;
    pub use timer::Interval;
}

use std::rc::Rc;

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::components::account_manage::AccountManagePage;
use crate::components::chat::ChatPage;
use crate::components::create_account::CreateAccountPage;
use crate::components::download::DownloadPage;
use crate::components::layout::Shell;
use crate::components::login::LoginPage;
use crate::components::statistics::StatisticsPage;
use crate::components::system_settings::SystemSettingsPage;
use crate::notify::{Notifier, Toaster};
use crate::session::{BrowserStorage, SessionStore};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet, force_full_redirect};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件；已认证页面套用 `Shell` 外壳。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Chat => view! { <Shell><ChatPage /></Shell> }.into_any(),
        AppRoute::Download => view! { <Shell><DownloadPage /></Shell> }.into_any(),
        AppRoute::Statistics => view! { <Shell><StatisticsPage /></Shell> }.into_any(),
        AppRoute::AccountManage => view! { <Shell><AccountManagePage /></Shell> }.into_any(),
        AppRoute::CreateAccount => view! { <Shell><CreateAccountPage /></Shell> }.into_any(),
        AppRoute::SystemSettings => view! { <Shell><SystemSettingsPage /></Shell> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 提示能力
    let notifier = Notifier::new();
    provide_context(notifier);

    // 2. 会话存储：显式构造一次，从持久化存储播种
    let session = SessionStore::new(Rc::new(BrowserStorage));
    provide_context(session.clone());

    // 3. 请求拦截器：凭证提供函数 + 提示回调 + 会话失效回调。
    //    401 时由这里（宿主）决定如何反应：失效会话并整页跳回登录，
    //    丢弃所有内存中的应用状态。失效是幂等的，并发失败的调用
    //    不会造成重定向风暴。
    let api = {
        let credential_source = session.clone();
        let invalidated_session = session.clone();
        ApiClient::new(
            "/api",
            move || credential_source.token(),
            move |message| notifier.error(message),
            move || {
                invalidated_session.invalidate();
                force_full_redirect(AppRoute::Login);
            },
        )
    };
    provide_context(api);

    // 4. 守卫所需的只读信号
    let is_authenticated = session.is_authenticated_signal();
    let is_admin = session.is_admin_signal();

    view! {
        <Router is_authenticated=is_authenticated is_admin=is_admin>
            <Toaster />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}

//! 路由服务模块 - 守卫引擎
//!
//! 封装 History API，实现「请求 -> 准入判定 -> 处理 -> 加载」的导航
//! 流程。每次切换只依赖已就绪的内存状态，守卫本身不发起网络请求，
//! 始终同步得出唯一结论。认证与权限状态通过注入的信号读取，与会话
//! 模块解耦。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{Admission, AppRoute};
use crate::notify::{Notifier, use_notifier};
use crate::session::Capability;

/// 文档标题后缀（产品名）
const TITLE_SUFFIX: &str = "AI Platform";

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向，不留下被拦截的入口）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 设置文档标题；无论准入结论如何都会先为目标路由执行一次
fn apply_document_title(route: AppRoute) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(&format!("{} - {}", route.title(), TITLE_SUFFIX));
    }
}

/// 整页跳转（丢弃所有内存中的应用状态）
///
/// 401 强制下线走这里而不是软导航：并发失败的调用各自触发时，
/// 重复 replace 到同一地址是无害的。
pub fn force_full_redirect(route: AppRoute) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().replace(route.path());
    }
}

// ============================================================================
// 路由服务
// ============================================================================

/// 路由器服务
///
/// 所有对 window.history 的操作集中于此。认证 / 权限信号与提示能力
/// 在构造时注入。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态（注入）
    is_authenticated: Signal<bool>,
    /// 管理员能力（注入）
    is_admin: Signal<bool>,
    /// 用户提示能力（注入）
    notifier: Notifier,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>, is_admin: Signal<bool>, notifier: Notifier) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
            is_admin,
            notifier,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**（菜单点击、登录成功后的跳转）
    pub fn navigate_route(&self, route: AppRoute) {
        self.apply(route, true);
    }

    /// 用当前状态对目标路由做准入判定
    fn admission(&self, target: AppRoute) -> Admission {
        let authenticated = self.is_authenticated.get_untracked();
        let admin = self.is_admin.get_untracked();
        target.admit(authenticated, |capability| match capability {
            Capability::Admin => admin,
        })
    }

    /// 流程：标题副作用 -> 准入判定 -> 放行或重定向
    fn apply(&self, target: AppRoute, use_push: bool) {
        apply_document_title(target);

        match self.admission(target) {
            Admission::Allow => self.load(target, use_push),
            Admission::Redirect {
                target: redirect,
                notice,
            } => {
                web_sys::console::log_1(
                    &format!("[Router] {target} 被拦截，重定向到 {redirect}").into(),
                );
                if let Some(message) = notice {
                    self.notifier.error(message);
                }
                // 重定向一律 replace，不把被拦截的入口留在历史栈里
                self.load(redirect, false);
            }
        }
    }

    /// 验证通过后的加载：写历史栈并更新界面
    fn load(&self, route: AppRoute, use_push: bool) {
        if use_push {
            push_history_state(route.path());
        } else {
            replace_history_state(route.path());
        }
        apply_document_title(route);
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听；popstate 同样过守卫
    fn init_popstate_listener(&self) {
        let service = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            service.apply(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话状态变化时重新审视当前路由
    ///
    /// 登录后停留在登录页、登出后停留在受保护页、权限被回收后停留在
    /// 管理页，都会在这里被纠正。首次执行同时覆盖了启动时的初始路由。
    fn setup_session_watch(&self) {
        let service = *self;
        let is_authenticated = self.is_authenticated;
        let is_admin = self.is_admin;

        Effect::new(move |_| {
            // 订阅两个注入信号；路由本身不触发重新审视
            let _ = is_authenticated.get();
            let _ = is_admin.get();
            let route = service.current_route.get_untracked();

            if let Admission::Redirect { target, notice } = service.admission(route) {
                web_sys::console::log_1(
                    &format!("[Router] 会话变化，{route} 不再可达，转向 {target}").into(),
                );
                if let Some(message) = notice {
                    service.notifier.error(message);
                }
                service.load(target, true);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(
    is_authenticated: Signal<bool>,
    is_admin: Signal<bool>,
    notifier: Notifier,
) -> RouterService {
    let router = RouterService::new(is_authenticated, is_admin, notifier);

    router.init_popstate_listener();
    router.setup_session_watch();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 管理员能力信号
    is_admin: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    let notifier = use_notifier();
    let router = provide_router(is_authenticated, is_admin, notifier);

    // 初始路由同样要过守卫（刷新页面直接落在受保护地址的情况）
    router.apply(AppRoute::from_path(&current_path()), false);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

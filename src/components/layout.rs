use leptos::prelude::*;

use crate::components::icons::*;
use crate::session::{Capability, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 菜单项图标
fn menu_icon(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Chat => view! { <MessageSquare attr:class="h-5 w-5" /> }.into_any(),
        AppRoute::Download => view! { <Download attr:class="h-5 w-5" /> }.into_any(),
        AppRoute::Statistics => view! { <BarChart attr:class="h-5 w-5" /> }.into_any(),
        AppRoute::AccountManage => view! { <Users attr:class="h-5 w-5" /> }.into_any(),
        AppRoute::CreateAccount => view! { <UserPlus attr:class="h-5 w-5" /> }.into_any(),
        AppRoute::SystemSettings => view! { <Settings attr:class="h-5 w-5" /> }.into_any(),
        _ => view! { <span /> }.into_any(),
    }
}

/// 已认证页面的外壳：顶栏 + 侧边菜单
///
/// 菜单按会话能力过滤，管理员条目对普通用户不渲染；
/// 真正的拦截仍由路由守卫兜底。
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let state = session.state();

    let display_name = move || {
        state.with(|s| {
            s.profile
                .display_name()
                .map(str::to_string)
                .unwrap_or_else(|| "未登录".to_string())
        })
    };

    let visible_menu = move || {
        state.with(|s| {
            AppRoute::menu()
                .iter()
                .copied()
                .filter(|route| {
                    route
                        .required_capability()
                        .is_none_or(|capability| s.is_privileged(capability))
                })
                .collect::<Vec<_>>()
        })
    };

    let is_admin = move || state.with(|s| s.is_privileged(Capability::Admin));

    let on_logout = {
        let session = session.clone();
        move |_| {
            session.logout();
            router.navigate_route(AppRoute::Login);
        }
    };

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow-sm px-4">
                <div class="flex-1 gap-2">
                    <MessageSquare attr:class="h-6 w-6 text-primary" />
                    <span class="text-xl font-bold">"AI Platform"</span>
                </div>
                <div class="flex-none gap-3">
                    <span class="text-sm text-base-content/70">
                        {display_name}
                        <Show when=is_admin>
                            <span class="badge badge-primary badge-sm ml-2">"管理员"</span>
                        </Show>
                    </span>
                    <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "退出登录"
                    </button>
                </div>
            </div>

            <div class="flex">
                <aside class="w-52 min-h-[calc(100vh-4rem)] bg-base-100 border-r border-base-300">
                    <ul class="menu p-2 gap-1">
                        <For
                            each=visible_menu
                            key=|route| route.path()
                            children=move |route| {
                                let active = move || router.current_route().get() == route;
                                view! {
                                    <li>
                                        <a
                                            class=move || if active() { "active" } else { "" }
                                            on:click=move |_| router.navigate_route(route)
                                        >
                                            {menu_icon(route)}
                                            {route.title()}
                                        </a>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </aside>

                <main class="flex-1 p-6">{children()}</main>
            </div>
        </div>
    }
}

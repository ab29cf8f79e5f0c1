use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::icons::RefreshCw;
use crate::notify::use_notifier;
use crate::protocol::UserAccount;

/// 账号管理页（管理员）
#[component]
pub fn AccountManagePage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let (users, set_users) = signal(Vec::<UserAccount>::new());
    let (loading, set_loading) = signal(true);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                if let Ok(list) = api.list_users().await {
                    set_users.set(list);
                }
                set_loading.set(false);
            });
        }
    };

    Effect::new({
        let load = load.clone();
        move |_| load()
    });

    let toggle_status = {
        let api = api.clone();
        let load = load.clone();
        move |user: UserAccount| {
            let api = api.clone();
            let load = load.clone();
            let target = if user.is_active() { "DISABLED" } else { "ACTIVE" };
            spawn_local(async move {
                if api.update_user_status(&user.id, target).await.is_ok() {
                    notifier.success("账号状态已更新");
                    load();
                }
            });
        }
    };

    view! {
        <div class="max-w-5xl mx-auto space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h2 class="text-2xl font-bold">"账号管理"</h2>
                    <p class="text-base-content/70 text-sm">"查看与管理平台账号。"</p>
                </div>
                <button
                    class="btn btn-ghost btn-circle"
                    disabled=move || loading.get()
                    on:click=move |_| load()
                >
                    <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                </button>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"用户名"</th>
                                    <th>"姓名"</th>
                                    <th class="hidden md:table-cell">"邮箱"</th>
                                    <th>"角色"</th>
                                    <th class="hidden md:table-cell">"额度"</th>
                                    <th class="hidden md:table-cell">"已用 / 剩余"</th>
                                    <th>"状态"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || users.get().is_empty() && !loading.get()>
                                    <tr>
                                        <td colspan="8" class="text-center py-8 text-base-content/50">
                                            "暂无账号"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || users.get()
                                    key=|user| user.id.clone()
                                    children={
                                        let toggle_status = toggle_status.clone();
                                        move |user| {
                                            let toggle_status = toggle_status.clone();
                                            let row = user.clone();
                                            let active = user.is_active();
                                            let role_badge = if user.role.as_deref()
                                                == Some(crate::protocol::ROLE_ADMIN)
                                            {
                                                "badge badge-primary badge-outline"
                                            } else {
                                                "badge badge-ghost"
                                            };
                                            view! {
                                                <tr>
                                                    <td class="font-mono text-sm font-bold">{user.username.clone()}</td>
                                                    <td>{user.real_name.clone().unwrap_or_default()}</td>
                                                    <td class="hidden md:table-cell text-sm opacity-70">
                                                        {user.email.clone().unwrap_or_default()}
                                                    </td>
                                                    <td>
                                                        <span class=role_badge>
                                                            {user.role.clone().unwrap_or_else(|| "-".to_string())}
                                                        </span>
                                                    </td>
                                                    <td class="hidden md:table-cell">
                                                        {user.token_limit.map_or("-".to_string(), |v| v.to_string())}
                                                    </td>
                                                    <td class="hidden md:table-cell font-mono text-xs opacity-70">
                                                        {format!(
                                                            "{} / {}",
                                                            user.used_tokens.unwrap_or(0),
                                                            user.remaining_tokens.unwrap_or(0),
                                                        )}
                                                    </td>
                                                    <td>
                                                        {if active {
                                                            view! { <span class="badge badge-success badge-outline">"启用"</span> }.into_any()
                                                        } else {
                                                            view! { <span class="badge badge-error badge-outline">"停用"</span> }.into_any()
                                                        }}
                                                    </td>
                                                    <td>
                                                        <button
                                                            class="btn btn-ghost btn-xs"
                                                            on:click=move |_| toggle_status(row.clone())
                                                        >
                                                            {if active { "停用" } else { "启用" }}
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </div>
    }
}

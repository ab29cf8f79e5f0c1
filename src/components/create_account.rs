use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::notify::use_notifier;
use crate::protocol::{CreateUserRequest, ROLE_ADMIN, ROLE_USER};

/// 开通账号页（管理员）
#[component]
pub fn CreateAccountPage() -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (real_name, set_real_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (role, set_role) = signal(ROLE_USER.to_string());
    let (token_limit, set_token_limit) = signal("5000".to_string());
    let (is_submitting, set_is_submitting) = signal(false);

    let reset_form = move || {
        set_username.set(String::new());
        set_password.set(String::new());
        set_real_name.set(String::new());
        set_email.set(String::new());
        set_role.set(ROLE_USER.to_string());
        set_token_limit.set("5000".to_string());
    };

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if username.get_untracked().is_empty() || password.get_untracked().is_empty() {
                notifier.error("请填写用户名和密码");
                return;
            }

            set_is_submitting.set(true);
            let api = api.clone();
            spawn_local(async move {
                let optional = |value: String| (!value.is_empty()).then_some(value);
                let request = CreateUserRequest {
                    username: username.get_untracked(),
                    password: password.get_untracked(),
                    real_name: optional(real_name.get_untracked()),
                    email: optional(email.get_untracked()),
                    role: role.get_untracked(),
                    token_limit: token_limit.get_untracked().parse::<i64>().ok(),
                };
                if let Ok(message) = api.create_user(&request).await {
                    notifier.success(message.unwrap_or_else(|| "账号开通成功".to_string()));
                    reset_form();
                }
                set_is_submitting.set(false);
            });
        }
    };

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <h2 class="text-2xl font-bold">"开通账号"</h2>

            <div class="card bg-base-100 shadow-xl">
                <form class="card-body space-y-2" on:submit=on_submit>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label"><span class="label-text">"用户名"</span></label>
                            <input
                                type="text"
                                class="input input-bordered"
                                prop:value=username
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"初始密码"</span></label>
                            <input
                                type="password"
                                class="input input-bordered"
                                prop:value=password
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"姓名"</span></label>
                            <input
                                type="text"
                                class="input input-bordered"
                                prop:value=real_name
                                on:input=move |ev| set_real_name.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"邮箱"</span></label>
                            <input
                                type="email"
                                class="input input-bordered"
                                prop:value=email
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"角色"</span></label>
                            <select
                                class="select select-bordered"
                                prop:value=role
                                on:change=move |ev| set_role.set(event_target_value(&ev))
                            >
                                <option value=ROLE_USER>"普通用户"</option>
                                <option value=ROLE_ADMIN>"管理员"</option>
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label"><span class="label-text">"Token 额度"</span></label>
                            <input
                                type="number"
                                class="input input-bordered"
                                prop:value=token_limit
                                on:input=move |ev| set_token_limit.set(event_target_value(&ev))
                            />
                        </div>
                    </div>

                    <div class="form-control mt-4">
                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            {move || if is_submitting.get() { "开通中..." } else { "开通账号" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

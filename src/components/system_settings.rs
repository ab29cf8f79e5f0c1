use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::icons::RefreshCw;
use crate::notify::use_notifier;

/// 系统设置页（管理员）
///
/// 设置以 key → value 映射呈现，逐项编辑保存。
#[component]
pub fn SystemSettingsPage() -> impl IntoView {
    let api = use_api();

    let (settings, set_settings) = signal(Vec::<(String, String)>::new());
    let (loading, set_loading) = signal(true);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                if let Ok(map) = api.get_settings().await {
                    let mut entries: Vec<_> = map.into_iter().collect();
                    entries.sort_by(|a, b| a.0.cmp(&b.0));
                    set_settings.set(entries);
                }
                set_loading.set(false);
            });
        }
    };

    Effect::new({
        let load = load.clone();
        move |_| load()
    });

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h2 class="text-2xl font-bold">"系统设置"</h2>
                    <p class="text-base-content/70 text-sm">"修改后逐项保存，立即生效。"</p>
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
                <div class="card-body space-y-2">
                    <Show when=move || settings.get().is_empty() && !loading.get()>
                        <p class="text-center py-8 text-base-content/50">"暂无可配置项"</p>
                    </Show>
                    <For
                        each=move || settings.get()
                        key=|(key, _)| key.clone()
                        children=move |(name, value)| {
                            view! { <SettingRow name=name value=value /> }
                        }
                    />
                </div>
            </div>
        </div>
    }
}

/// 单项设置的编辑行
#[component]
fn SettingRow(name: String, value: String) -> impl IntoView {
    let api = use_api();
    let notifier = use_notifier();

    let setting_key = name.clone();
    let (draft, set_draft) = signal(value);
    let (is_saving, set_is_saving) = signal(false);

    let on_save = {
        let api = api.clone();
        let setting_key = setting_key.clone();
        move |_| {
            set_is_saving.set(true);
            let api = api.clone();
            let setting_key = setting_key.clone();
            spawn_local(async move {
                if api
                    .update_setting(&setting_key, &draft.get_untracked())
                    .await
                    .is_ok()
                {
                    notifier.success("设置已保存");
                }
                set_is_saving.set(false);
            });
        }
    };

    view! {
        <div class="flex items-center gap-3">
            <span class="w-56 font-mono text-sm shrink-0">{name}</span>
            <input
                type="text"
                class="input input-bordered input-sm flex-1"
                prop:value=draft
                on:input=move |ev| set_draft.set(event_target_value(&ev))
            />
            <button
                class="btn btn-primary btn-sm"
                disabled=move || is_saving.get()
                on:click=on_save
            >
                {move || if is_saving.get() { "保存中..." } else { "保存" }}
            </button>
        </div>
    }
}

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::use_api;
use crate::components::icons::RefreshCw;
use crate::protocol::StatisticsData;
use crate::web::Interval;

/// 自动刷新间隔（毫秒）
const REFRESH_MILLIS: u32 = 60_000;

fn count(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// 使用统计页
///
/// 进入时加载一次，之后每分钟自动刷新；组件卸载时定时器随之清除。
#[component]
pub fn StatisticsPage() -> impl IntoView {
    let api = use_api();

    let (stats, set_stats) = signal(Option::<StatisticsData>::None);
    let (loading, set_loading) = signal(true);

    let load = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                if let Ok(data) = api.get_statistics().await {
                    set_stats.set(Some(data));
                }
                set_loading.set(false);
            });
        }
    };

    // 初始加载
    Effect::new({
        let load = load.clone();
        move |_| load()
    });

    // 周期刷新
    let refresh = Interval::new(REFRESH_MILLIS, {
        let load = load.clone();
        move || load()
    });
    on_cleanup(move || drop(refresh));

    view! {
        <div class="max-w-5xl mx-auto space-y-6">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"使用统计"</h2>
                <button
                    class="btn btn-ghost btn-circle"
                    disabled=move || loading.get()
                    on:click=move |_| load()
                >
                    <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                </button>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"总对话数"</div>
                    <div class="stat-value text-primary">
                        {move || count(stats.get().and_then(|s| s.total_conversations))}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-title">"总消耗 Token"</div>
                    <div class="stat-value">
                        {move || count(stats.get().and_then(|s| s.total_tokens_used))}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-title">"剩余额度"</div>
                    <div class="stat-value text-success">
                        {move || count(stats.get().and_then(|s| s.remaining_tokens))}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-title">"文件总数"</div>
                    <div class="stat-value text-secondary">
                        {move || count(stats.get().and_then(|s| s.total_files))}
                    </div>
                </div>
            </div>

            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"本月对话"</div>
                    <div class="stat-value text-2xl">
                        {move || count(stats.get().and_then(|s| s.monthly_conversations))}
                    </div>
                    <div class="stat-desc">
                        "消耗 " {move || count(stats.get().and_then(|s| s.monthly_tokens_used))}
                    </div>
                </div>
                <div class="stat">
                    <div class="stat-title">"今日对话"</div>
                    <div class="stat-value text-2xl">
                        {move || count(stats.get().and_then(|s| s.today_conversations))}
                    </div>
                    <div class="stat-desc">
                        "消耗 " {move || count(stats.get().and_then(|s| s.today_tokens_used))}
                    </div>
                </div>
            </div>

            <Show when=move || stats.get().is_some_and(|s| !s.usage_type_stats.is_empty())>
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">"用量构成"</h3>
                        <div class="flex flex-wrap gap-2">
                            <For
                                each=move || {
                                    let mut entries: Vec<_> = stats
                                        .get()
                                        .map(|s| s.usage_type_stats.into_iter().collect())
                                        .unwrap_or_default();
                                    entries.sort_by(|a: &(String, i64), b| a.0.cmp(&b.0));
                                    entries
                                }
                                key=|(kind, _)| kind.clone()
                                children=move |(kind, amount)| {
                                    view! {
                                        <span class="badge badge-outline gap-1">
                                            {kind} ": " {amount}
                                        </span>
                                    }
                                }
                            />
                        </div>
                    </div>
                </div>
            </Show>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="p-6 pb-2">
                        <h3 class="card-title">"近期趋势"</h3>
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"日期"</th>
                                    <th>"对话数"</th>
                                    <th>"消耗 Token"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || stats.get().is_none_or(|s| s.trend_data.is_empty())>
                                    <tr>
                                        <td colspan="3" class="text-center py-8 text-base-content/50">
                                            "暂无数据"
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || stats.get().map(|s| s.trend_data).unwrap_or_default()
                                    key=|point| point.date.clone()
                                    children=move |point| {
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm">{point.date.clone()}</td>
                                                <td>{count(point.conversations)}</td>
                                                <td>{count(point.tokens_used)}</td>
                                            </tr>
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

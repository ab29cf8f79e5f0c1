use leptos::prelude::*;

use crate::components::icons::Download;

/// 客户端平台与下载地址
const PLATFORMS: &[(&str, &str, &str)] = &[
    ("Windows", "适用于 Windows 10 及以上", "/api/download/client/windows"),
    ("macOS", "适用于 macOS 12 及以上", "/api/download/client/macos"),
    ("Linux", "适用于主流发行版", "/api/download/client/linux"),
];

/// 下载客户端页
#[component]
pub fn DownloadPage() -> impl IntoView {
    view! {
        <div class="max-w-4xl mx-auto space-y-6">
            <h2 class="text-2xl font-bold">"下载客户端"</h2>
            <p class="text-base-content/70">
                "桌面客户端与网页端使用同一账号，登录后自动同步对话记录。"
            </p>

            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                {PLATFORMS
                    .iter()
                    .map(|(name, description, href)| {
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body items-center text-center">
                                    <Download attr:class="h-8 w-8 text-primary" />
                                    <h3 class="card-title">{*name}</h3>
                                    <p class="text-sm text-base-content/70">{*description}</p>
                                    <div class="card-actions mt-2">
                                        <a class="btn btn-primary btn-sm" href=*href>
                                            "下载"
                                        </a>
                                    </div>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

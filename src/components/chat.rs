use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::{Map, Value, json};

use crate::api::use_api;
use crate::components::icons::PaperPlane;
use crate::protocol::{ChatRequest, ChatResponse};
use crate::session::use_session;

/// 对话中的一条消息
#[derive(Clone, PartialEq)]
struct ChatEntry {
    id: u64,
    from_user: bool,
    content: String,
}

/// 根据一轮应答的 token 消耗更新本地画像计数
///
/// 只做本地浅合并，不重新认证；服务端是计数的权威来源，
/// 下次登录会覆盖这里的值。
fn usage_patch(reply: &ChatResponse, used_before: i64, remaining_before: i64) -> Option<Map<String, Value>> {
    let used = reply.tokens_used?;
    let mut patch = Map::new();
    patch.insert("usedTokens".to_string(), json!(used_before + used));
    patch.insert(
        "remainingTokens".to_string(),
        json!((remaining_before - used).max(0)),
    );
    Some(patch)
}

/// 使用对话页
#[component]
pub fn ChatPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let state = session.state();

    let (entries, set_entries) = signal(Vec::<ChatEntry>::new());
    let (draft, set_draft) = signal(String::new());
    let (next_id, set_next_id) = signal(0u64);
    let (conversation_id, set_conversation_id) = signal(Option::<String>::None);
    let (is_sending, set_is_sending) = signal(false);

    let push_entry = move |from_user: bool, content: String| {
        let id = next_id.get_untracked();
        set_next_id.set(id + 1);
        set_entries.update(|list| {
            list.push(ChatEntry {
                id,
                from_user,
                content,
            })
        });
    };

    let on_send = {
        let api = api.clone();
        let session = session.clone();
        move |_| {
            let message = draft.get_untracked().trim().to_string();
            if message.is_empty() || is_sending.get_untracked() {
                return;
            }
            set_draft.set(String::new());
            set_is_sending.set(true);
            push_entry(true, message.clone());

            let api = api.clone();
            let session = session.clone();
            spawn_local(async move {
                let request = ChatRequest {
                    message,
                    conversation_id: conversation_id.get_untracked(),
                };
                match api.send_message(&request).await {
                    Ok(reply) => {
                        if reply.conversation_id.is_some() {
                            set_conversation_id.set(reply.conversation_id.clone());
                        }
                        let content = if reply.success {
                            reply
                                .response
                                .clone()
                                .unwrap_or_else(|| "（空回复）".to_string())
                        } else {
                            reply
                                .error
                                .clone()
                                .unwrap_or_else(|| "对话失败".to_string())
                        };
                        push_entry(false, content);

                        let profile = session.state().with_untracked(|s| s.profile.clone());
                        let used_before = profile.get_i64("usedTokens").unwrap_or(0);
                        let remaining_before = profile.get_i64("remainingTokens").unwrap_or(0);
                        if let Some(patch) = usage_patch(&reply, used_before, remaining_before) {
                            session.merge_profile(patch);
                        }
                    }
                    Err(_) => {
                        // 拦截器已提示；这里只恢复输入状态
                    }
                }
                set_is_sending.set(false);
            });
        }
    };

    let remaining = move || state.with(|s| s.profile.get_i64("remainingTokens"));

    view! {
        <div class="max-w-3xl mx-auto space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"使用对话"</h2>
                <Show when=move || remaining().is_some()>
                    <span class="badge badge-ghost">
                        "剩余额度 " {move || remaining().unwrap_or(0)}
                    </span>
                </Show>
            </div>

            <div class="card bg-base-100 shadow-xl min-h-[50vh]">
                <div class="card-body space-y-3">
                    <Show when=move || entries.get().is_empty()>
                        <p class="text-center text-base-content/50 py-16">
                            "输入内容开始对话"
                        </p>
                    </Show>
                    <For
                        each=move || entries.get()
                        key=|entry| entry.id
                        children=move |entry| {
                            let class = if entry.from_user {
                                "chat chat-end"
                            } else {
                                "chat chat-start"
                            };
                            view! {
                                <div class=class>
                                    <div class="chat-bubble whitespace-pre-wrap">{entry.content}</div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>

            <div class="join w-full">
                <textarea
                    class="textarea textarea-bordered join-item w-full"
                    rows="2"
                    placeholder="输入消息…"
                    prop:value=draft
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                ></textarea>
                <button
                    class="btn btn-primary join-item h-auto"
                    disabled=move || is_sending.get()
                    on:click=on_send
                >
                    <PaperPlane attr:class="h-5 w-5" />
                    {move || if is_sending.get() { "发送中…" } else { "发送" }}
                </button>
            </div>
        </div>
    }
}

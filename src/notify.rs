//! 消息提示模块
//!
//! 把「notify(message)」做成一个可注入的能力：`Notifier` 挂在 Context
//! 上，拦截器与路由守卫通过它提示用户，`Toaster` 组件负责渲染。

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// 提示能力句柄
///
/// 基于信号，Copy 语义，可以自由捕获进回调闭包。
#[derive(Clone, Copy)]
pub struct Notifier {
    toasts: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.toasts.update(|list| list.push(Toast { id, kind, message }));
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }

    fn toasts(&self) -> RwSignal<Vec<Toast>> {
        self.toasts
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取提示能力
pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 提示框渲染组件，应在 App 根部挂载一次
#[component]
pub fn Toaster() -> impl IntoView {
    let notifier = use_notifier();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || notifier.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    view! { <ToastItem toast=toast /> }
                }
            />
        </div>
    }
}

/// 单条提示，挂载 3 秒后自动消失
#[component]
fn ToastItem(toast: Toast) -> impl IntoView {
    let notifier = use_notifier();
    let id = toast.id;

    Effect::new(move |_| {
        set_timeout(
            move || notifier.dismiss(id),
            std::time::Duration::from_secs(3),
        );
    });

    let class = match toast.kind {
        ToastKind::Error => "alert alert-error shadow-lg",
        ToastKind::Success => "alert alert-success shadow-lg",
    };

    view! {
        <div class=class>
            <span>{toast.message}</span>
        </div>
    }
}

use leptos::prelude::*;

use crate::context::{ToastKind, use_app};

/// 全局提示框
#[component]
pub fn ToastHost() -> impl IntoView {
    let app = use_app();

    view! {
        <Show when=move || app.toast.with(Option::is_some)>
            <div class="toast toast-top toast-center z-50" on:click=move |_| app.dismiss_toast()>
                <div class=move || {
                    match app.toast.with(|t| t.as_ref().map(|t| t.kind)) {
                        Some(ToastKind::Error) => "alert alert-error shadow-lg",
                        Some(ToastKind::Success) => "alert alert-success shadow-lg",
                        _ => "alert alert-info shadow-lg",
                    }
                }>
                    <span>
                        {move || app.toast.with(|t| t.as_ref().map(|t| t.message.clone()).unwrap_or_default())}
                    </span>
                </div>
            </div>
        </Show>
    }
}

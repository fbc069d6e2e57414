use leptos::prelude::*;

/// 确认对话框
#[component]
pub fn ConfirmModal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    on_confirm: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    view! {
        <div class=move || if open.get() { "modal modal-open" } else { "modal" }>
            <div class="modal-box">
                <h3 class="font-bold text-lg">{title}</h3>
                <p class="py-4 text-base-content/70">{message}</p>
                <div class="modal-action">
                    <button class="btn" on:click=move |_| on_cancel.run(())>"取消"</button>
                    <button class="btn btn-error" on:click=move |_| on_confirm.run(())>"确认"</button>
                </div>
            </div>
            <div class="modal-backdrop" on:click=move |_| on_cancel.run(())></div>
        </div>
    }
}

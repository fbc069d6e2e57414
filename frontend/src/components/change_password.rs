use leptos::prelude::*;
use leptos::task::spawn_local;
use talkboard::route::paths;
use talkboard::validation::{self, Field, FieldErrors};
use talkboard::{PageContext, RenderError};

use crate::components::form::{FieldHint, FormAlert, errors_from};
use crate::components::header::Header;
use crate::context::{ToastKind, use_app};

pub fn page(ctx: PageContext) -> Result<AnyView, RenderError> {
    Ok(view! { <ChangePasswordPage ctx=ctx /> }.into_any())
}

#[component]
pub fn ChangePasswordPage(ctx: PageContext) -> impl IntoView {
    let app = use_app();
    let token = ctx.token;

    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (errors, set_errors) = signal(FieldErrors::new());

    let validate = move || validation::password_form(&password.get(), &confirm.get());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let check = validate();
        if !check.is_empty() {
            set_errors.set(check);
            return;
        }

        set_is_submitting.set(true);
        set_errors.set(FieldErrors::new());

        let api = app.api();
        let token = token.clone();
        let new_password = password.get();
        spawn_local(async move {
            let result = api.change_password(&new_password).await;
            if !token.is_current() {
                return;
            }
            match result {
                Ok(()) => {
                    set_password.set(String::new());
                    set_confirm.set(String::new());
                    app.show_toast("修改完成", ToastKind::Success);
                }
                Err(e) => set_errors.set(errors_from(&e, "修改失败，请稍后重试")),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <Header back=paths::POSTS />
        <div class="flex justify-center bg-base-200 min-h-screen p-4">
            <div class="card w-full max-w-md shadow-2xl bg-base-100 h-fit">
                <form class="card-body" on:submit=on_submit>
                    <h1 class="card-title text-2xl justify-center">"修改密码"</h1>

                    <div class="form-control">
                        <label class="label"><span class="label-text">"新密码"</span></label>
                        <input
                            type="password"
                            placeholder="至少 8 个字符"
                            on:input=move |ev| {
                                set_password.set(event_target_value(&ev));
                                set_errors.set(FieldErrors::new());
                            }
                            prop:value=password
                            class="input input-bordered"
                        />
                        <FieldHint errors=errors field=Field::Password />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"确认新密码"</span></label>
                        <input
                            type="password"
                            placeholder="再次输入新密码"
                            on:input=move |ev| {
                                set_confirm.set(event_target_value(&ev));
                                set_errors.set(FieldErrors::new());
                            }
                            prop:value=confirm
                            class="input input-bordered"
                        />
                        <FieldHint errors=errors field=Field::PasswordConfirm />
                    </div>

                    <FormAlert errors=errors />

                    <div class="form-control mt-4">
                        <button
                            class="btn btn-primary"
                            disabled=move || is_submitting.get()
                        >
                            "修改"
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}

use leptos::prelude::*;
use leptos::task::spawn_local;
use talkboard::messages::describe;
use talkboard::route::paths;
use talkboard::validation::{self, Field, FieldErrors};
use talkboard::{PageContext, RenderError};
use talkboard_shared::SignupRequest;

use crate::components::form::{FieldHint, FormAlert, errors_from};
use crate::components::header::Header;
use crate::context::{ToastKind, use_app};
use crate::web::{read_file, selected_file};

pub fn page(ctx: PageContext) -> Result<AnyView, RenderError> {
    Ok(view! { <SignupPage ctx=ctx /> }.into_any())
}

#[component]
pub fn SignupPage(ctx: PageContext) -> impl IntoView {
    let app = use_app();
    let token = ctx.token;

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (nickname, set_nickname) = signal(String::new());
    let (image_url, set_image_url) = signal(Option::<String>::None);
    let (uploading, set_uploading) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (errors, set_errors) = signal(FieldErrors::new());

    // 选中文件后立即上传
    let on_file = {
        let token = token.clone();
        move |ev: leptos::ev::Event| {
            let Some(file) = selected_file(&ev) else {
                return;
            };
            set_uploading.set(true);
            let api = app.api();
            let token = token.clone();
            spawn_local(async move {
                let picked = match read_file(&file).await {
                    Ok(picked) => picked,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to read selected file");
                        if token.is_current() {
                            set_uploading.set(false);
                        }
                        return;
                    }
                };
                let result = api.upload_image(&picked.name, &picked.mime, picked.bytes).await;
                if !token.is_current() {
                    tracing::debug!("discarding stale upload result");
                    return;
                }
                match result {
                    Ok(uploaded) => set_image_url.set(Some(uploaded.file_url)),
                    Err(e) => app.show_toast(describe(&e, "图片上传失败"), ToastKind::Error),
                }
                set_uploading.set(false);
            });
        }
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let check = validation::signup_form(
            &email.get(),
            &password.get(),
            &confirm.get(),
            &nickname.get(),
        );
        if !check.is_empty() {
            set_errors.set(check);
            return;
        }

        set_is_submitting.set(true);
        set_errors.set(FieldErrors::new());

        let req = SignupRequest {
            email: email.get().trim().to_string(),
            password: password.get(),
            nickname: nickname.get(),
            profile_image_url: image_url.get(),
        };
        let api = app.api();
        let token = token.clone();
        spawn_local(async move {
            let result = api.signup(&req).await;
            if !token.is_current() {
                return;
            }
            match result {
                Ok(()) => {
                    app.show_toast("注册成功，请登录", ToastKind::Success);
                    app.navigate(paths::LOGIN);
                }
                Err(e) => {
                    set_errors.set(errors_from(&e, "注册失败，请稍后重试"));
                    set_is_submitting.set(false);
                }
            }
        });
    };

    view! {
        <Header back=paths::LOGIN />
        <div class="flex justify-center bg-base-200 min-h-screen p-4">
            <div class="card w-full max-w-md shadow-2xl bg-base-100 h-fit">
                <form class="card-body" on:submit=on_submit>
                    <h1 class="card-title text-2xl justify-center">"注册"</h1>

                    <div class="flex flex-col items-center gap-2">
                        <span class="label-text">"头像（可选）"</span>
                        <label class="cursor-pointer">
                            {move || match image_url.get() {
                                Some(src) => view! {
                                    <div class="avatar">
                                        <div class="w-24 rounded-full"><img src=src alt="" /></div>
                                    </div>
                                }.into_any(),
                                None => view! {
                                    <div class="w-24 h-24 rounded-full bg-base-300 flex items-center justify-center text-3xl">
                                        "+"
                                    </div>
                                }.into_any(),
                            }}
                            <input type="file" accept="image/*" class="hidden" on:change=on_file />
                        </label>
                        <Show when=move || uploading.get()>
                            <span class="loading loading-dots loading-sm"></span>
                        </Show>
                    </div>

                    <div class="form-control">
                        <label class="label"><span class="label-text">"邮箱"</span></label>
                        <input
                            type="email"
                            placeholder="请输入邮箱"
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            prop:value=email
                            class="input input-bordered"
                        />
                        <FieldHint errors=errors field=Field::Email />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"密码"</span></label>
                        <input
                            type="password"
                            placeholder="至少 8 个字符"
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            prop:value=password
                            class="input input-bordered"
                        />
                        <FieldHint errors=errors field=Field::Password />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"确认密码"</span></label>
                        <input
                            type="password"
                            placeholder="再次输入密码"
                            on:input=move |ev| set_confirm.set(event_target_value(&ev))
                            prop:value=confirm
                            class="input input-bordered"
                        />
                        <FieldHint errors=errors field=Field::PasswordConfirm />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"昵称"</span></label>
                        <input
                            type="text"
                            placeholder="最多 10 个字符"
                            on:input=move |ev| set_nickname.set(event_target_value(&ev))
                            prop:value=nickname
                            class="input input-bordered"
                        />
                        <FieldHint errors=errors field=Field::Nickname />
                    </div>

                    <FormAlert errors=errors />

                    <div class="form-control mt-4">
                        <button
                            class="btn btn-primary"
                            disabled=move || is_submitting.get() || uploading.get()
                        >
                            "注册"
                        </button>
                    </div>
                    <a class="link link-hover text-sm text-center mt-2" href=format!("#{}", paths::LOGIN)>
                        "已有账号？去登录"
                    </a>
                </form>
            </div>
        </div>
    }
}

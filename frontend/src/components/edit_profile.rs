use leptos::prelude::*;
use leptos::task::spawn_local;
use talkboard::messages::describe;
use talkboard::route::paths;
use talkboard::validation::{self, Field, FieldErrors};
use talkboard::{PageContext, RenderError};
use talkboard_shared::UpdateProfileRequest;

use crate::components::form::{FieldHint, FormAlert, errors_from};
use crate::components::header::{Header, avatar};
use crate::components::modal::ConfirmModal;
use crate::context::{ToastKind, use_app};
use crate::web::{read_file, selected_file};

pub fn page(ctx: PageContext) -> Result<AnyView, RenderError> {
    Ok(view! { <EditProfilePage ctx=ctx /> }.into_any())
}

#[component]
pub fn EditProfilePage(ctx: PageContext) -> impl IntoView {
    let app = use_app();
    let token = ctx.token;
    let current = app.user.get_untracked();

    let email = current.as_ref().map(|u| u.email.clone()).unwrap_or_default();
    let (nickname, set_nickname) = signal(current.as_ref().map(|u| u.nickname.clone()).unwrap_or_default());
    let (image_url, set_image_url) = signal(current.and_then(|u| u.profile_image_url));
    let (uploading, set_uploading) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (errors, set_errors) = signal(FieldErrors::new());
    let (confirm_delete, set_confirm_delete) = signal(false);

    // 同步服务端的最新资料；失败时沿用本地记录
    {
        let api = app.api();
        let token = token.clone();
        spawn_local(async move {
            let result = api.refresh_me().await;
            if !token.is_current() {
                return;
            }
            match result {
                Ok(user) => {
                    set_nickname.set(user.nickname);
                    set_image_url.set(user.profile_image_url);
                }
                Err(e) => tracing::warn!(error = %e, "failed to refresh profile"),
            }
        });
    }

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

    let on_submit = {
        let token = token.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let check = validation::profile_form(&nickname.get());
            if !check.is_empty() {
                set_errors.set(check);
                return;
            }

            set_is_submitting.set(true);
            set_errors.set(FieldErrors::new());

            let req = UpdateProfileRequest {
                nickname: nickname.get().trim().to_string(),
                profile_image_url: image_url.get(),
            };
            let api = app.api();
            let token = token.clone();
            spawn_local(async move {
                let result = api.update_profile(&req).await;
                if !token.is_current() {
                    return;
                }
                match result {
                    Ok(()) => app.show_toast("修改完成", ToastKind::Success),
                    Err(e) => set_errors.set(errors_from(&e, "修改失败，请稍后重试")),
                }
                set_is_submitting.set(false);
            });
        }
    };

    let delete_account = Callback::new(move |_: ()| {
        set_confirm_delete.set(false);
        let api = app.api();
        let token = token.clone();
        spawn_local(async move {
            let result = api.delete_account().await;
            if !token.is_current() {
                return;
            }
            match result {
                Ok(()) => {
                    app.show_toast("账号已注销", ToastKind::Info);
                    app.navigate(paths::SIGNUP);
                }
                Err(e) => app.show_toast(describe(&e, "注销失败"), ToastKind::Error),
            }
        });
    });

    view! {
        <Header back=paths::POSTS />
        <div class="flex justify-center bg-base-200 min-h-screen p-4">
            <div class="card w-full max-w-md shadow-2xl bg-base-100 h-fit">
                <form class="card-body" on:submit=on_submit>
                    <h1 class="card-title text-2xl justify-center">"编辑资料"</h1>

                    <div class="flex flex-col items-center gap-2">
                        <label class="cursor-pointer">
                            {move || avatar(image_url.get(), &nickname.get(), "w-24")}
                            <input type="file" accept="image/*" class="hidden" on:change=on_file />
                        </label>
                        <span class="text-xs text-base-content/60">"点击头像更换图片"</span>
                        <Show when=move || uploading.get()>
                            <span class="loading loading-dots loading-sm"></span>
                        </Show>
                    </div>

                    <div class="form-control">
                        <label class="label"><span class="label-text">"邮箱"</span></label>
                        <input type="email" class="input input-bordered" value=email disabled />
                    </div>
                    <div class="form-control">
                        <label class="label"><span class="label-text">"昵称"</span></label>
                        <input
                            type="text"
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
                            "保存"
                        </button>
                    </div>
                    <button
                        type="button"
                        class="btn btn-ghost btn-sm text-error mt-2"
                        on:click=move |_| set_confirm_delete.set(true)
                    >
                        "注销账号"
                    </button>
                </form>
            </div>
        </div>

        <ConfirmModal
            open=confirm_delete
            title="确定要注销账号吗？"
            message="注销后帖子和评论都会被删除，且无法恢复。"
            on_confirm=delete_account
            on_cancel=Callback::new(move |_| set_confirm_delete.set(false))
        />
    }
}

//! 写帖子 / 编辑帖子

use leptos::prelude::*;
use leptos::task::spawn_local;
use talkboard::messages::describe;
use talkboard::route::paths;
use talkboard::validation::{self, Field, FieldErrors};
use talkboard::{PageContext, RenderError};
use talkboard_shared::{Id, POST_TITLE_MAX_CHARS, PostDraft};

use crate::components::form::{FieldHint, FormAlert, errors_from};
use crate::components::header::Header;
use crate::context::{ToastKind, use_app};
use crate::web::{read_file, selected_file};

pub fn new_page(ctx: PageContext) -> Result<AnyView, RenderError> {
    Ok(view! { <PostEditorPage post_id=None ctx=ctx /> }.into_any())
}

pub fn edit_page(ctx: PageContext) -> Result<AnyView, RenderError> {
    let id = ctx.param("id")?.to_string();
    Ok(view! { <PostEditorPage post_id=Some(id) ctx=ctx /> }.into_any())
}

/// 已附加的图片
#[derive(Debug, Clone, PartialEq)]
struct Attachment {
    file_id: Option<Id>,
    name: String,
    url: String,
}

#[component]
pub fn PostEditorPage(post_id: Option<String>, ctx: PageContext) -> impl IntoView {
    let app = use_app();
    let token = ctx.token;
    let is_edit = post_id.is_some();
    let post_id = StoredValue::new(post_id);

    let (title, set_title) = signal(String::new());
    let (content, set_content) = signal(String::new());
    let (attachment, set_attachment) = signal(Option::<Attachment>::None);
    let (uploading, set_uploading) = signal(false);
    let (loading, set_loading) = signal(is_edit);
    let (is_submitting, set_is_submitting) = signal(false);
    let (errors, set_errors) = signal(FieldErrors::new());

    // 编辑时先读取原帖
    if let Some(id) = post_id.get_value() {
        let api = app.api();
        let token = token.clone();
        spawn_local(async move {
            let result = api.get_post(&id).await;
            if !token.is_current() {
                return;
            }
            match result {
                Ok(detail) => {
                    set_title.set(detail.title);
                    set_content.set(detail.content);
                    set_attachment.set(detail.file.map(|f| Attachment {
                        file_id: f.file_id,
                        name: "已上传的图片".to_string(),
                        url: f.file_url,
                    }));
                }
                Err(e) => {
                    app.show_toast(describe(&e, "帖子加载失败"), ToastKind::Error);
                    app.navigate(paths::POSTS);
                }
            }
            set_loading.set(false);
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
                let name = picked.name.clone();
                let result = api.upload_image(&picked.name, &picked.mime, picked.bytes).await;
                if !token.is_current() {
                    tracing::debug!("discarding stale upload result");
                    return;
                }
                match result {
                    Ok(uploaded) => set_attachment.set(Some(Attachment {
                        file_id: Some(uploaded.file_id),
                        name,
                        url: uploaded.file_url,
                    })),
                    Err(e) => app.show_toast(describe(&e, "图片上传失败"), ToastKind::Error),
                }
                set_uploading.set(false);
            });
        }
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let check = validation::post_form(&title.get(), &content.get());
        if !check.is_empty() {
            set_errors.set(check);
            return;
        }

        set_is_submitting.set(true);
        set_errors.set(FieldErrors::new());

        let draft = PostDraft {
            title: title.get().trim().to_string(),
            content: content.get(),
            file_id: attachment.get().and_then(|a| a.file_id),
        };
        let api = app.api();
        let token = token.clone();
        let editing = post_id.get_value();
        spawn_local(async move {
            let result = match &editing {
                Some(id) => api.update_post(id, &draft).await.map(|_| id.clone()),
                None => api.create_post(&draft).await.map(|id| id.to_string()),
            };
            if !token.is_current() {
                return;
            }
            match result {
                Ok(id) => {
                    tracing::info!(post_id = %id, edited = editing.is_some(), "post saved");
                    app.navigate(&paths::post(&id));
                }
                Err(e) => {
                    set_errors.set(errors_from(&e, "保存失败，请稍后重试"));
                    set_is_submitting.set(false);
                }
            }
        });
    };

    let back = match post_id.get_value() {
        Some(id) => paths::post(id),
        None => paths::POSTS.to_string(),
    };
    let heading = if is_edit { "编辑帖子" } else { "写帖子" };
    let title_len = move || title.with(|t| t.chars().count());

    view! {
        <Header back=back />
        <div class="min-h-screen bg-base-200 p-4">
            <div class="card max-w-2xl mx-auto shadow bg-base-100">
                <Show
                    when=move || !loading.get()
                    fallback=|| view! {
                        <div class="flex justify-center py-8">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                >
                    <form class="card-body" on:submit=on_submit.clone()>
                        <h1 class="card-title text-2xl">{heading}</h1>

                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"标题"</span>
                                <span class="label-text-alt">
                                    {title_len}" / "{POST_TITLE_MAX_CHARS}
                                </span>
                            </label>
                            <input
                                type="text"
                                placeholder="请输入标题（最多 26 个字符）"
                                on:input=move |ev| set_title.set(event_target_value(&ev))
                                prop:value=title
                                class="input input-bordered"
                            />
                            <FieldHint errors=errors field=Field::Title />
                        </div>

                        <div class="form-control">
                            <label class="label"><span class="label-text">"内容"</span></label>
                            <textarea
                                class="textarea textarea-bordered h-48"
                                placeholder="请输入内容"
                                on:input=move |ev| set_content.set(event_target_value(&ev))
                                prop:value=content
                            ></textarea>
                            <FieldHint errors=errors field=Field::Content />
                        </div>

                        <div class="form-control">
                            <label class="label"><span class="label-text">"图片"</span></label>
                            <input
                                type="file"
                                accept="image/*"
                                class="file-input file-input-bordered"
                                on:change=on_file.clone()
                            />
                            <Show when=move || uploading.get()>
                                <span class="loading loading-dots loading-sm mt-2"></span>
                            </Show>
                            {move || attachment.get().map(|a| view! {
                                <div class="flex items-center gap-3 mt-2">
                                    <img class="w-16 h-16 object-cover rounded" src=a.url alt="" />
                                    <span class="text-sm">{a.name}</span>
                                    <button
                                        type="button"
                                        class="btn btn-xs btn-ghost"
                                        on:click=move |_| set_attachment.set(None)
                                    >
                                        "移除"
                                    </button>
                                </div>
                            })}
                        </div>

                        <FormAlert errors=errors />

                        <div class="form-control mt-4">
                            <button
                                class="btn btn-primary"
                                disabled=move || is_submitting.get() || uploading.get()
                            >
                                {if is_edit { "保存修改" } else { "发布" }}
                            </button>
                        </div>
                    </form>
                </Show>
            </div>
        </div>
    }
}

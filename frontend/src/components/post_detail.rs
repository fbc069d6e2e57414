//! 帖子详情页
//!
//! 正文、点赞、评论（发表 / 行内编辑 / 删除确认）以及作者的编辑与删除入口。
//! 评论列表与浏览计数失败时只记录日志，页面照常显示。

use leptos::prelude::*;
use leptos::task::spawn_local;
use talkboard::messages::describe;
use talkboard::route::paths;
use talkboard::validation;
use talkboard::{PageContext, RenderError};
use talkboard_shared::format::compact_count;
use talkboard_shared::{Comment, Id, PostDetail};

use crate::components::header::{Header, avatar};
use crate::components::modal::ConfirmModal;
use crate::components::time::created_label;
use crate::context::{AppContext, ToastKind, use_app};

pub fn page(ctx: PageContext) -> Result<AnyView, RenderError> {
    let id = ctx.param("id")?.to_string();
    Ok(view! { <PostDetailPage id=id ctx=ctx /> }.into_any())
}

/// 当前用户是否是作者（服务端的 isMine 优先）
fn owned_by_me(app: AppContext, is_mine: bool, author: Option<&Id>) -> bool {
    is_mine
        || app.user.with_untracked(|u| match (u, author) {
            (Some(u), Some(author)) => &u.user_id == author,
            _ => false,
        })
}

#[component]
pub fn PostDetailPage(id: String, ctx: PageContext) -> impl IntoView {
    let app = use_app();
    let count_view = ctx.counts_as_view();
    let token = ctx.token;
    let id = StoredValue::new(id);

    let (post, set_post) = signal(Option::<PostDetail>::None);
    let (load_error, set_load_error) = signal(Option::<String>::None);
    let (liked, set_liked) = signal(false);
    let (like_count, set_like_count) = signal(0u64);
    let (liking, set_liking) = signal(false);
    let (comments, set_comments) = signal(Vec::<Comment>::new());
    let (draft, set_draft) = signal(String::new());
    let (editing, set_editing) = signal(Option::<Id>::None);
    let (confirm_post_delete, set_confirm_post_delete) = signal(false);
    let (comment_to_delete, set_comment_to_delete) = signal(Option::<Id>::None);

    let reload_comments = {
        let token = token.clone();
        move || {
            let api = app.api();
            let token = token.clone();
            let post_id = id.get_value();
            spawn_local(async move {
                let result = api.list_comments(&post_id).await;
                if !token.is_current() {
                    return;
                }
                match result {
                    Ok(list) => {
                        let count = list.len() as u64;
                        set_comments.set(list);
                        set_post.update(|p| {
                            if let Some(p) = p {
                                p.comment_count = count;
                            }
                        });
                    }
                    Err(e) => tracing::warn!(%post_id, error = %e, "failed to load comments"),
                }
            });
        }
    };
    let reload_comments = StoredValue::new(reload_comments);

    // 初始加载：浏览计数 -> 正文 -> 评论
    {
        let api = app.api();
        let token = token.clone();
        let post_id = id.get_value();
        spawn_local(async move {
            if count_view {
                if let Err(e) = api.record_view(&post_id).await {
                    tracing::warn!(%post_id, error = %e, "failed to record view");
                }
            }
            let result = api.get_post(&post_id).await;
            if !token.is_current() {
                return;
            }
            match result {
                Ok(detail) => {
                    set_liked.set(detail.liked);
                    set_like_count.set(detail.like_count);
                    set_post.set(Some(detail));
                    reload_comments.with_value(|f| f());
                }
                Err(e) => set_load_error.set(Some(describe(&e, "帖子加载失败"))),
            }
        });
    }

    let on_like = {
        let token = token.clone();
        move |_| {
            if liking.get_untracked() {
                return;
            }
            set_liking.set(true);
            let api = app.api();
            let token = token.clone();
            let was_liked = liked.get_untracked();
            spawn_local(async move {
                let result = api.toggle_like(id.get_value(), was_liked).await;
                if !token.is_current() {
                    return;
                }
                match result {
                    Ok(state) => {
                        match state.like_count {
                            Some(n) => set_like_count.set(n),
                            None if state.liked != was_liked => set_like_count.update(|n| {
                                *n = if state.liked { *n + 1 } else { n.saturating_sub(1) }
                            }),
                            None => {}
                        }
                        set_liked.set(state.liked);
                    }
                    Err(e) => app.show_toast(describe(&e, "点赞失败"), ToastKind::Error),
                }
                set_liking.set(false);
            });
        }
    };

    let delete_post = {
        let token = token.clone();
        Callback::new(move |_: ()| {
            set_confirm_post_delete.set(false);
            let api = app.api();
            let token = token.clone();
            spawn_local(async move {
                let result = api.delete_post(id.get_value()).await;
                if !token.is_current() {
                    return;
                }
                match result {
                    Ok(()) => {
                        app.show_toast("帖子已删除", ToastKind::Success);
                        app.navigate(paths::POSTS);
                    }
                    Err(e) => app.show_toast(describe(&e, "删除失败"), ToastKind::Error),
                }
            });
        })
    };

    let submit_comment = {
        let token = token.clone();
        move |_| {
            let content = draft.get_untracked();
            if let Err(message) = validation::content(&content) {
                app.show_toast(message, ToastKind::Error);
                return;
            }
            let api = app.api();
            let token = token.clone();
            let target = editing.get_untracked();
            spawn_local(async move {
                let result = match &target {
                    Some(comment_id) => api.update_comment(comment_id, content.trim()).await,
                    None => api.create_comment(id.get_value(), content.trim()).await,
                };
                if !token.is_current() {
                    return;
                }
                match result {
                    Ok(()) => {
                        set_draft.set(String::new());
                        set_editing.set(None);
                        reload_comments.with_value(|f| f());
                    }
                    Err(e) => app.show_toast(describe(&e, "评论提交失败"), ToastKind::Error),
                }
            });
        }
    };

    let delete_comment = {
        let token = token.clone();
        Callback::new(move |_: ()| {
            let Some(comment_id) = comment_to_delete.get_untracked() else {
                return;
            };
            set_comment_to_delete.set(None);
            let api = app.api();
            let token = token.clone();
            spawn_local(async move {
                let result = api.delete_comment(&comment_id).await;
                if !token.is_current() {
                    return;
                }
                match result {
                    Ok(()) => {
                        if editing.get_untracked().as_ref() == Some(&comment_id) {
                            set_editing.set(None);
                            set_draft.set(String::new());
                        }
                        reload_comments.with_value(|f| f());
                    }
                    Err(e) => app.show_toast(describe(&e, "删除失败"), ToastKind::Error),
                }
            });
        })
    };

    let start_edit = Callback::new(move |comment: Comment| {
        set_draft.set(comment.content);
        set_editing.set(Some(comment.comment_id));
    });
    let ask_delete = Callback::new(move |comment_id: Id| set_comment_to_delete.set(Some(comment_id)));

    let article = move || {
        post.get().map(|p| {
            let mine = owned_by_me(app, p.is_mine, p.author.user_id.as_ref());
            let created = p.created_at.as_deref().map(created_label).unwrap_or_default();
            let image = p.file.as_ref().map(|f| {
                view! { <img class="rounded-box max-h-96 object-contain" src=f.file_url.clone() alt="" /> }
            });
            view! {
                <article class="card bg-base-100 shadow">
                    <div class="card-body gap-4">
                        <h1 class="card-title text-2xl">{p.title.clone()}</h1>
                        <div class="flex items-center justify-between">
                            <div class="flex items-center gap-2">
                                {avatar(p.author.profile_image_url.clone(), &p.author.nickname, "w-8")}
                                <span class="font-semibold text-sm">{p.author.nickname.clone()}</span>
                                <span class="text-sm text-base-content/60">{created}</span>
                            </div>
                            <Show when=move || mine>
                                <div class="flex gap-2">
                                    <button
                                        class="btn btn-sm btn-outline"
                                        on:click=move |_| app.navigate(&paths::edit_post(id.get_value()))
                                    >
                                        "编辑"
                                    </button>
                                    <button
                                        class="btn btn-sm btn-outline btn-error"
                                        on:click=move |_| set_confirm_post_delete.set(true)
                                    >
                                        "删除"
                                    </button>
                                </div>
                            </Show>
                        </div>
                        <div class="divider my-0"></div>
                        {image}
                        <p class="whitespace-pre-wrap break-words">{p.content.clone()}</p>
                        <div class="flex justify-center gap-4 mt-2">
                            <div class="stats shadow">
                                <div class="stat place-items-center py-2">
                                    <div class="stat-value text-lg">{compact_count(p.hits)}</div>
                                    <div class="stat-desc">"浏览"</div>
                                </div>
                                <div class="stat place-items-center py-2">
                                    <div class="stat-value text-lg">{compact_count(p.comment_count)}</div>
                                    <div class="stat-desc">"评论"</div>
                                </div>
                            </div>
                        </div>
                    </div>
                </article>
            }
        })
    };

    view! {
        <Header back=paths::POSTS />
        <div class="min-h-screen bg-base-200 p-4">
            <div class="max-w-2xl mx-auto space-y-4">
                <Show when=move || load_error.get().is_some()>
                    <div role="alert" class="alert alert-error">
                        <span>{move || load_error.get().unwrap_or_default()}</span>
                    </div>
                    <button class="btn btn-ghost" on:click=move |_| app.navigate(paths::POSTS)>
                        "返回列表"
                    </button>
                </Show>

                <Show when=move || post.with(Option::is_none) && load_error.with(Option::is_none)>
                    <div class="flex justify-center py-8">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>

                {article}

                <Show when=move || post.with(Option::is_some)>
                    <div class="flex justify-center">
                        <button
                            class=move || if liked.get() { "btn btn-primary gap-2" } else { "btn btn-outline gap-2" }
                            disabled=move || liking.get()
                            on:click=on_like.clone()
                        >
                            {move || if liked.get() { "♥ 已赞" } else { "♡ 点赞" }}
                            <span class="badge">{move || compact_count(like_count.get())}</span>
                        </button>
                    </div>

                    <div class="card bg-base-100 shadow">
                        <div class="card-body gap-3">
                            <textarea
                                class="textarea textarea-bordered w-full"
                                rows="3"
                                placeholder="写下你的评论"
                                on:input=move |ev| set_draft.set(event_target_value(&ev))
                                prop:value=draft
                            ></textarea>
                            <div class="flex justify-end gap-2">
                                <Show when=move || editing.with(Option::is_some)>
                                    <button
                                        class="btn btn-ghost btn-sm"
                                        on:click=move |_| {
                                            set_editing.set(None);
                                            set_draft.set(String::new());
                                        }
                                    >
                                        "取消"
                                    </button>
                                </Show>
                                <button
                                    class="btn btn-primary btn-sm"
                                    disabled=move || draft.with(|d| d.trim().is_empty())
                                    on:click=submit_comment.clone()
                                >
                                    {move || if editing.with(Option::is_some) { "修改评论" } else { "发表评论" }}
                                </button>
                            </div>
                        </div>
                    </div>

                    <div class="space-y-2">
                        <For
                            each=move || comments.get()
                            key=|c| (c.comment_id.clone(), c.content.clone())
                            children=move |comment| view! {
                                <CommentItem comment=comment on_edit=start_edit on_delete=ask_delete />
                            }
                        />
                    </div>
                </Show>
            </div>
        </div>

        <ConfirmModal
            open=confirm_post_delete
            title="确定要删除这篇帖子吗？"
            message="删除后无法恢复。"
            on_confirm=delete_post
            on_cancel=Callback::new(move |_| set_confirm_post_delete.set(false))
        />
        <ConfirmModal
            open=Signal::derive(move || comment_to_delete.with(Option::is_some))
            title="确定要删除这条评论吗？"
            message="删除后无法恢复。"
            on_confirm=delete_comment
            on_cancel=Callback::new(move |_| set_comment_to_delete.set(None))
        />
    }
}

#[component]
fn CommentItem(comment: Comment, on_edit: Callback<Comment>, on_delete: Callback<Id>) -> impl IntoView {
    let app = use_app();
    let mine = owned_by_me(app, comment.is_mine, comment.author.user_id.as_ref());
    let created = comment.created_at.as_deref().map(created_label).unwrap_or_default();
    let for_edit = comment.clone();
    let comment_id = comment.comment_id.clone();

    view! {
        <div class="card bg-base-100 shadow-sm">
            <div class="card-body p-4 gap-2">
                <div class="flex items-center justify-between">
                    <div class="flex items-center gap-2">
                        {avatar(comment.author.profile_image_url.clone(), &comment.author.nickname, "w-7")}
                        <span class="font-semibold text-sm">{comment.author.nickname.clone()}</span>
                        <span class="text-xs text-base-content/60">{created}</span>
                    </div>
                    <Show when=move || mine>
                        <div class="flex gap-1">
                            <button class="btn btn-xs btn-ghost" on:click={
                                let for_edit = for_edit.clone();
                                move |_| on_edit.run(for_edit.clone())
                            }>
                                "编辑"
                            </button>
                            <button class="btn btn-xs btn-ghost text-error" on:click={
                                let comment_id = comment_id.clone();
                                move |_| on_delete.run(comment_id.clone())
                            }>
                                "删除"
                            </button>
                        </div>
                    </Show>
                </div>
                <p class="whitespace-pre-wrap break-words text-sm">{comment.content.clone()}</p>
            </div>
        </div>
    }
}

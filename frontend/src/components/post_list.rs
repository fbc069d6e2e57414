use leptos::prelude::*;
use leptos::task::spawn_local;
use talkboard::messages::describe;
use talkboard::route::paths;
use talkboard::{PageContext, RenderError};
use talkboard_shared::format::{compact_count, truncate_chars};
use talkboard_shared::{POST_TITLE_MAX_CHARS, PostSummary};

use crate::components::header::{Header, avatar};
use crate::components::time::created_label;
use crate::context::use_app;

pub fn page(ctx: PageContext) -> Result<AnyView, RenderError> {
    Ok(view! { <PostListPage ctx=ctx /> }.into_any())
}

#[component]
pub fn PostListPage(ctx: PageContext) -> impl IntoView {
    let app = use_app();
    let token = ctx.token;

    let (posts, set_posts) = signal(Vec::<PostSummary>::new());
    let (next_page, set_next_page) = signal(1u32);
    let (has_more, set_has_more) = signal(false);
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let load_more = move || {
        if loading.get_untracked() {
            return;
        }
        set_loading.set(true);
        let page = next_page.get_untracked();
        let api = app.api();
        let token = token.clone();
        spawn_local(async move {
            let result = api.list_posts(page).await;
            if !token.is_current() {
                return;
            }
            match result {
                Ok(loaded) => {
                    tracing::debug!(page, count = loaded.posts.len(), "posts loaded");
                    set_posts.update(|list| list.extend(loaded.posts));
                    set_has_more.set(loaded.has_more);
                    set_next_page.set(page + 1);
                    set_error_msg.set(None);
                }
                Err(e) => set_error_msg.set(Some(describe(&e, "帖子列表加载失败"))),
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    load_more();
    let load_more = StoredValue::new(load_more);

    view! {
        <Header />
        <div class="min-h-screen bg-base-200 p-4">
            <div class="max-w-2xl mx-auto space-y-4">
                <div class="flex items-center justify-between">
                    <p class="text-lg">
                        "欢迎来到"<br/>
                        <strong>"畅所欲言"</strong>" 社区"
                    </p>
                    <button class="btn btn-primary" on:click=move |_| app.navigate(paths::NEW_POST)>
                        "写帖子"
                    </button>
                </div>

                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                <Show when=move || posts.with(Vec::is_empty) && !loading.get() && error_msg.get().is_none()>
                    <div class="text-center py-8 text-base-content/50">"还没有帖子，来写第一篇吧。"</div>
                </Show>

                <For
                    each=move || posts.get()
                    key=|post| post.post_id.clone()
                    children=move |post| view! { <PostCard post=post /> }
                />

                <Show when=move || loading.get()>
                    <div class="flex justify-center py-4">
                        <span class="loading loading-spinner loading-md text-primary"></span>
                    </div>
                </Show>

                <Show when=move || has_more.get() && !loading.get()>
                    <button class="btn btn-block btn-ghost" on:click=move |_| load_more.with_value(|f| f())>
                        "加载更多"
                    </button>
                </Show>
            </div>
        </div>
    }
}

#[component]
fn PostCard(post: PostSummary) -> impl IntoView {
    let app = use_app();
    let target = paths::post(&post.post_id);
    let created = post.created_at.as_deref().map(created_label).unwrap_or_default();

    view! {
        <div class="card bg-base-100 shadow hover:shadow-lg cursor-pointer" on:click=move |_| app.navigate(&target)>
            <div class="card-body p-5 gap-3">
                <h2 class="card-title text-lg">{truncate_chars(&post.title, POST_TITLE_MAX_CHARS)}</h2>
                <div class="flex justify-between text-sm text-base-content/70">
                    <div class="flex gap-3">
                        <span>"赞 "{compact_count(post.like_count)}</span>
                        <span>"评论 "{compact_count(post.comment_count)}</span>
                        <span>"浏览 "{compact_count(post.hits)}</span>
                    </div>
                    <span>{created}</span>
                </div>
                <div class="divider my-0"></div>
                <div class="flex items-center gap-2">
                    {avatar(post.author.profile_image_url.clone(), &post.author.nickname, "w-8")}
                    <span class="font-semibold text-sm">{post.author.nickname.clone()}</span>
                </div>
            </div>
        </div>
    }
}

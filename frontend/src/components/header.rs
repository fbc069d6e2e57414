use leptos::prelude::*;
use leptos::task::spawn_local;
use talkboard::route::paths;

use crate::context::use_app;

/// 头像：有图片显示图片，否则显示昵称首字
pub fn avatar(image: Option<String>, nickname: &str, size_class: &'static str) -> AnyView {
    match image {
        Some(src) => view! {
            <div class="avatar">
                <div class=format!("{} rounded-full", size_class)>
                    <img src=src alt="" />
                </div>
            </div>
        }
        .into_any(),
        None => {
            let initial = nickname.chars().next().map(String::from).unwrap_or_default();
            view! {
                <div class="avatar avatar-placeholder">
                    <div class=format!("{} rounded-full bg-neutral text-neutral-content", size_class)>
                        <span>{initial}</span>
                    </div>
                </div>
            }
            .into_any()
        }
    }
}

/// 页面顶栏
///
/// `back` 为返回按钮的目标路径，不传则不显示返回按钮。
#[component]
pub fn Header(#[prop(optional, into)] back: Option<String>) -> impl IntoView {
    let app = use_app();

    let on_logout = move |_| {
        let api = app.api();
        spawn_local(async move {
            // 本地会话总会被清除
            if let Err(e) = api.logout().await {
                tracing::debug!(error = %e, "logout request failed");
            }
            app.navigate(paths::LOGIN);
        });
    };

    let back_button = back.map(|to| {
        view! {
            <button class="btn btn-ghost btn-circle text-2xl" on:click=move |_| app.navigate(&to)>
                "‹"
            </button>
        }
    });

    view! {
        <div class="navbar bg-base-100 shadow-md sticky top-0 z-40">
            <div class="navbar-start">{back_button}</div>
            <div class="navbar-center">
                <a class="btn btn-ghost text-xl" href=format!("#{}", paths::POSTS)>"畅所欲言"</a>
            </div>
            <div class="navbar-end">
                <Show when=move || app.user.with(Option::is_some)>
                    <div class="dropdown dropdown-end">
                        <div tabindex="0" role="button" class="btn btn-ghost btn-circle">
                            {move || app.user.with(|u| match u {
                                Some(u) => avatar(u.profile_image_url.clone(), &u.nickname, "w-9"),
                                None => avatar(None, "", "w-9"),
                            })}
                        </div>
                        <ul tabindex="0" class="menu menu-sm dropdown-content bg-base-100 rounded-box z-50 mt-3 w-36 p-2 shadow">
                            <li><a on:click=move |_| app.navigate(paths::EDIT_PROFILE)>"编辑资料"</a></li>
                            <li><a on:click=move |_| app.navigate(paths::CHANGE_PASSWORD)>"修改密码"</a></li>
                            <li><a on:click=on_logout>"退出登录"</a></li>
                        </ul>
                    </div>
                </Show>
            </div>
        </div>
    }
}

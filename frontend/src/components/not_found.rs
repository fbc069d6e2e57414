use leptos::prelude::*;
use talkboard::route::paths;

/// 未匹配任何路由时显示
pub fn render() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"页面未找到"</p>
                <a class="btn btn-primary mt-6" href=format!("#{}", paths::POSTS)>"返回首页"</a>
            </div>
        </div>
    }
    .into_any()
}

use leptos::prelude::*;
use leptos::task::spawn_local;
use talkboard::route::paths;
use talkboard::validation::{self, Field, FieldErrors};
use talkboard::{PageContext, RenderError};

use crate::components::form::{FieldHint, FormAlert, errors_from};
use crate::components::header::Header;
use crate::context::use_app;

pub fn page(ctx: PageContext) -> Result<AnyView, RenderError> {
    Ok(view! { <LoginPage ctx=ctx /> }.into_any())
}

#[component]
pub fn LoginPage(ctx: PageContext) -> impl IntoView {
    let app = use_app();
    let token = ctx.token;

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (errors, set_errors) = signal(FieldErrors::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let check = validation::login_form(&email.get(), &password.get());
        if !check.is_empty() {
            set_errors.set(check);
            return;
        }

        set_is_submitting.set(true);
        set_errors.set(FieldErrors::new());

        let api = app.api();
        let token = token.clone();
        spawn_local(async move {
            let result = api.login(email.get_untracked().trim(), &password.get_untracked()).await;
            if !token.is_current() {
                return;
            }
            match result {
                Ok(_) => app.navigate(paths::POSTS),
                Err(e) => {
                    tracing::info!(error = %e, "login rejected");
                    set_errors.set(errors_from(&e, "登录失败，请稍后重试"));
                    set_is_submitting.set(false);
                }
            }
        });
    };

    view! {
        <Header />
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"登录"</h1>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"邮箱"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="请输入邮箱"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                            <FieldHint errors=errors field=Field::Email />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="请输入密码"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                            <FieldHint errors=errors field=Field::Password />
                        </div>

                        <FormAlert errors=errors />

                        <div class="form-control mt-4">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "登录中..." }.into_any()
                                } else {
                                    "登录".into_any()
                                }}
                            </button>
                        </div>
                        <a class="link link-hover text-sm text-center mt-2" href=format!("#{}", paths::SIGNUP)>
                            "还没有账号？去注册"
                        </a>
                    </form>
                </div>
            </div>
        </div>
    }
}

use leptos::prelude::*;
use talkboard::ClientError;
use talkboard::messages::{describe, field_for};
use talkboard::validation::{Field, FieldErrors};

/// 把接口错误转成表单消息：能对应到字段的放在字段下，其余作为表单级消息
pub fn errors_from(err: &ClientError, fallback: &str) -> FieldErrors {
    let field = err.code().and_then(field_for).unwrap_or(Field::Form);
    let mut errors = FieldErrors::new();
    errors.push(field, describe(err, fallback));
    errors
}

/// 输入框下方的提示文字
#[component]
pub fn FieldHint(errors: ReadSignal<FieldErrors>, field: Field) -> impl IntoView {
    let message = move || errors.with(|e| e.get(field).map(str::to_string));

    view! {
        <p class="text-error text-xs min-h-4 mt-1">{move || message().unwrap_or_default()}</p>
    }
}

/// 表单级错误提示
#[component]
pub fn FormAlert(errors: ReadSignal<FieldErrors>) -> impl IntoView {
    let message = move || errors.with(|e| e.get(Field::Form).map(str::to_string));

    view! {
        <Show when=move || message().is_some()>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || message().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

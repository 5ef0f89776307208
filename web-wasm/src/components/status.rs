//! 読み込み中・エラー表示

use leptos::ev::MouseEvent;
use leptos::prelude::*;

#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="loading">
            <div class="spinner" />
            <p class="text-muted">"読み込み中..."</p>
        </div>
    }
}

#[component]
pub fn ErrorView<F>(#[prop(into)] message: Signal<String>, on_retry: F) -> impl IntoView
where
    F: Fn(MouseEvent) + 'static,
{
    view! {
        <div class="error-view">
            <p>"画像を読み込めませんでした"</p>
            <p class="text-muted">{move || message.get()}</p>
            <button class="btn btn-secondary" on:click=on_retry>
                "再読み込み"
            </button>
        </div>
    }
}

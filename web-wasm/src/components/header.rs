//! ヘッダーコンポーネント

use leptos::ev::MouseEvent;
use leptos::prelude::*;

#[component]
pub fn Header<F>(on_add: F) -> impl IntoView
where
    F: Fn(MouseEvent) + 'static,
{
    view! {
        <header class="header">
            <h1>"Image Gallery"</h1>
            <button class="btn btn-primary" on:click=on_add>
                "画像を追加"
            </button>
        </header>
    }
}

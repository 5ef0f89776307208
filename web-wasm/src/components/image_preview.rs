//! 画像プレビュー（モーダル）

use crate::app::AppState;
use leptos::prelude::*;

#[component]
pub fn ImagePreview(state: AppState) -> impl IntoView {
    let image_url = move || {
        state
            .preview
            .with(|p| p.image_url().unwrap_or_default().to_string())
    };
    let original_link = move || {
        state
            .preview
            .with(|p| p.original_link().unwrap_or_default().to_string())
    };

    view! {
        <Show when=move || state.preview.with(|p| p.is_open())>
            <div class="modal-overlay" on:click=move |_| state.close_preview()>
                <div class="modal modal-preview" on:click=|ev| ev.stop_propagation()>
                    <button class="modal-close" on:click=move |_| state.close_preview()>
                        "×"
                    </button>
                    <img src=image_url alt="" />
                    <a href=original_link target="_blank" rel="noopener noreferrer">
                        "元画像を開く"
                    </a>
                </div>
            </div>
        </Show>
    }
}

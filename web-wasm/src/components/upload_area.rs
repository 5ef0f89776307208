//! ファイル選択エリア（ドラッグ&ドロップ / クリック）

use gallery_common::validation::ACCEPTED_MIME_TYPES;
use leptos::html::Input;
use leptos::prelude::*;
use web_sys::{DragEvent, File, HtmlInputElement};

#[component]
pub fn UploadArea<F>(
    on_file: F,
    #[prop(into)] preview_url: Signal<Option<String>>,
    #[prop(into)] is_uploading: Signal<bool>,
) -> impl IntoView
where
    F: Fn(File) + 'static + Clone,
{
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref = NodeRef::<Input>::new();

    let on_drop = {
        let on_file = on_file.clone();
        move |ev: DragEvent| {
            ev.prevent_default();
            set_is_dragover.set(false);

            // 複数ドロップされても先頭の1枚だけ
            let file = ev
                .data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                on_file(file);
            }
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            on_file(file);
        }
        input.set_value("");
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |_: DragEvent| {
        set_is_dragover.set(false);
    };

    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    view! {
        <div
            class=move || if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <input
                type="file"
                accept=ACCEPTED_MIME_TYPES.join(",")
                style="display: none"
                node_ref=input_ref
                on:change=on_change
                on:click=|ev| ev.stop_propagation()
            />
            {move || match preview_url.get() {
                Some(url) => view! { <img class="upload-preview" src=url alt="" /> }.into_any(),
                None => view! {
                    <div>
                        <div class="upload-icon">"📷"</div>
                        <p>"画像をドラッグ&ドロップ または クリックして選択"</p>
                        <p class="text-muted">"対応形式: JPEG, PNG, GIF（10MB未満）"</p>
                    </div>
                }.into_any(),
            }}
            <Show when=move || is_uploading.get()>
                <p class="text-muted">"アップロード中..."</p>
            </Show>
        </div>
    }
}

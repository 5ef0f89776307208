//! 画像登録モーダル
//!
//! 入力のたびにその項目を検証し、エラーは項目の下に表示する。

use crate::app::AppState;
use crate::components::upload_area::UploadArea;
use gallery_common::{Field, FormPhase};
use leptos::prelude::*;

/// 送信ボタンの表示
fn submit_label(phase: FormPhase) -> &'static str {
    match phase {
        FormPhase::Submitting => "登録中...",
        _ => "登録",
    }
}

#[component]
pub fn UploadModal(state: AppState) -> impl IntoView {
    let phase = state.form_view.phase;
    let is_uploading = Signal::derive(move || phase.get() == FormPhase::UploadingFile);
    let has_error = move |field: Field| state.form_view.errors.with(|e| e.get(field).is_some());

    view! {
        <Show when=move || phase.get() != FormPhase::Closed>
            <div class="modal-overlay">
                <div class="modal">
                    <div class="modal-header">
                        <h2>"画像を追加"</h2>
                        <button class="modal-close" on:click=move |_| state.close_form()>
                            "×"
                        </button>
                    </div>
                    <form
                        class="upload-form"
                        on:submit=move |ev| {
                            ev.prevent_default();
                            state.submit();
                        }
                    >
                        <UploadArea
                            on_file=move |file: web_sys::File| state.attach_file(file)
                            preview_url=state.form_view.preview_url
                            is_uploading=is_uploading
                        />
                        <Show when=move || state.form_view.has_remote_url.get()>
                            <p class="text-muted">"アップロード完了"</p>
                        </Show>
                        <FieldError state=state field=Field::Image />

                        <label class="form-label">
                            "タイトル"
                            <input
                                type="text"
                                class="form-input"
                                class:invalid=move || has_error(Field::Title)
                                on:input=move |ev| state.set_title(event_target_value(&ev))
                            />
                        </label>
                        <FieldError state=state field=Field::Title />

                        <label class="form-label">
                            "説明"
                            <textarea
                                class="form-input"
                                class:invalid=move || has_error(Field::Description)
                                on:input=move |ev| state.set_description(event_target_value(&ev))
                            />
                        </label>
                        <FieldError state=state field=Field::Description />

                        <button
                            type="submit"
                            class="btn btn-primary"
                            disabled=move || {
                                phase.get() == FormPhase::Submitting
                                    || state.form_view.errors.with(|e| !e.is_empty())
                            }
                        >
                            {move || submit_label(phase.get())}
                        </button>
                    </form>
                </div>
            </div>
        </Show>
    }
}

#[component]
fn FieldError(state: AppState, field: Field) -> impl IntoView {
    move || {
        state
            .form_view
            .errors
            .with(|errors| errors.get(field).map(str::to_string))
            .map(|message| view! { <p class="field-error">{message}</p> })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_label() {
        assert_eq!(submit_label(FormPhase::Editing), "登録");
        assert_eq!(submit_label(FormPhase::UploadingFile), "登録");
        assert_eq!(submit_label(FormPhase::Submitting), "登録中...");
    }
}

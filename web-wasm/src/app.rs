//! メインアプリケーションコンポーネント

use crate::api::{FetchImageApi, ImgbbHost};
use crate::components::{
    header::Header,
    image_preview::ImagePreview,
    photo_gallery::PhotoGallery,
    status::{ErrorView, Loading},
    toast::{Toast, ToastSlot},
    upload_modal::UploadModal,
};
use gallery_common::{
    FieldErrors, FileMeta, FormPhase, Gallery, GalleryEvent, GallerySnapshot, Notification,
    PreviewOverlay, UploadForm,
};
use gloo::console;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use web_sys::{File, Url};

pub type WebGallery = Gallery<FetchImageApi>;

/// フォームの表示用状態（`UploadForm` の写し）
#[derive(Clone, Copy)]
pub struct FormView {
    pub phase: RwSignal<FormPhase>,
    pub errors: RwSignal<FieldErrors>,
    pub preview_url: RwSignal<Option<String>>,
    pub has_remote_url: RwSignal<bool>,
}

impl FormView {
    fn new() -> Self {
        Self {
            phase: RwSignal::new(FormPhase::Closed),
            errors: RwSignal::new(FieldErrors::default()),
            preview_url: RwSignal::new(None),
            has_remote_url: RwSignal::new(false),
        }
    }

    pub fn sync(&self, form: &UploadForm) {
        let draft = form.draft();
        self.phase.set(form.phase());
        self.errors.set(form.errors());
        self.preview_url
            .set(draft.and_then(|d| d.local_preview_url.clone()));
        self.has_remote_url
            .set(draft.map_or(false, |d| d.remote_url.is_some()));
    }
}

/// アプリケーションの状態
///
/// `Gallery` と `UploadForm` は `!Send` なのでローカルの `StoredValue` に置き、
/// 画面はシグナル経由で更新する。
#[derive(Clone, Copy)]
pub struct AppState {
    gallery: StoredValue<Rc<WebGallery>, LocalStorage>,
    host: StoredValue<Rc<ImgbbHost>, LocalStorage>,
    form: StoredValue<Rc<RefCell<UploadForm>>, LocalStorage>,
    pub snapshot: RwSignal<GallerySnapshot>,
    pub form_view: FormView,
    pub preview: RwSignal<PreviewOverlay>,
    pub toast: RwSignal<ToastSlot>,
}

impl AppState {
    pub fn new(gallery: Rc<WebGallery>, host: ImgbbHost) -> Self {
        let state = Self {
            snapshot: RwSignal::new(gallery.snapshot()),
            gallery: StoredValue::new_local(gallery.clone()),
            host: StoredValue::new_local(Rc::new(host)),
            form: StoredValue::new_local(Rc::new(RefCell::new(UploadForm::new()))),
            form_view: FormView::new(),
            preview: RwSignal::new(PreviewOverlay::default()),
            toast: RwSignal::new(ToastSlot::default()),
        };

        gallery.subscribe(move |event| match event {
            GalleryEvent::Changed(snapshot) => state.snapshot.set(snapshot.clone()),
            // 表示中なのですぐに先頭から取り直す
            GalleryEvent::Invalidated => state.load_first(),
        });

        state
    }

    pub fn load_first(self) {
        let gallery = self.gallery.get_value();
        spawn_local(async move {
            if let Err(e) = gallery.load_first().await {
                console::error!("一覧の取得に失敗しました:", e.to_string());
            }
        });
    }

    pub fn load_more(self) {
        let gallery = self.gallery.get_value();
        spawn_local(async move {
            if let Err(e) = gallery.load_more().await {
                console::error!("続きの取得に失敗しました:", e.to_string());
            }
        });
    }

    pub fn open_preview(self, image_url: String) {
        self.preview.update(|p| p.open(image_url));
    }

    pub fn close_preview(self) {
        self.preview.update(|p| p.close());
    }

    pub fn open_form(self) {
        self.with_form(|form| form.open());
    }

    pub fn close_form(self) {
        if let Some(url) = self.form_view.preview_url.get_untracked() {
            let _ = Url::revoke_object_url(&url);
        }
        self.with_form(|form| form.close());
    }

    pub fn set_title(self, title: String) {
        self.with_form(|form| {
            let _ = form.set_title(title);
        });
    }

    pub fn set_description(self, description: String) {
        self.with_form(|form| {
            let _ = form.set_description(description);
        });
    }

    /// ファイルを選択し、画像ホストへアップロードする
    pub fn attach_file(self, file: File) {
        if let Some(old) = self.form_view.preview_url.get_untracked() {
            let _ = Url::revoke_object_url(&old);
        }
        let meta = file_meta(file.name(), file.size(), file.type_());
        let preview_url = Url::create_object_url_with_blob(&file).ok();

        let form = self.form.get_value();
        let host = self.host.get_value();
        let view = self.form_view;
        spawn_local(async move {
            let task = gallery_common::upload::attach_file(&form, &*host, meta, preview_url, file);
            if let Err(e) = with_form_sync(&form, view, task).await {
                console::warn!("画像ホストへのアップロード:", e.to_string());
            }
        });
    }

    pub fn submit(self) {
        let form = self.form.get_value();
        let gallery = self.gallery.get_value();
        let view = self.form_view;
        spawn_local(async move {
            let task = gallery_common::upload::submit(&form, &gallery);
            let outcome = with_form_sync(&form, view, task).await;
            if let Some(notification) = outcome.notification() {
                self.notify(notification.clone());
            }
        });
    }

    /// 通知を表示し、表示時間が過ぎたら消す
    pub fn notify(self, notification: Notification) {
        let duration = notification.duration_ms;
        let id = self.toast.try_update(|slot| slot.show(notification));
        let Some(id) = id else {
            return;
        };
        Timeout::new(duration, move || {
            self.toast.update(|slot| {
                slot.expire(id);
            });
        })
        .forget();
    }

    pub fn dismiss_toast(self) {
        self.toast.update(|slot| slot.dismiss());
    }

    fn with_form(self, f: impl FnOnce(&mut UploadForm)) {
        let form = self.form.get_value();
        f(&mut form.borrow_mut());
        self.form_view.sync(&form.borrow());
    }
}

/// `task` が最初に待機した時点と完了後にフォームの表示を同期する
///
/// 送信中・アップロード中の状態を応答待ちの間も表示するため。
async fn with_form_sync<T>(
    form: &RefCell<UploadForm>,
    view: FormView,
    task: impl Future<Output = T>,
) -> T {
    let (output, ()) = futures::join!(task, async { view.sync(&form.borrow()) });
    view.sync(&form.borrow());
    output
}

/// `web_sys::File` の情報を検証用に変換
pub fn file_meta(name: String, size: f64, mime: String) -> FileMeta {
    FileMeta {
        name,
        size: size.max(0.0) as u64,
        mime,
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // 未指定なら同一オリジンの /api/images
    let api_url = option_env!("GALLERY_API_URL").unwrap_or_default();
    let gallery = Rc::new(Gallery::new(FetchImageApi::new(api_url)));
    let host = ImgbbHost::from_build_env();
    let host_warning =
        (!host.has_key()).then_some("画像ホストのAPIキーが未設定のため、画像を登録できません");

    let state = AppState::new(gallery, host);
    state.load_first();

    view! {
        <div class="container">
            <Header on_add=move |_| state.open_form() />

            {host_warning.map(|message| view! { <p class="text-muted">{message}</p> })}

            <Show when=move || state.snapshot.with(|s| s.is_loading_first())>
                <Loading />
            </Show>

            // 取得に失敗したら一覧の代わりにエラー表示
            <Show
                when=move || state.snapshot.with(|s| s.error().is_none())
                fallback=move || view! {
                    <ErrorView
                        message=Signal::derive(move || {
                            state.snapshot.with(|s| s.error().unwrap_or_default().to_string())
                        })
                        on_retry=move |_| {
                            if state.snapshot.with_untracked(|s| s.items.is_empty()) {
                                state.load_first()
                            } else {
                                state.load_more()
                            }
                        }
                    />
                }
            >
                <PhotoGallery state=state />

                <Show when=move || state.snapshot.with(|s| s.has_more)>
                    <div class="load-more">
                        <button
                            class="btn btn-secondary"
                            disabled=move || state.snapshot.with(|s| s.is_loading_more())
                            on:click=move |_| state.load_more()
                        >
                            {move || {
                                if state.snapshot.with(|s| s.is_loading_more()) {
                                    "読み込み中..."
                                } else {
                                    "さらに読み込む"
                                }
                            }}
                        </button>
                    </div>
                </Show>
            </Show>

            <ImagePreview state=state />
            <UploadModal state=state />
            <Toast state=state />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_meta_from_browser_file() {
        let meta = file_meta("sea.png".to_string(), 2048.0, "image/png".to_string());
        assert_eq!(meta.name, "sea.png");
        assert_eq!(meta.size, 2048);
        assert_eq!(meta.mime, "image/png");
    }

    #[test]
    fn test_file_meta_keeps_empty_mime() {
        // ブラウザが種類を判定できないファイルは type が空になる
        let meta = file_meta("unknown".to_string(), 10.0, String::new());
        assert_eq!(meta.mime, "");
    }
}

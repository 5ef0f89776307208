//! 画像ギャラリーコンポーネント

use crate::app::AppState;
use gallery_common::{GalleryStatus, Image};
use leptos::prelude::*;

#[component]
pub fn PhotoGallery(state: AppState) -> impl IntoView {
    view! {
        <Show
            when=move || state.snapshot.with(|s| !(s.items.is_empty() && s.status == GalleryStatus::Idle))
            fallback=|| view! { <p class="text-muted">"登録済みの画像はありません"</p> }
        >
            <div class="photo-gallery">
                <For
                    each=move || state.snapshot.with(|s| s.items.clone())
                    key=|image| image.id.clone()
                    children=move |image| view! { <PhotoCard image=image state=state /> }
                />
            </div>
        </Show>
    }
}

#[component]
fn PhotoCard(image: Image, state: AppState) -> impl IntoView {
    let url = image.url.clone();

    view! {
        <div class="photo-card" on:click=move |_| state.open_preview(url.clone())>
            <img src=image.url.clone() alt=image.title.clone() loading="lazy" />
            <div class="photo-info">
                <h4>{image.title.clone()}</h4>
                <p>{image.description.clone()}</p>
            </div>
        </div>
    }
}

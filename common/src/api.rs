//! 画像APIとの境界
//!
//! HTTPクライアントの実装はフロントエンドごとに異なる（CLI: reqwest、Web: fetch）。
//! ページング層とアップロード処理はこのトレイト越しにだけ通信する。

use crate::error::Result;
use crate::types::{Cursor, Image, NewImage, Page};
use serde::Deserialize;

/// 一覧・登録APIのパス
pub const IMAGES_PATH: &str = "/api/images";

/// 画像API (`GET /api/images`, `POST /api/images`)
#[allow(async_fn_in_trait)]
pub trait ImageApi {
    /// 1ページ取得。`cursor` が `None` なら先頭ページ
    async fn fetch_page(&self, cursor: Option<Cursor>) -> Result<Page>;

    /// 画像を登録
    async fn create_image(&self, new_image: &NewImage) -> Result<Image>;
}

/// 画像ファイルのアップロード先（外部の画像ホスト）
///
/// 成功時は公開URLを返す。`Payload` はフロントエンドが持っているファイル表現
/// （CLIならバイト列、Webなら `web_sys::File`）。
#[allow(async_fn_in_trait)]
pub trait ImageHost {
    type Payload;

    async fn upload(&self, payload: Self::Payload) -> Result<String>;
}

/// 一覧APIのURLを組み立てる
///
/// 先頭ページも `after=0` を付けて要求する。
pub fn images_url(base_url: &str, cursor: Option<Cursor>) -> String {
    let after = cursor.map(|c| c.0).unwrap_or(0);
    format!("{}{}?after={}", base_url.trim_end_matches('/'), IMAGES_PATH, after)
}

/// 登録APIのURL
pub fn create_image_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), IMAGES_PATH)
}

/// 画像ホストのアップロードURL（imgbb互換）
pub fn host_upload_url(host_url: &str, key: &str) -> String {
    format!("{}/1/upload?key={}", host_url.trim_end_matches('/'), key)
}

/// 画像ホストのレスポンス: `{ data: { url } }`
#[derive(Debug, Deserialize)]
pub struct HostUploadResponse {
    pub data: HostUploadData,
}

#[derive(Debug, Deserialize)]
pub struct HostUploadData {
    pub url: String,
}

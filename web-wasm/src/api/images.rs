//! 画像API (`/api/images`)

use super::{fetch_json, js_error};
use gallery_common::api::{create_image_url, images_url};
use gallery_common::{Cursor, Image, ImageApi, NewImage, Page, PageResponse, Result};
use wasm_bindgen::JsValue;
use web_sys::{Request, RequestInit, RequestMode};

/// 同一オリジンのAPIを呼ぶクライアント
#[derive(Clone, Default)]
pub struct FetchImageApi {
    base_url: String,
}

impl FetchImageApi {
    /// `base_url` が空なら相対パス（同一オリジン）で呼ぶ
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl ImageApi for FetchImageApi {
    async fn fetch_page(&self, cursor: Option<Cursor>) -> Result<Page> {
        let request = build_request("GET", &images_url(&self.base_url, cursor), None)?;
        let response: PageResponse = fetch_json(request).await?;
        Ok(response.into())
    }

    async fn create_image(&self, new_image: &NewImage) -> Result<Image> {
        let body = serde_json::to_string(new_image)?;
        let request = build_request("POST", &create_image_url(&self.base_url), Some(&body))?;
        fetch_json(request).await
    }
}

/// リクエストを組み立てる
///
/// `GALLERY_API_URL` で別オリジンを指すこともあるので常に CORS モード。
/// 同一オリジンへのリクエストはそのまま通る。
fn build_request(method: &str, url: &str, json_body: Option<&str>) -> Result<Request> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = json_body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(js_error)?;
    if json_body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;
    }
    Ok(request)
}

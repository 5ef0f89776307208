//! 画像ホスト（imgbb互換）へのアップロード

use super::{fetch_json, js_error};
use gallery_common::api::{host_upload_url, HostUploadResponse};
use gallery_common::{Error, ImageHost, Result};
use web_sys::{File, FormData, Request, RequestInit, RequestMode};

pub const DEFAULT_HOST_URL: &str = "https://api.imgbb.com";

/// ビルド時に `IMGBB_API_KEY` で埋め込むキー
const BUILD_HOST_KEY: Option<&str> = option_env!("IMGBB_API_KEY");

#[derive(Clone)]
pub struct ImgbbHost {
    host_url: String,
    key: Option<String>,
}

impl ImgbbHost {
    pub fn new(host_url: impl Into<String>, key: Option<String>) -> Self {
        Self {
            host_url: host_url.into(),
            key,
        }
    }

    pub fn from_build_env() -> Self {
        Self::new(DEFAULT_HOST_URL, BUILD_HOST_KEY.map(str::to_string))
    }

    pub fn has_key(&self) -> bool {
        self.key.as_deref().map_or(false, |k| !k.is_empty())
    }
}

impl ImageHost for ImgbbHost {
    type Payload = File;

    async fn upload(&self, file: File) -> Result<String> {
        let key = self
            .key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("画像ホストのAPIキーが設定されていません".to_string()))?;

        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob("image", &file).map_err(js_error)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&form);

        let request = Request::new_with_str_and_init(&host_upload_url(&self.host_url, key), &opts)
            .map_err(js_error)?;
        let response: HostUploadResponse = fetch_json(request).await?;
        Ok(response.data.url)
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_upload_without_key_is_config_error() {
        let bits = js_sys::Array::of1(&"GIF89a".into());
        let file = File::new_with_str_sequence(&bits, "a.gif").unwrap();

        let host = ImgbbHost::new(DEFAULT_HOST_URL, None);
        let result = host.upload(file).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}

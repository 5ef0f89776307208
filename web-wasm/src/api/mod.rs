//! ブラウザ側のAPIクライアント（fetch）

mod host;
mod images;

pub use host::ImgbbHost;
pub use images::FetchImageApi;

use gallery_common::{Error, Result};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, Response};

/// fetchを実行し、JSONレスポンスを読む
///
/// 2xx以外は本文をメッセージにして `Error::Http` にする。
pub(crate) async fn fetch_json<T: DeserializeOwned>(request: Request) -> Result<T> {
    let window = web_sys::window().ok_or_else(|| Error::Network("window がありません".to_string()))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();

    if !resp.ok() {
        return Err(Error::http(resp.status(), text));
    }

    Ok(serde_json::from_str(&text)?)
}

pub(crate) fn js_error(value: JsValue) -> Error {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value));
    Error::Network(message)
}

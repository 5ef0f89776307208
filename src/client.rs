//! 画像APIのHTTPクライアント（reqwest）
//!
//! ベースURLの設定のみ。リトライ・認証・インターセプタは無し。

use gallery_common::api::{create_image_url, images_url};
use gallery_common::{Cursor, Error, Image, ImageApi, NewImage, Page, PageResponse};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// 画像API (`/api/images`) クライアント
#[derive(Debug, Clone)]
pub struct HttpImageApi {
    client: Client,
    base_url: String,
}

impl HttpImageApi {
    pub fn new(base_url: impl Into<String>) -> crate::error::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gallery-rust/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl ImageApi for HttpImageApi {
    async fn fetch_page(&self, cursor: Option<Cursor>) -> gallery_common::Result<Page> {
        let url = images_url(&self.base_url, cursor);
        debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await.map_err(network_error)?;
        let page: PageResponse = read_json(response).await?;
        Ok(page.into())
    }

    async fn create_image(&self, new_image: &NewImage) -> gallery_common::Result<Image> {
        let url = create_image_url(&self.base_url);
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .json(new_image)
            .send()
            .await
            .map_err(network_error)?;
        read_json(response).await
    }
}

/// 2xx以外はHTTPエラー、本文はJSONとして読む
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> gallery_common::Result<T> {
    let status = response.status();
    let body = response.text().await.map_err(network_error)?;

    if !status.is_success() {
        return Err(Error::http(status.as_u16(), body));
    }

    Ok(serde_json::from_str(&body)?)
}

pub(crate) fn network_error(e: reqwest::Error) -> Error {
    Error::Network(e.to_string())
}

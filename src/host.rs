//! 画像ホスト（imgbb互換）へのアップロード
//!
//! 登録APIに渡すのは画像そのものではなく公開URLなので、
//! 登録前にここでファイルをアップロードしておく。

use crate::client::{network_error, read_json};
use base64::Engine;
use gallery_common::api::host_upload_url;
use gallery_common::{HostUploadResponse, ImageHost};
use reqwest::Client;
use tracing::debug;

pub struct ImgbbHost {
    client: Client,
    host_url: String,
    key: String,
}

impl ImgbbHost {
    pub fn new(host_url: impl Into<String>, key: impl Into<String>) -> crate::error::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gallery-rust/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            host_url: host_url.into(),
            key: key.into(),
        })
    }
}

impl ImageHost for ImgbbHost {
    type Payload = Vec<u8>;

    async fn upload(&self, payload: Vec<u8>) -> gallery_common::Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&payload);
        debug!(bytes = payload.len(), "画像ホストへ送信");

        let response = self
            .client
            .post(host_upload_url(&self.host_url, &self.key))
            .form(&[("image", encoded)])
            .send()
            .await
            .map_err(network_error)?;

        let uploaded: HostUploadResponse = read_json(response).await?;
        Ok(uploaded.data.url)
    }
}

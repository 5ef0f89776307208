use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("画像ホストのAPIキーが設定されていません。`gallery config --set-host-key YOUR_KEY` で設定するか、IMGBB_API_KEY を指定してください")]
    MissingHostKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("対話入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Common(#[from] gallery_common::Error),
}

pub type Result<T> = std::result::Result<T, GalleryError>;

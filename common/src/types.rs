//! ギャラリーの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Image: サーバー側で作成された画像
//! - Page / PageResponse: 一覧APIの1ページ分
//! - NewImage: 登録APIのリクエストボディ
//! - FileMeta: 選択されたファイルの情報（検証用）

use serde::{Deserialize, Serialize};
use std::fmt;

/// 登録済み画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,

    /// 作成日時（UNIXミリ秒）
    #[serde(default)]
    pub ts: i64,
}

/// ページカーソル（一覧APIの `after`）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(pub u64);

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 一覧APIのレスポンス: `{ data: Image[], after: number | null }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub data: Vec<Image>,
    #[serde(default)]
    pub after: Option<Cursor>,
}

/// 取得済みの1ページ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Image>,
    /// `None` なら次のページは存在しない
    pub next_cursor: Option<Cursor>,
}

impl From<PageResponse> for Page {
    /// `after` が `null` または `0` なら最後のページ
    fn from(response: PageResponse) -> Self {
        Self {
            items: response.data,
            next_cursor: response.after.filter(|cursor| cursor.0 != 0),
        }
    }
}

/// 登録APIのリクエストボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewImage {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// 選択されたファイルのメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileMeta {
    pub name: String,
    /// バイト数
    pub size: u64,
    /// MIMEタイプ（例: "image/png"）
    pub mime: String,
}

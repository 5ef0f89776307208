//! 画像ギャラリー CLI
//!
//! 共通ロジック（ページング・入力検証・登録フロー）は gallery_common にあり、
//! ここでは reqwest によるHTTPクライアントと端末向けの表示を持つ。

pub mod cli;
pub mod config;
pub mod error;
pub mod client;
pub mod host;
pub mod scanner;
pub mod listing;
pub mod upload;
pub mod browse;

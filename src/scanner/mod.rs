//! ローカル画像ファイルの読み込み
//!
//! 登録前の検証に使う `FileMeta`（サイズ・MIMEタイプ）を作る。
//! MIMEタイプは拡張子ではなくファイル先頭のバイト列から判定し、
//! 判定できない場合のみ拡張子を見る。

use crate::error::{GalleryError, Result};
use gallery_common::FileMeta;
use image::ImageFormat;
use std::path::Path;

const UNKNOWN_MIME: &str = "application/octet-stream";

/// 読み込んだ画像ファイル
#[derive(Debug, Clone)]
pub struct LocalImage {
    pub meta: FileMeta,
    pub bytes: Vec<u8>,
}

pub fn read_image_file(path: &Path) -> Result<LocalImage> {
    if !path.is_file() {
        return Err(GalleryError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let meta = FileMeta {
        name,
        size: bytes.len() as u64,
        mime: detect_mime(path, &bytes).to_string(),
    };

    Ok(LocalImage { meta, bytes })
}

/// バイト列（なければ拡張子）からMIMEタイプを判定
pub fn detect_mime(path: &Path, bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME)
}

//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use gallery_rust::error::GalleryError;
use gallery_rust::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないファイルを読み込んだ場合
#[test]
fn test_read_nonexistent_file() {
    let result = scanner::read_image_file(Path::new("/nonexistent/path/12345.png"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, GalleryError::FileNotFound(_)));
}

/// ディレクトリを指定した場合
#[test]
fn test_read_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::read_image_file(dir.path());
    assert!(matches!(result, Err(GalleryError::FileNotFound(_))));
}

/// GalleryErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        GalleryError::Config("テスト設定エラー".to_string()),
        GalleryError::FileNotFound("test.jpg".to_string()),
        GalleryError::MissingHostKey,
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// MissingHostKeyエラーのメッセージ確認
#[test]
fn test_missing_host_key_message() {
    let err = GalleryError::MissingHostKey;
    let display = format!("{}", err);

    assert!(display.contains("APIキー"));
    assert!(display.contains("gallery config"));
    assert!(display.contains("IMGBB_API_KEY"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: GalleryError = io_err.into();

    assert!(matches!(err, GalleryError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: GalleryError = json_err.into();

    assert!(matches!(err, GalleryError::JsonParse(_)));
}

/// gallery_common::Errorからの変換
#[test]
fn test_common_error_conversion() {
    let common_err = gallery_common::Error::http(404, "Not Found");
    let err: GalleryError = common_err.into();

    assert!(matches!(err, GalleryError::Common(_)));
}

/// エラーチェーン（透過的エラー）
#[test]
fn test_error_chain_transparent() {
    let common_err = gallery_common::Error::Network("connection refused".to_string());
    let err: GalleryError = common_err.into();

    // 透過的エラーなのでメッセージがそのまま表示される
    let display = format!("{}", err);
    assert_eq!(display, "通信エラー: connection refused");
}

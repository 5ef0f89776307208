//! 一覧表示
//!
//! `Gallery` で指定ページ数（または最後まで）取得し、連結した一覧を出力する。

use crate::error::Result;
use chrono::{DateTime, TimeZone, Utc};
use gallery_common::{Gallery, Image, ImageApi};
use std::fmt::Display;

/// `ts` がこの値以上ならマイクロ秒、未満ならミリ秒とみなす
const MICROS_THRESHOLD: i64 = 100_000_000_000_000;

/// 先頭から `max_pages` ページまで取得する（`None` なら最後まで）
///
/// 取得したページ数を返す。
pub async fn fetch_pages<A: ImageApi>(gallery: &Gallery<A>, max_pages: Option<usize>) -> Result<usize> {
    gallery.load_first().await?;

    while gallery.has_more() && max_pages.map_or(true, |max| gallery.page_count() < max) {
        if !gallery.load_more().await? {
            break;
        }
    }

    Ok(gallery.page_count())
}

/// 作成日時を表示用に整形
pub fn format_timestamp<Tz>(ts: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if ts <= 0 {
        return "-".to_string();
    }

    let millis = if ts >= MICROS_THRESHOLD { ts / 1000 } else { ts };
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(utc) => utc.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// 1件分の表示テキスト
pub fn format_image<Tz>(index: usize, image: &Image, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{:>3}. {} ({})\n     {}\n     {}",
        index + 1,
        image.title,
        format_timestamp(image.ts, tz),
        image.description,
        image.url
    )
}

pub fn print_images(images: &[Image]) {
    for (i, image) in images.iter().enumerate() {
        println!("{}", format_image(i, image, &chrono::Local));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(ts: i64) -> Image {
        Image {
            id: "1".to_string(),
            title: "海".to_string(),
            description: "夏の海".to_string(),
            url: "https://i.ibb.co/a.png".to_string(),
            ts,
        }
    }

    #[test]
    fn test_format_timestamp_millis() {
        assert_eq!(format_timestamp(1_620_000_000_000, &Utc), "2021-05-03 00:00");
    }

    #[test]
    fn test_format_timestamp_micros() {
        assert_eq!(format_timestamp(1_620_000_000_000_000, &Utc), "2021-05-03 00:00");
    }

    #[test]
    fn test_format_timestamp_missing() {
        assert_eq!(format_timestamp(0, &Utc), "-");
        assert_eq!(format_timestamp(-5, &Utc), "-");
    }

    #[test]
    fn test_format_image() {
        let text = format_image(0, &image(1_620_000_000_000), &Utc);
        assert!(text.starts_with("  1. 海 (2021-05-03 00:00)"));
        assert!(text.contains("夏の海"));
        assert!(text.contains("https://i.ibb.co/a.png"));
    }
}

//! 対話式ギャラリー閲覧
//!
//! 一覧から画像を選ぶとプレビューを開き、閉じると一覧に戻る。
//! 次のページがある間は「さらに読み込む」を表示する。

use crate::error::Result;
use crate::listing::format_timestamp;
use dialoguer::Select;
use gallery_common::{Gallery, Image, ImageApi, PreviewOverlay};

/// メニューの選択肢
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    /// 一覧の n 番目をプレビュー
    Preview(usize),
    /// 次のページを読み込む
    LoadMore,
    Quit,
}

/// 一覧から選択肢を作る
pub fn build_menu(items: &[Image], has_more: bool) -> Vec<(String, BrowseAction)> {
    let mut menu: Vec<(String, BrowseAction)> = items
        .iter()
        .enumerate()
        .map(|(i, image)| {
            (
                format!("{} - {}", image.title, image.description),
                BrowseAction::Preview(i),
            )
        })
        .collect();

    if has_more {
        menu.push(("▼ さらに読み込む".to_string(), BrowseAction::LoadMore));
    }
    menu.push(("終了".to_string(), BrowseAction::Quit));
    menu
}

/// プレビュー表示のテキスト
pub fn render_preview(image: &Image, overlay: &PreviewOverlay) -> Option<String> {
    let url = overlay.image_url()?;
    let link = overlay.original_link().unwrap_or(url);
    Some(format!(
        "🖼  {}\n   {}\n   作成: {}\n   画像: {}\n   元画像を開く → {}",
        image.title,
        image.description,
        format_timestamp(image.ts, &chrono::Local),
        url,
        link
    ))
}

pub async fn run_browse<A: ImageApi>(gallery: &Gallery<A>) -> Result<()> {
    gallery.load_first().await?;

    let mut overlay = PreviewOverlay::default();
    let mut cursor_pos = 0;

    loop {
        let items = gallery.items();
        if items.is_empty() {
            println!("登録済みの画像はありません");
            return Ok(());
        }

        let menu = build_menu(&items, gallery.has_more());
        let labels: Vec<&str> = menu.iter().map(|(label, _)| label.as_str()).collect();

        let selection = Select::new()
            .with_prompt(format!("画像を選択 ({}件)", items.len()))
            .items(&labels)
            .default(cursor_pos.min(labels.len() - 1))
            .interact()?;
        cursor_pos = selection;

        match menu[selection].1 {
            BrowseAction::Preview(index) => {
                let image = &items[index];
                overlay.open(image.url.clone());
                if let Some(text) = render_preview(image, &overlay) {
                    println!("\n{}\n", text);
                }

                Select::new()
                    .with_prompt("プレビュー")
                    .items(&["閉じる"])
                    .default(0)
                    .interact()?;
                overlay.close();
            }
            BrowseAction::LoadMore => {
                println!("読み込み中...");
                if let Err(e) = gallery.load_more().await {
                    eprintln!("✖ 読み込みに失敗しました: {}", e);
                }
            }
            BrowseAction::Quit => break,
        }
    }

    Ok(())
}

//! 取得済みページのキャッシュ
//!
//! ページは取得順に追記されるだけで、再取得・並べ替えはしない。
//! 無効化すると全ページを破棄し、世代番号を進める。

use crate::types::{Cursor, Image, Page};
use std::collections::HashSet;

/// キャッシュ済みページ（取得に使ったカーソル付き）
#[derive(Debug, Clone)]
struct CachedPage {
    cursor: Option<Cursor>,
    page: Page,
}

/// ページキャッシュ
#[derive(Debug, Clone, Default)]
pub struct PageCache {
    pages: Vec<CachedPage>,
    generation: u64,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得順のページ一覧
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().map(|p| &p.page)
    }

    /// カーソルに対応するキャッシュ済みページ
    pub fn get(&self, cursor: Option<Cursor>) -> Option<&Page> {
        self.pages
            .iter()
            .find(|p| p.cursor == cursor)
            .map(|p| &p.page)
    }

    /// ページを追記。既に同じカーソルで取得済みなら何もしない
    pub fn insert(&mut self, cursor: Option<Cursor>, page: Page) -> bool {
        if self.get(cursor).is_some() {
            return false;
        }
        self.pages.push(CachedPage { cursor, page });
        true
    }

    /// 全ページを破棄
    pub fn invalidate(&mut self) {
        self.pages.clear();
        self.generation += 1;
    }

    /// 無効化のたびに増える世代番号
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 全ページを取得順に連結した一覧（同じIDは最初の1件のみ）
    pub fn items(&self) -> Vec<Image> {
        let mut seen = HashSet::new();
        self.pages
            .iter()
            .flat_map(|p| p.page.items.iter())
            .filter(|image| seen.insert(image.id.as_str()))
            .cloned()
            .collect()
    }

    /// 最後に取得したページの次カーソル
    pub fn next_cursor(&self) -> Option<Cursor> {
        self.pages.last().and_then(|p| p.page.next_cursor)
    }

    /// 次のページがあるか（未取得なら false）
    pub fn has_more(&self) -> bool {
        self.next_cursor().is_some()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

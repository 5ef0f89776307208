//! 画像プレビュー（拡大表示）の状態
//!
//! Closed → Open（カード選択で表示するURLを記録）→ Closed（明示的に閉じる）

/// プレビューの状態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviewOverlay {
    #[default]
    Closed,
    Open { image_url: String },
}

impl PreviewOverlay {
    /// 画像を開く（開いている場合は表示URLを差し替える）
    pub fn open(&mut self, image_url: impl Into<String>) {
        *self = PreviewOverlay::Open {
            image_url: image_url.into(),
        };
    }

    pub fn close(&mut self) {
        *self = PreviewOverlay::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PreviewOverlay::Open { .. })
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            PreviewOverlay::Open { image_url } => Some(image_url),
            PreviewOverlay::Closed => None,
        }
    }

    /// 「元画像を開く」リンク先
    pub fn original_link(&self) -> Option<&str> {
        self.image_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_closed() {
        let overlay = PreviewOverlay::default();
        assert!(!overlay.is_open());
        assert_eq!(overlay.image_url(), None);
    }

    #[test]
    fn test_open_and_close() {
        let mut overlay = PreviewOverlay::default();
        overlay.open("https://i.ibb.co/a.png");
        assert!(overlay.is_open());
        assert_eq!(overlay.image_url(), Some("https://i.ibb.co/a.png"));
        assert_eq!(overlay.original_link(), Some("https://i.ibb.co/a.png"));

        overlay.close();
        assert_eq!(overlay, PreviewOverlay::Closed);
    }

    #[test]
    fn test_open_replaces_url() {
        let mut overlay = PreviewOverlay::default();
        overlay.open("a");
        overlay.open("b");
        assert_eq!(overlay.image_url(), Some("b"));
    }
}

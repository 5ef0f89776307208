//! ユーザー向け通知（トースト）

/// 通知の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Success,
    Error,
    Info,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Success => "success",
            NotificationStatus::Error => "error",
            NotificationStatus::Info => "info",
        }
    }
}

/// 表示時間の既定値（ミリ秒）
pub const DEFAULT_DURATION_MS: u32 = 6000;

/// 通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub status: NotificationStatus,
    pub title: String,
    pub description: String,
    pub duration_ms: u32,
}

impl Notification {
    pub fn new(status: NotificationStatus, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            description: description.into(),
            duration_ms: DEFAULT_DURATION_MS,
        }
    }

    /// 画像ホストへのアップロードが終わる前に登録しようとした
    pub fn image_not_added() -> Self {
        Self::new(
            NotificationStatus::Error,
            "画像が追加されていません",
            "登録する前に画像を追加し、アップロードの完了を待ってください。",
        )
    }

    pub fn image_created() -> Self {
        Self::new(
            NotificationStatus::Success,
            "画像を登録しました",
            "画像の登録が完了しました",
        )
    }

    pub fn submit_failed(detail: impl Into<String>) -> Self {
        Self::new(NotificationStatus::Error, "登録に失敗しました", detail)
    }

    pub fn is_error(&self) -> bool {
        self.status == NotificationStatus::Error
    }
}

//! 画像登録（CLI）
//!
//! フォームと同じ手順で登録する: 入力検証 → 画像ホストへアップロード → 登録API。
//! 画像ホストへのアップロードに失敗した場合も送信処理は行い、
//! 「画像が追加されていません」の通知で終わる（登録APIは呼ばない）。

use crate::scanner::LocalImage;
use gallery_common::upload::{attach_file, submit};
use gallery_common::{
    Error, Field, Gallery, ImageApi, ImageHost, Notification, NotificationStatus, SubmitOutcome,
    UploadForm,
};
use std::cell::RefCell;

/// 入力内容
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub image: LocalImage,
}

pub async fn run_upload<A, H>(gallery: &Gallery<A>, host: &H, request: UploadRequest) -> SubmitOutcome
where
    A: ImageApi,
    H: ImageHost<Payload = Vec<u8>>,
{
    let form = RefCell::new(UploadForm::new());
    {
        let mut form = form.borrow_mut();
        form.open();
        // 入力時の検証結果は送信時にまとめて表示する
        let _ = form.set_title(request.title);
        let _ = form.set_description(request.description);
    }

    let LocalImage { meta, bytes } = request.image;
    match attach_file(&form, host, meta, None, bytes).await {
        Ok(url) => println!("✔ 画像ホストへアップロード: {}", url),
        Err(Error::Validation(_)) => {}
        Err(e) => eprintln!("✖ 画像ホストへのアップロードに失敗: {}", e),
    }

    submit(&form, gallery).await
}

/// 結果を表示する。登録できた場合は true
pub fn report_outcome(outcome: &SubmitOutcome) -> bool {
    match outcome {
        SubmitOutcome::Invalid(errors) => {
            eprintln!("✖ 入力内容に誤りがあります");
            for field in Field::ALL {
                if let Some(message) = errors.get(field) {
                    eprintln!("  - {}: {}", field_label(field), message);
                }
            }
            false
        }
        SubmitOutcome::Created { image, notification } => {
            print_notification(notification);
            println!("  ID: {}", image.id);
            println!("  URL: {}", image.url);
            true
        }
        SubmitOutcome::Rejected(notification) | SubmitOutcome::Failed(notification) => {
            print_notification(notification);
            false
        }
        SubmitOutcome::Ignored => false,
    }
}

pub fn field_label(field: Field) -> &'static str {
    match field {
        Field::Image => "画像",
        Field::Title => "タイトル",
        Field::Description => "説明",
    }
}

fn print_notification(notification: &Notification) {
    let mark = match notification.status {
        NotificationStatus::Success => "✅",
        NotificationStatus::Error => "✖",
        NotificationStatus::Info => "ℹ",
    };
    let line = format!("{} {}: {}", mark, notification.title, notification.description);
    if notification.is_error() {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

//! 画像登録フォームのライフサイクル
//!
//! モーダルを開くと下書き（`UploadDraft`）を作り、閉じるか登録に成功すると破棄する。
//! ファイルは選択時に画像ホストへ先にアップロードし、その公開URLで登録する。
//!
//! 登録の流れ:
//! 1. 入力検証（エラーがあれば送信しない）
//! 2. 画像ホストのURLが無ければ通知して終了（APIは呼ばない）
//! 3. `POST /api/images`
//! 4. 成功: フォームをリセットしてモーダルを閉じ、ギャラリーを無効化して通知
//!    失敗: エラーを通知し、入力内容はそのまま残す

use crate::api::{ImageApi, ImageHost};
use crate::error::{Error, Result};
use crate::notify::Notification;
use crate::query::Gallery;
use crate::types::{FileMeta, Image, NewImage};
use crate::validation::{Field, FieldErrors, FieldValue, Validator};
use std::cell::RefCell;
use tracing::{debug, warn};

/// 入力途中の内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    pub title: String,
    pub description: String,
    pub file: Option<FileMeta>,
    /// ブラウザ内プレビュー用のURL
    pub local_preview_url: Option<String>,
    /// 画像ホストにアップロード済みの公開URL
    pub remote_url: Option<String>,
    pub errors: FieldErrors,
}

impl UploadDraft {
    fn value_of(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Image => FieldValue::File(self.file.as_ref()),
            Field::Title => FieldValue::Text(&self.title),
            Field::Description => FieldValue::Text(&self.description),
        }
    }
}

/// フォームの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Closed,
    Editing,
    /// 画像ホストへアップロード中
    UploadingFile,
    /// 登録APIの応答待ち
    Submitting,
}

/// 選択されたファイルの識別子（古いアップロード結果を捨てるため）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileToken(u64);

/// 送信時の下書きの識別子
///
/// 応答待ちの間にモーダルを閉じて新しい下書きを始めた場合、
/// 古い送信の結果でその下書きを閉じたり書き換えたりしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitToken(u64);

/// `submit` の判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    /// 入力エラーあり
    Invalid(FieldErrors),
    /// 画像URLが無いため送信しない
    Rejected(Notification),
    /// この内容で登録APIを呼ぶ
    Post(NewImage, SubmitToken),
    /// 閉じている、または送信中
    Ignored,
}

/// 登録処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid(FieldErrors),
    Rejected(Notification),
    Created { image: Image, notification: Notification },
    Failed(Notification),
    Ignored,
}

impl SubmitOutcome {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            SubmitOutcome::Rejected(n) | SubmitOutcome::Failed(n) => Some(n),
            SubmitOutcome::Created { notification, .. } => Some(notification),
            SubmitOutcome::Invalid(_) | SubmitOutcome::Ignored => None,
        }
    }
}

/// 画像登録フォーム
#[derive(Debug)]
pub struct UploadForm {
    validator: Validator,
    phase: FormPhase,
    draft: Option<UploadDraft>,
    file_seq: u64,
    draft_seq: u64,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadForm {
    pub fn new() -> Self {
        Self::with_validator(Validator::upload_form())
    }

    pub fn with_validator(validator: Validator) -> Self {
        Self {
            validator,
            phase: FormPhase::Closed,
            draft: None,
            file_seq: 0,
            draft_seq: 0,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn draft(&self) -> Option<&UploadDraft> {
        self.draft.as_ref()
    }

    pub fn errors(&self) -> FieldErrors {
        self.draft
            .as_ref()
            .map(|d| d.errors.clone())
            .unwrap_or_default()
    }

    /// モーダルを開いて空の下書きを作る
    pub fn open(&mut self) {
        if self.is_open() {
            return;
        }
        self.phase = FormPhase::Editing;
        self.draft = Some(UploadDraft::default());
        self.draft_seq += 1;
    }

    /// モーダルを閉じて下書きを破棄する
    pub fn close(&mut self) {
        self.phase = FormPhase::Closed;
        self.draft = None;
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> std::result::Result<(), String> {
        self.set_text(Field::Title, title.into())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> std::result::Result<(), String> {
        self.set_text(Field::Description, description.into())
    }

    fn set_text(&mut self, field: Field, text: String) -> std::result::Result<(), String> {
        let Some(draft) = self.draft.as_mut() else {
            return Ok(());
        };
        match field {
            Field::Title => draft.title = text,
            Field::Description => draft.description = text,
            Field::Image => {}
        }
        Self::revalidate(&self.validator, draft, field)
    }

    /// ファイルを選択する
    ///
    /// 以前の公開URLは破棄する。ファイルが検証を通れば画像ホストへの
    /// アップロード待ちになり、トークンを返す。
    pub fn select_file(
        &mut self,
        file: FileMeta,
        local_preview_url: Option<String>,
    ) -> std::result::Result<FileToken, String> {
        let Some(draft) = self.draft.as_mut() else {
            return Err("フォームが開かれていません".to_string());
        };
        draft.file = Some(file);
        draft.local_preview_url = local_preview_url;
        draft.remote_url = None;
        self.file_seq += 1;

        Self::revalidate(&self.validator, draft, Field::Image)?;
        if self.phase == FormPhase::Editing {
            self.phase = FormPhase::UploadingFile;
        }
        Ok(FileToken(self.file_seq))
    }

    /// 画像ホストへのアップロード完了。古いトークンの結果は無視する
    pub fn set_remote_url(&mut self, token: FileToken, url: impl Into<String>) -> bool {
        if token.0 != self.file_seq {
            return false;
        }
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        draft.remote_url = Some(url.into());
        if self.phase == FormPhase::UploadingFile {
            self.phase = FormPhase::Editing;
        }
        true
    }

    /// 画像ホストへのアップロード失敗
    pub fn file_upload_failed(&mut self, token: FileToken, message: impl Into<String>) {
        if token.0 != self.file_seq {
            return;
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.remote_url = None;
            draft.errors.insert(Field::Image, message.into());
        }
        if self.phase == FormPhase::UploadingFile {
            self.phase = FormPhase::Editing;
        }
    }

    /// 送信可否を判定する。`Post` を返した場合は送信中になる
    pub fn submit(&mut self) -> SubmitAction {
        if matches!(self.phase, FormPhase::Closed | FormPhase::Submitting) {
            return SubmitAction::Ignored;
        }
        let Some(draft) = self.draft.as_mut() else {
            return SubmitAction::Ignored;
        };

        let errors = self.validator.validate_all(|field| draft.value_of(field));
        if !errors.is_empty() {
            draft.errors = errors.clone();
            return SubmitAction::Invalid(errors);
        }
        draft.errors.clear();

        let Some(url) = draft.remote_url.clone() else {
            return SubmitAction::Rejected(Notification::image_not_added());
        };

        let new_image = NewImage {
            title: draft.title.clone(),
            description: draft.description.clone(),
            url,
        };
        self.phase = FormPhase::Submitting;
        SubmitAction::Post(new_image, SubmitToken(self.draft_seq))
    }

    /// 登録成功: リセットしてモーダルを閉じる
    ///
    /// 送信後に別の下書きが始まっていればそのまま残す。
    pub fn on_post_success(&mut self, token: SubmitToken) -> Notification {
        if self.is_current(token) {
            self.close();
        }
        Notification::image_created()
    }

    /// 登録失敗: 入力内容は残して編集に戻る
    pub fn on_post_failure(&mut self, token: SubmitToken, error: &Error) -> Notification {
        if self.is_current(token) && self.phase == FormPhase::Submitting {
            self.phase = FormPhase::Editing;
        }
        Notification::submit_failed(error.to_string())
    }

    fn is_current(&self, token: SubmitToken) -> bool {
        self.draft.is_some() && token.0 == self.draft_seq
    }

    fn revalidate(
        validator: &Validator,
        draft: &mut UploadDraft,
        field: Field,
    ) -> std::result::Result<(), String> {
        match validator.validate_field(field, &draft.value_of(field)) {
            Ok(()) => {
                draft.errors.remove(field);
                Ok(())
            }
            Err(message) => {
                draft.errors.insert(field, message.clone());
                Err(message)
            }
        }
    }
}

/// ファイルを選択して画像ホストへアップロードする
///
/// 成功すると下書きに公開URLを設定して返す。
pub async fn attach_file<H: ImageHost>(
    form: &RefCell<UploadForm>,
    host: &H,
    file: FileMeta,
    local_preview_url: Option<String>,
    payload: H::Payload,
) -> Result<String> {
    let name = file.name.clone();
    let token = form
        .borrow_mut()
        .select_file(file, local_preview_url)
        .map_err(|message| {
            let mut errors = FieldErrors::default();
            errors.insert(Field::Image, message);
            Error::Validation(errors)
        })?;

    debug!(file = %name, "画像ホストへアップロード開始");
    match host.upload(payload).await {
        Ok(url) => {
            debug!(file = %name, url = %url, "画像ホストへアップロード完了");
            form.borrow_mut().set_remote_url(token, url.clone());
            Ok(url)
        }
        Err(e) => {
            warn!(file = %name, error = %e, "画像ホストへのアップロード失敗");
            form.borrow_mut()
                .file_upload_failed(token, "画像のアップロードに失敗しました");
            Err(e)
        }
    }
}

/// フォームを送信する
///
/// 成功時はギャラリーのキャッシュを1回だけ無効化する。
pub async fn submit<A: ImageApi>(form: &RefCell<UploadForm>, gallery: &Gallery<A>) -> SubmitOutcome {
    let action = form.borrow_mut().submit();
    let (new_image, token) = match action {
        SubmitAction::Post(new_image, token) => (new_image, token),
        SubmitAction::Invalid(errors) => return SubmitOutcome::Invalid(errors),
        SubmitAction::Rejected(notification) => return SubmitOutcome::Rejected(notification),
        SubmitAction::Ignored => return SubmitOutcome::Ignored,
    };

    debug!(title = %new_image.title, "画像を登録");
    match gallery.api().create_image(&new_image).await {
        Ok(image) => {
            let notification = form.borrow_mut().on_post_success(token);
            gallery.invalidate();
            SubmitOutcome::Created { image, notification }
        }
        Err(e) => {
            warn!(error = %e, "画像の登録に失敗");
            let notification = form.borrow_mut().on_post_failure(token, &e);
            SubmitOutcome::Failed(notification)
        }
    }
}

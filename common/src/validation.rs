//! アップロードフォームの入力検証
//!
//! フィールド名 → 検証ルール列 のマップ（`Validator`）を明示的に持ち、
//! 入力変更時は `validate_field`、送信時は `validate_all` を呼ぶ。
//! 各フィールドは先頭から順にルールを評価し、最初のエラーだけを返す。

use crate::types::FileMeta;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// ファイルサイズ上限（この値未満のみ許可）
pub const MAX_FILE_SIZE: u64 = 10_000_000;
pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 20;
pub const DESCRIPTION_MAX_CHARS: usize = 65;

/// 受け付けるMIMEタイプ
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

lazy_static::lazy_static! {
    static ref IMAGE_MIME_RE: Regex = Regex::new(r"(?i)^image/(jpeg|png|gif)$").unwrap();
}

/// フォームのフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Image,
    Title,
    Description,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Image, Field::Title, Field::Description];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Image => "image",
            Field::Title => "title",
            Field::Description => "description",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 検証対象の値
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    File(Option<&'a FileMeta>),
    Text(&'a str),
}

/// フィールドごとのエラーメッセージ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: Field, message: String) {
        self.0.insert(field, message);
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

type Check = Box<dyn Fn(&FieldValue<'_>) -> Result<(), String>>;

/// 検証ルール（名前付きの検証関数）
pub struct Rule {
    pub name: &'static str,
    check: Check,
}

impl Rule {
    pub fn new(
        name: &'static str,
        check: impl Fn(&FieldValue<'_>) -> Result<(), String> + 'static,
    ) -> Self {
        Self {
            name,
            check: Box::new(check),
        }
    }

    /// 必須（ファイル未選択・空白のみの文字列はエラー）
    pub fn required(message: &'static str) -> Self {
        Self::new("required", move |value| {
            let present = match value {
                FieldValue::File(file) => file.is_some(),
                FieldValue::Text(text) => !text.trim().is_empty(),
            };
            if present {
                Ok(())
            } else {
                Err(message.to_string())
            }
        })
    }

    /// 最小文字数
    pub fn min_chars(min: usize, message: &'static str) -> Self {
        Self::new("minLength", move |value| match value {
            FieldValue::Text(text) if text.chars().count() < min => Err(message.to_string()),
            _ => Ok(()),
        })
    }

    /// 最大文字数
    pub fn max_chars(max: usize, message: &'static str) -> Self {
        Self::new("maxLength", move |value| match value {
            FieldValue::Text(text) if text.chars().count() > max => Err(message.to_string()),
            _ => Ok(()),
        })
    }

    /// ファイルサイズが `limit` バイト未満
    pub fn file_size_below(limit: u64, message: &'static str) -> Self {
        Self::new("size", move |value| match value {
            FieldValue::File(Some(file)) if file.size >= limit => Err(message.to_string()),
            _ => Ok(()),
        })
    }

    /// MIMEタイプが JPEG / PNG / GIF
    pub fn image_type(message: &'static str) -> Self {
        Self::new("type", move |value| match value {
            FieldValue::File(Some(file)) if !is_accepted_mime(&file.mime) => {
                Err(message.to_string())
            }
            _ => Ok(()),
        })
    }

    pub fn check(&self, value: &FieldValue<'_>) -> Result<(), String> {
        (self.check)(value)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// 受け付けるMIMEタイプか（大文字小文字は区別しない）
pub fn is_accepted_mime(mime: &str) -> bool {
    IMAGE_MIME_RE.is_match(mime.trim())
}

/// フィールド → ルール列 のマップ
#[derive(Debug, Default)]
pub struct Validator {
    rules: BTreeMap<Field, Vec<Rule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 画像登録フォームの標準ルール
    pub fn upload_form() -> Self {
        let mut validator = Self::new();
        validator.register(
            Field::Image,
            vec![
                Rule::required("ファイルは必須です"),
                Rule::file_size_below(MAX_FILE_SIZE, "ファイルは10MB未満にしてください"),
                Rule::image_type("PNG、JPEG、GIFのみ対応しています"),
            ],
        );
        validator.register(
            Field::Title,
            vec![
                Rule::required("タイトルは必須です"),
                Rule::min_chars(TITLE_MIN_CHARS, "2文字以上で入力してください"),
                Rule::max_chars(TITLE_MAX_CHARS, "20文字以内で入力してください"),
            ],
        );
        validator.register(
            Field::Description,
            vec![
                Rule::required("説明は必須です"),
                Rule::max_chars(DESCRIPTION_MAX_CHARS, "65文字以内で入力してください"),
            ],
        );
        validator
    }

    /// ルールを登録（既存のルールの後ろに追加）
    pub fn register(&mut self, field: Field, rules: Vec<Rule>) {
        self.rules.entry(field).or_default().extend(rules);
    }

    pub fn rules(&self, field: Field) -> &[Rule] {
        self.rules.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 1フィールドを検証（最初に失敗したルールのメッセージを返す）
    pub fn validate_field(&self, field: Field, value: &FieldValue<'_>) -> Result<(), String> {
        self.rules(field).iter().try_for_each(|rule| rule.check(value))
    }

    /// 登録済みの全フィールドを検証
    pub fn validate_all<'a>(&self, value_of: impl Fn(Field) -> FieldValue<'a>) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for field in self.rules.keys() {
            if let Err(message) = self.validate_field(*field, &value_of(*field)) {
                errors.insert(*field, message);
            }
        }
        errors
    }
}

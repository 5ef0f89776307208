//! Image Gallery Common Library
//!
//! CLIとWeb(WASM)で共有される型・ページング・入力検証

pub mod types;
pub mod error;
pub mod api;
pub mod cache;
pub mod query;
pub mod validation;
pub mod upload;
pub mod preview;
pub mod notify;

pub use types::{Cursor, FileMeta, Image, NewImage, Page, PageResponse};
pub use error::{Error, Result};
pub use api::{ImageApi, ImageHost, HostUploadResponse};
pub use cache::PageCache;
pub use query::{Gallery, GalleryEvent, GallerySnapshot, GalleryStatus, SubscriptionId};
pub use validation::{Field, FieldErrors, FieldValue, Rule, Validator};
pub use upload::{FileToken, FormPhase, SubmitAction, SubmitOutcome, SubmitToken, UploadDraft, UploadForm};
pub use preview::PreviewOverlay;
pub use notify::{Notification, NotificationStatus};

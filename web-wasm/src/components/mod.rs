pub mod header;
pub mod image_preview;
pub mod photo_gallery;
pub mod status;
pub mod toast;
pub mod upload_area;
pub mod upload_modal;

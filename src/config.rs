use crate::error::{GalleryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_IMAGE_HOST_URL: &str = "https://api.imgbb.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 画像APIのベースURL（`/api/images` の手前まで）
    pub api_base_url: String,
    /// 画像ホスト（imgbb互換）のURL
    pub image_host_url: String,
    pub image_host_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            image_host_url: DEFAULT_IMAGE_HOST_URL.into(),
            image_host_key: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| GalleryError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("image-gallery").join("config.json"))
    }

    /// APIのベースURL（環境変数を優先）
    pub fn api_base_url(&self) -> String {
        match std::env::var("GALLERY_API_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.api_base_url.clone(),
        }
    }

    /// 画像ホストのAPIキー（環境変数を優先）
    pub fn get_host_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("IMGBB_API_KEY") {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }

        self.image_host_key.clone().ok_or(GalleryError::MissingHostKey)
    }

    pub fn set_api_base_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(GalleryError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.api_base_url = url;
        Ok(())
    }

    pub fn set_host_key(&mut self, key: String) {
        self.image_host_key = Some(key);
    }
}

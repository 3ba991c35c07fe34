use std::path::Path;
use std::time::Duration;
use anyhow::Context;
use serde::Deserialize;
use crate::upload::MediaType;

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// 各媒体类型的大小上限（字节）
#[derive(Debug, Clone, Deserialize)]
pub struct SizeLimits {
    #[serde(default = "SizeLimits::default_text")]
    pub text: u64,
    #[serde(default = "SizeLimits::default_image")]
    pub image: u64,
    #[serde(default = "SizeLimits::default_audio")]
    pub audio: u64,
    #[serde(default = "SizeLimits::default_video")]
    pub video: u64,
    #[serde(default = "SizeLimits::default_document")]
    pub document: u64,
}

impl SizeLimits {
    fn default_text() -> u64 { 200 * KB }
    fn default_image() -> u64 { 10 * MB }
    fn default_audio() -> u64 { 25 * MB }
    fn default_video() -> u64 { 100 * MB }
    fn default_document() -> u64 { 10 * MB }

    pub fn limit_for(&self, media_type: MediaType) -> u64 {
        match media_type {
            MediaType::Text => self.text,
            MediaType::Image => self.image,
            MediaType::Audio => self.audio,
            MediaType::Video => self.video,
            MediaType::Document => self.document,
        }
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            text: Self::default_text(),
            image: Self::default_image(),
            audio: Self::default_audio(),
            video: Self::default_video(),
            document: Self::default_document(),
        }
    }
}

/// 上传部署配置
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// 分片大小（字节）
    #[serde(default = "UploadConfig::default_chunk_size")]
    pub chunk_size: usize,
    /// 单次请求超时（秒）
    #[serde(default = "UploadConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub limits: SizeLimits,
}

impl UploadConfig {
    fn default_chunk_size() -> usize { 1024 * 1024 } // 1MiB
    fn default_timeout_secs() -> u64 { 30 }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: UploadConfig = toml::from_str(&config_str)
            .with_context(|| format!("Can't parse config file: {}", path.display()))?;

        Ok(config)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: Self::default_chunk_size(),
            timeout_secs: Self::default_timeout_secs(),
            limits: SizeLimits::default(),
        }
    }
}

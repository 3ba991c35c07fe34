use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;
use super::errors::{Result, UploadError};

/// 上传会话唯一标识（服务端用它聚合分片）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct UploadId(pub Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UploadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 远端记录 ID，finalize 成功后由服务端返回
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordId(pub String);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 本地记录 ID，离线保存时生成，形式上与远端 ID 区分开
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalRecordId(pub String);

impl LocalRecordId {
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("local-{}", &hex[..12]))
    }
}

impl std::fmt::Display for LocalRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 媒体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Text,
    Image,
    Audio,
    Video,
    Document,
}

impl MediaType {
    /// 接口里的小写形式
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Text => "text",
            MediaType::Image => "image",
            MediaType::Audio => "audio",
            MediaType::Video => "video",
            MediaType::Document => "document",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 支持的语言，未知名称直接报错，不静默回退
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
    Telugu,
    Tamil,
    Kannada,
    Bengali,
    Marathi,
    Gujarati,
    Malayalam,
    Punjabi,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Telugu => "telugu",
            Language::Tamil => "tamil",
            Language::Kannada => "kannada",
            Language::Bengali => "bengali",
            Language::Marathi => "marathi",
            Language::Gujarati => "gujarati",
            Language::Malayalam => "malayalam",
            Language::Punjabi => "punjabi",
        }
    }

    /// 大小写不敏感的名称映射
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "english" => Ok(Language::English),
            "hindi" => Ok(Language::Hindi),
            "telugu" => Ok(Language::Telugu),
            "tamil" => Ok(Language::Tamil),
            "kannada" => Ok(Language::Kannada),
            "bengali" => Ok(Language::Bengali),
            "marathi" => Ok(Language::Marathi),
            "gujarati" => Ok(Language::Gujarati),
            "malayalam" => Ok(Language::Malayalam),
            "punjabi" => Ok(Language::Punjabi),
            other => Err(UploadError::UnknownLanguage(other.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 公开/私有，映射到服务端的 release_rights 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn release_rights(&self) -> &'static str {
        match self {
            Visibility::Public => "creator",
            Visibility::Private => "private",
        }
    }
}

/// 投稿元数据，由调用方提供
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordMetadata {
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub media_type: MediaType,
    pub language: Language,
    pub visibility: Visibility,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl RecordMetadata {
    /// 必填字段检查，在任何网络调用之前执行
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(UploadError::MissingField("title"));
        }
        if self.category_id.trim().is_empty() {
            return Err(UploadError::MissingField("category_id"));
        }
        Ok(())
    }
}

/// 一次分片上传的会话参数，创建后不再变化
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub upload_id: UploadId,
    pub filename: String,
    pub total_size: u64,
    pub chunk_size: usize,
    pub total_chunks: usize,
}

impl UploadSession {
    pub fn new(filename: impl Into<String>, total_size: u64, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(UploadError::ParamError("chunk_size must be > 0".to_string()));
        }
        if total_size == 0 {
            return Err(UploadError::MissingField("content"));
        }
        let total_chunks = total_size.div_ceil(chunk_size as u64) as usize;

        Ok(Self {
            upload_id: UploadId::new(),
            filename: filename.into(),
            total_size,
            chunk_size,
            total_chunks,
        })
    }
}

/// 调用方显式传入的会话上下文，替代全局的 token/用户状态
#[derive(Debug, Clone)]
pub struct UploadContext {
    pub base_url: Url,
    pub auth_token: String,
    pub user_id: String,
    /// 显式离线模式：跳过网络直接走本地保存
    pub offline: bool,
}

impl UploadContext {
    pub fn new(base_url: &str, auth_token: impl Into<String>, user_id: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|_| UploadError::ParamError(format!("Invalid url: {:?}", base_url)))?;

        Ok(Self {
            base_url,
            auth_token: auth_token.into(),
            user_id: user_id.into(),
            offline: false,
        })
    }

    pub fn offline_mode(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

/// 上传结果：远端记录或离线记录，调用方可以区分
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Remote(RecordId),
    Offline(LocalRecordId),
}

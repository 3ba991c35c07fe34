use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File too large: {size_mb:.1}MB. Maximum allowed: {limit_mb:.1}MB")]
    FileTooLarge {
        size_mb: f64,
        limit_mb: f64,
    },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server rejected request: status code {status_code}, message: {message}")]
    Rejected {
        status_code: u16,
        message: String,
    },

    #[error("Finalize failed, uploaded chunks may be orphaned: {source}")]
    Finalize {
        #[source]
        source: Box<UploadError>,
    },

    #[error("Offline save failed: {0}")]
    LocalIo(#[from] std::io::Error),

    #[error("Param error: {0}")]
    ParamError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UploadError {
    pub fn server_error(status_code: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status_code,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn finalize(source: UploadError) -> Self {
        Self::Finalize {
            source: Box::new(source),
        }
    }

    /// 连接层失败，允许降级到离线保存
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// 连接、超时、读响应体的失败映射为 Transport；
// 响应体解码失败说明服务端可达但回了坏数据，归为 Internal，
// 不触发离线降级。服务端的拒绝在状态码检查里单独映射为 Rejected
impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Internal(format!("invalid response body: {}", err))
        } else if err.is_timeout() {
            Self::Transport(format!("request timed out: {}", err))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Error alias
pub type Result<T, E = UploadError> = std::result::Result<T, E>;

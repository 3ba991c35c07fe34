use crate::config::SizeLimits;
use super::errors::{Result, UploadError};
use super::types::MediaType;

/// 按媒体类型校验负载大小，在任何切分和网络 IO 之前执行
#[derive(Debug, Clone)]
pub struct SizeValidator {
    limits: SizeLimits,
}

impl SizeValidator {
    pub fn new(limits: SizeLimits) -> Self {
        Self { limits }
    }

    pub fn validate(&self, payload_size: u64, media_type: MediaType) -> Result<()> {
        let limit = self.limits.limit_for(media_type);
        if payload_size > limit {
            return Err(UploadError::FileTooLarge {
                size_mb: payload_size as f64 / (1024.0 * 1024.0),
                limit_mb: limit as f64 / (1024.0 * 1024.0),
            });
        }

        Ok(())
    }
}

use bytes::Bytes;
use tracing::{debug, info, warn};
use crate::config::UploadConfig;
use super::errors::{Result, UploadError};
use super::offline::{LocalStore, OfflineFallback};
use super::splitter::ChunkSplitter;
use super::store::RecordStore;
use super::types::{RecordMetadata, UploadContext, UploadOutcome, UploadSession};
use super::validate::SizeValidator;

/// 上传编排：校验 → 切分 → 逐片上传 → finalize。
///
/// 状态机：
/// ```text
/// VALIDATING -> SPLITTING -> UPLOADING(i) -> FINALIZING -> SUCCEEDED
///     |                          |               |
///     v                          v               v
///  REJECTED              OFFLINE_FALLBACK      FAILED
/// ```
/// 分片按序号升序逐个同步发送，第一个失败就中止整次上传。
/// 传输层失败降级为离线保存（用原始未切分的负载，已发出的
/// 分片被放弃）；服务端的拒绝原样上报，不降级也不重试。
pub struct UploadOrchestrator<R, L> {
    store: R,
    fallback: OfflineFallback<L>,
    validator: SizeValidator,
    config: UploadConfig,
}

impl<R: RecordStore, L: LocalStore> UploadOrchestrator<R, L> {
    pub fn new(store: R, local: L, config: UploadConfig) -> Self {
        Self {
            validator: SizeValidator::new(config.limits.clone()),
            fallback: OfflineFallback::new(local),
            store,
            config,
        }
    }

    pub async fn upload(
        &self,
        context: &UploadContext,
        filename: &str,
        payload: Bytes,
        metadata: &RecordMetadata,
    ) -> Result<UploadOutcome> {
        // VALIDATING：元数据和大小都在任何网络调用之前检查
        metadata.validate()?;
        self.validator.validate(payload.len() as u64, metadata.media_type)?;

        let session = UploadSession::new(filename, payload.len() as u64, self.config.chunk_size)?;

        // 显式离线模式：不碰网络
        if context.offline {
            debug!(filename, "offline mode set, skipping remote upload");
            let id = self
                .fallback
                .save_offline(metadata, filename, &payload, &context.user_id)
                .await?;
            return Ok(UploadOutcome::Offline(id));
        }

        debug!(
            upload_id = %session.upload_id,
            total_chunks = session.total_chunks,
            size = session.total_size,
            "starting chunked upload"
        );

        // SPLITTING + UPLOADING
        let splitter = ChunkSplitter::new(payload.clone(), self.config.chunk_size);
        for chunk in splitter.chunks() {
            match self.store.upload_chunk(&session, &chunk).await {
                Ok(()) => {
                    debug!(
                        upload_id = %session.upload_id,
                        chunk_index = chunk.index,
                        total_chunks = session.total_chunks,
                        "chunk acknowledged"
                    );
                }
                Err(err) if err.is_transport() => {
                    // 远端不可达，降级为离线保存
                    warn!(
                        upload_id = %session.upload_id,
                        chunk_index = chunk.index,
                        error = %err,
                        "remote store unreachable, saving contribution offline"
                    );
                    let id = self
                        .fallback
                        .save_offline(metadata, filename, &payload, &context.user_id)
                        .await?;
                    return Ok(UploadOutcome::Offline(id));
                }
                Err(err) => return Err(err),
            }
        }

        // FINALIZING：所有分片都已确认
        let record_id = self
            .store
            .finalize(&session, metadata, &context.user_id)
            .await
            .map_err(UploadError::finalize)?;

        info!(upload_id = %session.upload_id, record_id = %record_id, "upload finalized");

        Ok(UploadOutcome::Remote(record_id))
    }
}

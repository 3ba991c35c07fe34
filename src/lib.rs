pub mod config;
pub mod upload;

pub use config::{SizeLimits, UploadConfig};

pub use upload::{
    CategoryMap,
    ChunkSplitter,
    FsStore,
    HttpRecordStore,
    Language,
    LocalRecordId,
    MediaType,
    RecordId,
    RecordMetadata,
    Result,
    SizeValidator,
    UploadContext,
    UploadError,
    UploadOrchestrator,
    UploadOutcome,
    UploadSession,
    Visibility,
};

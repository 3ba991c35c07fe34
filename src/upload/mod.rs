mod categories;
mod errors;
mod offline;
mod orchestrator;
mod splitter;
mod store;
mod types;
mod validate;

pub use categories::{Category, CategoryMap};
pub use errors::{Result, UploadError};
pub use offline::{FsStore, LocalStore, OfflineFallback};
pub use orchestrator::UploadOrchestrator;
pub use splitter::{Chunk, ChunkSplitter};
pub use store::{HttpRecordStore, RecordStore};
pub use types::{
    Language,
    LocalRecordId,
    MediaType,
    RecordId,
    RecordMetadata,
    UploadContext,
    UploadId,
    UploadOutcome,
    UploadSession,
    Visibility,
};
pub use validate::SizeValidator;

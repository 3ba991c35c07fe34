use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;
use super::errors::Result;
use super::types::{LocalRecordId, RecordMetadata};

/// 本地持久化存储的契约
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// 写入结构化记录
    async fn write_json(&self, key: &str, document: &serde_json::Value) -> Result<()>;

    /// 写入原始内容
    async fn write_binary(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// 文件系统实现。每次写入都走临时文件 + rename，
/// 失败不会留下半写的目标文件
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    async fn write_atomic(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp_name = path.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        Ok(())
    }
}

#[async_trait]
impl LocalStore for FsStore {
    async fn write_json(&self, key: &str, document: &serde_json::Value) -> Result<()> {
        let json = serde_json::to_vec_pretty(document)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        self.write_atomic(&format!("{}.json", key), &json).await
    }

    async fn write_binary(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.write_atomic(key, bytes).await
    }
}

/// 远端不可达时的离线保存路径。
/// 元数据文档和 RecordMetadata 字段保持一致，
/// 之后的同步任务可以直接消费（同步本身不在这里实现）
pub struct OfflineFallback<S> {
    store: S,
}

impl<S: LocalStore> OfflineFallback<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 先写内容，内容落盘成功后才写元数据，
    /// 任何一步失败都向调用方报错。
    /// 内容放在 uploads/ 子目录下，和根目录的元数据文档
    /// 分开，`.json` 后缀的投稿不会和元数据撞同一个 key
    pub async fn save_offline(
        &self,
        metadata: &RecordMetadata,
        filename: &str,
        content: &Bytes,
        user_id: &str,
    ) -> Result<LocalRecordId> {
        let id = LocalRecordId::generate();
        let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin");
        let content_key = format!("uploads/{}.{}", id, extension);

        self.store.write_binary(&content_key, content).await?;

        let document = serde_json::json!({
            "id": id,
            "user_id": user_id,
            "title": metadata.title,
            "description": metadata.description,
            "category_id": metadata.category_id,
            "media_type": metadata.media_type.as_str(),
            "language": metadata.language.as_str(),
            "release_rights": metadata.visibility.release_rights(),
            "latitude": metadata.latitude,
            "longitude": metadata.longitude,
            "filename": filename,
            "size": content.len(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        self.store.write_json(&id.to_string(), &document).await?;

        info!(record_id = %id, size = content.len(), "contribution saved offline");

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use crate::upload::types::{Language, MediaType, Visibility};

    fn sample_metadata() -> RecordMetadata {
        RecordMetadata {
            title: "Harvest song".to_string(),
            description: "Recorded at the village fair".to_string(),
            category_id: "c7".to_string(),
            media_type: MediaType::Audio,
            language: Language::Marathi,
            visibility: Visibility::Private,
            latitude: Some(18.52),
            longitude: Some(73.86),
        }
    }

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sanchay-{}-{}", tag, uuid::Uuid::new_v4().simple()))
    }

    #[tokio::test]
    async fn test_save_offline_writes_content_and_metadata() {
        let root = temp_root("offline");
        let fallback = OfflineFallback::new(FsStore::new(&root));

        let content = Bytes::from_static(b"some recorded audio");
        let id = fallback
            .save_offline(&sample_metadata(), "song.ogg", &content, "user-9")
            .await
            .unwrap();

        let saved_content = tokio::fs::read(root.join("uploads").join(format!("{}.ogg", id)))
            .await
            .unwrap();
        assert_eq!(saved_content, content.to_vec());

        let raw = tokio::fs::read_to_string(root.join(format!("{}.json", id))).await.unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(document["id"], id.to_string());
        assert_eq!(document["user_id"], "user-9");
        assert_eq!(document["title"], "Harvest song");
        assert_eq!(document["category_id"], "c7");
        assert_eq!(document["media_type"], "audio");
        assert_eq!(document["language"], "marathi");
        assert_eq!(document["release_rights"], "private");
        assert_eq!(document["size"], content.len());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_fallback_content_without_extension() {
        let root = temp_root("noext");
        let fallback = OfflineFallback::new(FsStore::new(&root));

        let id = fallback
            .save_offline(&sample_metadata(), "recording", &Bytes::from_static(b"x"), "user-1")
            .await
            .unwrap();

        assert!(root.join("uploads").join(format!("{}.bin", id)).exists());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_json_contribution_does_not_collide_with_metadata() {
        // `.json` 后缀的投稿：内容和元数据必须落在不同的文件
        let root = temp_root("jsonext");
        let fallback = OfflineFallback::new(FsStore::new(&root));

        let mut metadata = sample_metadata();
        metadata.media_type = MediaType::Document;
        let content = Bytes::from_static(b"{\"field\": \"notes\"}");

        let id = fallback
            .save_offline(&metadata, "notes.json", &content, "user-2")
            .await
            .unwrap();

        let saved_content = tokio::fs::read(root.join("uploads").join(format!("{}.json", id)))
            .await
            .unwrap();
        assert_eq!(saved_content, content.to_vec());

        let raw = tokio::fs::read_to_string(root.join(format!("{}.json", id))).await.unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(document["id"], id.to_string());
        assert_eq!(document["filename"], "notes.json");

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_no_tmp_file_left_behind() {
        let root = temp_root("atomic");
        let store = FsStore::new(&root);

        store.write_binary("record.dat", b"payload").await.unwrap();

        let mut entries = tokio::fs::read_dir(&root).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["record.dat".to_string()]);

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    /// 内容写入失败时不应再写元数据
    struct FailingStore {
        json_writes: AtomicU32,
    }

    #[async_trait]
    impl LocalStore for FailingStore {
        async fn write_json(&self, _key: &str, _document: &serde_json::Value) -> Result<()> {
            self.json_writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn write_binary(&self, _key: &str, _bytes: &[u8]) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
    }

    #[tokio::test]
    async fn test_metadata_not_written_when_content_fails() {
        let store = FailingStore { json_writes: AtomicU32::new(0) };
        let fallback = OfflineFallback::new(store);

        let result = fallback
            .save_offline(&sample_metadata(), "song.ogg", &Bytes::from_static(b"x"), "user-1")
            .await;

        assert!(result.is_err());
        assert_eq!(fallback.store.json_writes.load(Ordering::SeqCst), 0);
    }
}

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use super::categories::Category;
use super::errors::{Result, UploadError};
use super::splitter::Chunk;
use super::types::{RecordId, RecordMetadata, UploadContext, UploadSession};

/// 远端记录存储的契约。分片上传、finalize、分类列表
/// 都走这个接口，测试里用 mock 实现替换
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 上传单个分片。服务端按 upload_uuid 聚合分片状态
    async fn upload_chunk(&self, session: &UploadSession, chunk: &Chunk) -> Result<()>;

    /// 把已上传的分片和元数据绑定成一条持久记录。
    /// 只能在所有分片都确认成功之后调用
    async fn finalize(
        &self,
        session: &UploadSession,
        metadata: &RecordMetadata,
        user_id: &str,
    ) -> Result<RecordId>;

    /// 拉取分类列表
    async fn list_categories(&self) -> Result<Vec<Category>>;
}

/// 基于 reqwest 的 HTTP 实现
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl HttpRecordStore {
    pub fn new(context: &UploadContext, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: context.base_url.as_str().trim_end_matches('/').to_string(),
            auth_token: context.auth_token.clone(),
        })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api/v1{}", self.base_url, endpoint)
    }

    /// 非 2xx 时读响应体作为拒绝原因
    async fn rejection(status: StatusCode, response: reqwest::Response) -> UploadError {
        let message = match response.text().await {
            Ok(body) if !body.is_empty() => body,
            _ => status.canonical_reason().unwrap_or("request failed").to_string(),
        };

        UploadError::server_error(status.as_u16(), message)
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn upload_chunk(&self, session: &UploadSession, chunk: &Chunk) -> Result<()> {
        let part = Part::stream(reqwest::Body::from(chunk.bytes.clone()))
            .file_name(session.filename.clone());
        let form = Form::new()
            .part("chunk", part)
            .text("filename", session.filename.clone())
            .text("chunk_index", chunk.index.to_string())
            .text("total_chunks", session.total_chunks.to_string())
            .text("upload_uuid", session.upload_id.to_string());

        let response = self
            .client
            .post(self.api_url("/records/upload/chunk"))
            .bearer_auth(&self.auth_token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::rejection(status, response).await);
        }

        Ok(())
    }

    async fn finalize(
        &self,
        session: &UploadSession,
        metadata: &RecordMetadata,
        user_id: &str,
    ) -> Result<RecordId> {
        let mut params: Vec<(&str, String)> = vec![
            ("title", metadata.title.clone()),
            ("description", metadata.description.clone()),
            ("category_id", metadata.category_id.clone()),
            ("user_id", user_id.to_string()),
            ("media_type", metadata.media_type.as_str().to_string()),
            ("upload_uuid", session.upload_id.to_string()),
            ("filename", session.filename.clone()),
            ("total_chunks", session.total_chunks.to_string()),
            ("release_rights", metadata.visibility.release_rights().to_string()),
            ("language", metadata.language.as_str().to_string()),
        ];
        if let Some(latitude) = metadata.latitude {
            params.push(("latitude", latitude.to_string()));
        }
        if let Some(longitude) = metadata.longitude {
            params.push(("longitude", longitude.to_string()));
        }

        let response = self
            .client
            .post(self.api_url("/records/upload"))
            .bearer_auth(&self.auth_token)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(Self::rejection(status, response).await);
        }

        let result: serde_json::Value = response.json().await?;
        let record_id = match &result["id"] {
            serde_json::Value::String(id) => id.clone(),
            serde_json::Value::Number(id) => id.to_string(),
            _ => {
                return Err(UploadError::server_error(
                    status.as_u16(),
                    "No 'id' field in response",
                ));
            }
        };

        Ok(RecordId(record_id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let response = self
            .client
            .get(self.api_url("/categories/"))
            .bearer_auth(&self.auth_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::rejection(status, response).await);
        }

        let categories: Vec<Category> = response.json().await?;

        Ok(categories)
    }
}

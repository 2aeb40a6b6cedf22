use async_trait::async_trait;
use tracing::info;

use super::{ApiClient, FilePart, Method, RequestBody};
use crate::errors::{PortalError, Result};
use crate::models::common::ApiEnvelope;
use crate::models::{FileRef, Preview, UploadedFile};
use crate::utils::check_upload;

/// 文件存储能力
#[async_trait]
pub trait FileStore: Send + Sync {
    /// 上传前在本地检查大小、类型与内容
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadedFile>;
    async fn download(&self, file: &FileRef) -> Result<Vec<u8>>;
    async fn preview(&self, file: &FileRef) -> Result<Preview>;
}

/// 按扩展名推断上传时的内容类型
fn content_type_for(extension: &str) -> Option<&'static str> {
    let mime = match extension {
        ".pdf" => "application/pdf",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".txt" => "text/plain",
        ".md" => "text/markdown",
        ".zip" => "application/zip",
        ".doc" => "application/msword",
        ".docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ".xls" => "application/vnd.ms-excel",
        ".xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ".ppt" => "application/vnd.ms-powerpoint",
        ".pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => return None,
    };
    Some(mime)
}

fn file_path(action: &str, file: &FileRef) -> Result<String> {
    let path = file.storage_path();
    if path.is_empty() || path.split('/').any(|segment| segment == "..") {
        return Err(PortalError::validation(format!("invalid file reference: {file}")));
    }
    Ok(format!("files/{action}/{path}"))
}

#[async_trait]
impl FileStore for ApiClient {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadedFile> {
        let extension = check_upload(self.upload_config(), file_name, &bytes)?;
        let size = bytes.len();
        let part = FilePart {
            file_name: file_name.trim().to_string(),
            content_type: content_type_for(&extension).map(str::to_string),
            bytes,
        };

        let reply = self
            .execute(Method::Post, "files/upload".to_string(), RequestBody::Multipart(part))
            .await?;
        let envelope: ApiEnvelope<UploadedFile> = serde_json::from_slice(&reply.body)?;
        let uploaded = envelope.into_data().map_err(PortalError::file_operation)?;
        info!("Uploaded {} ({} bytes) to {}", file_name, size, uploaded.file_path);
        Ok(uploaded)
    }

    async fn download(&self, file: &FileRef) -> Result<Vec<u8>> {
        let reply = self
            .execute(Method::Get, file_path("download", file)?, RequestBody::Empty)
            .await?;
        Ok(reply.body)
    }

    async fn preview(&self, file: &FileRef) -> Result<Preview> {
        let reply = self
            .execute(Method::Get, file_path("preview", file)?, RequestBody::Empty)
            .await?;
        Ok(Preview::classify(reply.content_type.as_deref(), reply.body))
    }
}

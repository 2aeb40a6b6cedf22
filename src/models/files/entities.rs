use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 文件存储中的文件引用（相对路径）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct FileRef(pub String);

impl FileRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 去掉前导斜杠与 `/files/` 前缀，得到可拼接到下载地址的路径
    pub fn storage_path(&self) -> &str {
        let path = self.0.trim().trim_start_matches('/');
        path.strip_prefix("files/").unwrap_or(path)
    }

    pub fn file_name(&self) -> &str {
        self.storage_path()
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }
}

impl std::fmt::Display for FileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 上传成功后服务端返回的文件信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct UploadedFile {
    // 存储路径
    pub file_path: String,
    // 原始文件名
    #[serde(alias = "originalName")]
    pub file_name: String,
    // 文件大小（以字节为单位）
    #[serde(default)]
    pub file_size: i64,
    // 文件类型
    #[serde(default)]
    pub content_type: Option<String>,
}

impl UploadedFile {
    pub fn file_ref(&self) -> FileRef {
        FileRef::new(self.file_path.clone())
    }
}

/// 预览结果：可直接渲染的文本、可内嵌展示的二进制，或只能下载
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Text(String),
    Inline { content_type: String, bytes: Vec<u8> },
    DownloadOnly { content_type: Option<String>, bytes: Vec<u8> },
}

impl Preview {
    /// 按内容类型归类
    pub fn classify(content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let mime = content_type
            .map(|c| c.split(';').next().unwrap_or_default().trim().to_ascii_lowercase());
        match mime.as_deref() {
            Some(m) if m.starts_with("text/") || m == "application/json" => {
                match String::from_utf8(bytes) {
                    Ok(text) => Preview::Text(text),
                    Err(e) => Preview::DownloadOnly {
                        content_type: content_type.map(str::to_string),
                        bytes: e.into_bytes(),
                    },
                }
            }
            Some(m) if m.starts_with("image/") || m == "application/pdf" => Preview::Inline {
                content_type: m.to_string(),
                bytes,
            },
            _ => Preview::DownloadOnly {
                content_type: content_type.map(str::to_string),
                bytes,
            },
        }
    }
}

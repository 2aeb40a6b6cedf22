//! 后端 REST 接口客户端
//!
//! 所有请求经由 [`Transport`] 发出，身份信息由 [`AuthContext`] 显式传入。
//! 不做缓存与重试；写操作之后由 [`workflow`] 重新拉取列表。

pub mod activities;
pub mod auth;
pub mod files;
pub mod submissions;
pub mod transport;
pub mod workflow;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

pub use auth::AuthContext;
pub use files::FileStore;
pub use transport::{ApiReply, ApiRequest, FilePart, Method, ReqwestTransport, RequestBody, Transport};

use crate::config::{AppConfig, UploadConfig};
use crate::errors::{PortalError, Result};

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    auth: AuthContext,
    upload: UploadConfig,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, auth: AuthContext, upload: UploadConfig) -> Self {
        Self {
            transport,
            auth,
            upload,
        }
    }

    /// 使用 reqwest 传输层，按配置创建客户端
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.api)?;
        Ok(Self::new(
            Arc::new(transport),
            AuthContext::from_config(&config.auth),
            config.upload.clone(),
        ))
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn upload_config(&self) -> &UploadConfig {
        &self.upload
    }

    /// 发送请求并把非 2xx 状态转换为错误
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: String,
        body: RequestBody,
    ) -> Result<ApiReply> {
        let request = ApiRequest {
            method,
            path,
            body,
            bearer: self.auth.token().map(str::to_string),
        };
        let label = format!("{} {}", method.as_str(), request.path);
        let reply = self.transport.send(request).await?;
        debug!("{} -> {}", label, reply.status);

        if reply.is_success() {
            return Ok(reply);
        }

        let detail = error_detail(&reply);
        match reply.status {
            401 | 403 => Err(PortalError::authentication(format!("{label}: {detail}"))),
            404 => Err(PortalError::not_found(label)),
            status => {
                warn!("{} failed with status {}", label, status);
                Err(PortalError::network(format!("{label} returned {status}: {detail}")))
            }
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: String) -> Result<T> {
        let reply = self.execute(Method::Get, path, RequestBody::Empty).await?;
        decode(&reply)
    }

    /// 单个资源读取：404 视为不存在
    pub(crate) async fn get_optional<T: DeserializeOwned>(&self, path: String) -> Result<Option<T>> {
        match self.get_json(path).await {
            Ok(value) => Ok(Some(value)),
            Err(PortalError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: String, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let reply = self.execute(method, path, body).await?;
        decode(&reply)
    }

    /// 不关心响应体的请求
    pub(crate) async fn send_empty(&self, method: Method, path: String) -> Result<()> {
        self.execute(method, path, RequestBody::Empty).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(reply: &ApiReply) -> Result<T> {
    serde_json::from_slice(&reply.body).map_err(|e| {
        PortalError::serialization(format!("unexpected response body: {e}"))
    })
}

/// 从错误响应中取出可读信息
fn error_detail(reply: &ApiReply) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&reply.body)
        && let Some(message) = value.get("message").and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    let text = String::from_utf8_lossy(&reply.body);
    let text = text.trim();
    if text.is_empty() {
        "no response body".to_string()
    } else {
        text.chars().take(200).collect()
    }
}

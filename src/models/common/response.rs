use serde::{Deserialize, Serialize};

/// 文件接口使用的统一响应外壳
///
/// 活动与提交接口直接返回实体，只有文件接口包一层 `{success, message, data}`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    /// 拆出数据；失败或缺少数据时返回错误信息
    pub fn into_data(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("response contained no data".to_string()),
            (false, _) => Err(self
                .message
                .unwrap_or_else(|| "request was not successful".to_string())),
        }
    }
}

use std::fmt;

use crate::config::AuthConfig;

/// 请求携带的身份信息
#[derive(Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
}

impl AuthContext {
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        Self {
            token: (!token.is_empty()).then(|| token.to_string()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::bearer(config.token.as_str())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

// 令牌不输出到日志
impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{call} failed: {source}")]
    Transport {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Session expired or missing. Run `period-tui login` to authenticate.")]
    Unauthorized,
    #[error("CSRF verification failed. Run `period-tui login` again.")]
    Forbidden,
    #[error("{call} returned {status}")]
    Status {
        call: &'static str,
        status: StatusCode,
    },
    #[error("Failed to parse {call} response: {source}")]
    Decode {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to build URL for path {0}")]
    Url(String),
    /// The server answered `success: false`; the message is user-facing.
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Text shown to the user after a failed mutation, e.g. `标记失败: 记录不存在`.
    /// `Display` stays English for logs and the command line.
    pub fn failure_text(&self, prefix: &str) -> String {
        let reason = match self {
            ApiError::Rejected(message) => return format!("{}: {}", prefix, message),
            ApiError::Unauthorized => "登录已过期，请运行 `period-tui login` 重新登录".to_string(),
            ApiError::Forbidden => "CSRF验证失败，请重新登录".to_string(),
            ApiError::Status { status, .. } => format!("服务器返回 {}", status.as_u16()),
            ApiError::Transport { .. } => "无法连接服务器".to_string(),
            ApiError::Decode { .. } => "服务器响应格式错误".to_string(),
            ApiError::Url(_) => "服务器地址无效".to_string(),
        };
        format!("请求失败: {}", reason)
    }
}

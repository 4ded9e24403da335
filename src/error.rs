//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Telegram Catch 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum TelegramCatchError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notifier(#[from] NotifierError),

    /// 模板相关错误
    #[error("模板错误: {0}")]
    Template(#[from] TemplateError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 通知发送错误类型
///
/// `ChatIdNotFound` 与 `SendingFailed` 是 Bot API 层面的失败，受静默模式控制；
/// 其余变体属于传输层错误，无论何种模式都会返回给调用方。
#[derive(Error, Debug)]
pub enum NotifierError {
    /// 通讯录中没有该用户的 chat_id
    #[error("{0}")]
    ChatIdNotFound(String),

    /// Bot API 拒绝了请求
    #[error("{0}")]
    SendingFailed(String),

    /// HTTP请求错误，构造时已去掉含 token 的 URL
    #[error("HTTP请求失败: {0}")]
    Transport(reqwest::Error),

    /// 响应体不是合法的 JSON
    #[error("响应解析失败: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NotifierError {
    /// 包装 reqwest 错误并去掉其中的请求 URL（URL 含有 token）
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }

    /// 是否为可被静默模式吞掉的 API 层错误
    pub fn is_api_failure(&self) -> bool {
        matches!(self, Self::ChatIdNotFound(_) | Self::SendingFailed(_))
    }
}

/// 模板错误类型
#[derive(Error, Debug)]
pub enum TemplateError {
    /// 模板语法错误
    #[error("模板编译失败: {0}")]
    Compile(String),

    /// 渲染错误
    #[error("模板渲染失败: {0}")]
    Render(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, TelegramCatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_failures_are_classified() {
        assert!(NotifierError::ChatIdNotFound("x".to_string()).is_api_failure());
        assert!(NotifierError::SendingFailed("x".to_string()).is_api_failure());

        let decode = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert!(!NotifierError::from(decode).is_api_failure());
    }

    #[test]
    fn test_api_failure_message_is_verbatim() {
        let err = NotifierError::SendingFailed("Сообщение не было отправлено.".to_string());
        assert_eq!(err.to_string(), "Сообщение не было отправлено.");
    }
}

//! Telegram Bot API 数据结构
//!
//! `sendMessage` 的请求体、响应体以及错误描述的翻译表

use serde::{Deserialize, Serialize};

/// 默认 Bot API 根地址
pub const DEFAULT_API_ROOT: &str = "https://api.telegram.org";

/// 发送消息的 API 方法名
pub const SEND_MESSAGE_METHOD: &str = "sendMessage";

/// 响应中缺少 description 时使用的描述
pub const UNKNOWN_REASON: &str = "Информация о причине ошибки не найдена";

/// `sendMessage` 请求体
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Bot API 响应体，只关心 `ok` 和 `description`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ApiResponse {
    /// 请求是否成功，缺失或 null 视为失败
    pub fn is_ok(&self) -> bool {
        self.ok.unwrap_or(false)
    }

    /// 失败原因（已翻译）
    pub fn failure_reason(&self) -> &str {
        explain_description(self.description.as_deref().unwrap_or(UNKNOWN_REASON))
    }
}

/// 将已知的 Bot API 错误描述替换为本地化说明，未知描述原样返回
pub fn explain_description(description: &str) -> &str {
    match description {
        "Bad Request: chat not found" => {
            "Диалог не найден. Проверьте корректность chat_id или попробуйте отправить любое сообщение боту"
        }
        "Unauthorized" => "Бот с указанным токеном не найден",
        other => other,
    }
}

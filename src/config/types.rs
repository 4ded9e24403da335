//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use crate::guard::Guard;
use crate::notification::directory::is_chat_id;
use crate::notification::{FailureTemplate, Mode, NotifierBuilder, RecipientDirectory};
use crate::notification::api::DEFAULT_API_ROOT;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Telegram 机器人配置
    pub telegram: TelegramConfig,
    /// 用户名到 chat_id 的对应关系
    #[serde(default)]
    pub users: HashMap<String, String>,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Telegram 机器人配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TelegramConfig {
    /// 机器人 token
    pub token: String,
    /// 默认收件人
    pub receiver: String,
    /// 静默模式
    #[serde(default = "default_quiet")]
    pub quiet: bool,
    /// Bot API 根地址
    #[serde(default = "default_api_root")]
    pub api_root: String,
    /// 请求超时时间（秒），不设置则不限时
    pub request_timeout_seconds: Option<u64>,
    /// 故障消息模板
    pub message_template: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 是否使用JSON格式
    #[serde(default)]
    pub json_format: bool,
    /// 日志文件路径，设置后不再输出到 stderr
    pub file: Option<PathBuf>,
    /// 模块级别日志控制，例如 `reqwest = "warn"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file: None,
            modules: HashMap::new(),
        }
    }
}

// 默认值函数
fn default_quiet() -> bool {
    true
}
fn default_api_root() -> String {
    DEFAULT_API_ROOT.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// 由 `[users]` 构建通讯录
    pub fn directory(&self) -> RecipientDirectory {
        self.users.iter().collect()
    }

    pub fn mode(&self) -> Mode {
        Mode::from_quiet(self.telegram.quiet)
    }

    /// 由配置生成发送器构建器
    pub fn notifier_builder(&self) -> NotifierBuilder {
        let mut builder = NotifierBuilder::new(self.telegram.token.clone())
            .mode(self.mode())
            .api_root(self.telegram.api_root.clone())
            .directory(self.directory());
        if let Some(secs) = self.telegram.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
    }

    /// 由配置生成守卫
    ///
    /// # 参数
    /// * `receiver` - 覆盖配置中的默认收件人
    pub fn guard(&self, receiver: Option<&str>) -> crate::error::Result<Guard> {
        let receiver = receiver.unwrap_or(&self.telegram.receiver);
        let mut guard = Guard::from_builder(self.notifier_builder(), receiver);
        if let Some(template) = &self.telegram.message_template {
            guard = guard.template(FailureTemplate::new(template.clone())?);
        }
        Ok(guard)
    }
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    let telegram = &config.telegram;

    if telegram.token.trim().is_empty() {
        return Err("机器人token不能为空".to_string());
    }

    if telegram.receiver.trim().is_empty() {
        return Err("默认收件人不能为空".to_string());
    }

    if !telegram.api_root.starts_with("http://") && !telegram.api_root.starts_with("https://") {
        return Err(format!("无效的Bot API地址: {}", telegram.api_root));
    }

    if telegram.request_timeout_seconds == Some(0) {
        return Err("请求超时时间不能为0".to_string());
    }

    if let Some(template) = &telegram.message_template {
        FailureTemplate::new(template.clone()).map_err(|e| e.to_string())?;
    }

    for (username, chat_id) in &config.users {
        if is_chat_id(username) {
            return Err(format!("用户名不能是纯数字: {username}"));
        }
        if !is_chat_id(chat_id) {
            return Err(format!("用户 {username} 的chat_id必须是纯数字: {chat_id}"));
        }
    }

    // 验证日志级别
    let valid_log_levels = ["debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.logging.level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，有效值: {:?}",
            config.logging.level, valid_log_levels
        ));
    }

    for (module, level) in &config.logging.modules {
        if !valid_log_levels.contains(&level.as_str()) {
            return Err(format!("模块 {module} 的日志级别无效: {level}"));
        }
    }

    Ok(())
}

/// 生成示例配置文件内容
pub fn sample_config() -> String {
    r#"# Telegram Catch 配置文件

[telegram]
token = "${TELEGRAM_BOT_TOKEN}"
receiver = "alice"
quiet = true
# api_root = "https://api.telegram.org"
# request_timeout_seconds = 30
# message_template = "Произошел сбой при выполнении {{program}}:\n\n{{trace}}"

[users]
alice = "123456789"

[logging]
level = "info"
json_format = false
# file = "/var/log/telegram-catch.log"

[logging.modules]
reqwest = "warn"
"#
    .to_string()
}

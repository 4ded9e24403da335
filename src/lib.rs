//! Telegram Catch - 通过 Telegram 机器人发送故障通知
//!
//! 被包装的调用失败时，将程序名和完整错误信息发送给指定用户，
//! 然后把原始错误交还给调用方：
//! - 收件人解析（chat_id 或通讯录中的用户名）
//! - 静默/严格两种失败处理模式
//! - 可包装任意调用的故障守卫
//! - TOML 配置与结构化日志

pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod logging;
pub mod notification;

// 重新导出主要类型
pub use config::{Config, TelegramConfig};
pub use error::{NotifierError, TelegramCatchError};
pub use guard::{Guard, GuardError};
pub use notification::{Mode, Notifier, NotifierBuilder, RecipientDirectory, SendOutcome};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

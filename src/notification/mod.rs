//! 通知模块
//!
//! 提供 Telegram 通知发送、收件人解析和消息模板功能

pub mod api;
pub mod console;
pub mod directory;
pub mod notifier;
pub mod template;

// 重新导出主要类型
pub use console::{Console, StdoutConsole, Tag};
pub use directory::{Receiver, RecipientDirectory};
pub use notifier::{Mode, Notifier, NotifierBuilder, SendOutcome};
pub use template::{FailureContext, FailureTemplate};

//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Telegram Catch - 通过 Telegram 机器人发送故障通知
#[derive(Parser, Debug, Clone)]
#[command(
    name = "telegram-catch",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "TELEGRAM_CATCH_CONFIG",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        help = "日志级别（默认取配置文件）",
        env = "TELEGRAM_CATCH_LOG_LEVEL",
        global = true
    )]
    pub log_level: Option<LogLevel>,

    /// 严格模式：通知失败时以错误退出
    #[arg(long, help = "严格模式，覆盖配置中的 quiet", global = true)]
    pub strict: bool,

    /// 子命令
    #[command(subcommand)]
    pub command: Commands,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// 发送一条消息
    Send {
        /// 收件人（chat_id 或用户名），默认取配置
        #[arg(short, long, value_name = "RECEIVER")]
        to: Option<String>,

        /// 消息内容
        #[arg(value_name = "MESSAGE")]
        message: String,
    },

    /// 运行命令，失败时发送故障通知
    Run {
        /// 收件人（chat_id 或用户名），默认取配置
        #[arg(short, long, value_name = "RECEIVER")]
        to: Option<String>,

        /// 要运行的程序及其参数
        #[arg(
            value_name = "COMMAND",
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        command: Vec<String>,
    },

    /// 验证配置文件
    Validate {
        /// 配置文件路径，默认取 --config
        #[arg(value_name = "FILE")]
        config_path: Option<PathBuf>,
    },

    /// 生成示例配置文件
    Init {
        /// 输出路径
        #[arg(value_name = "FILE", default_value = "telegram-catch.toml")]
        config_path: PathBuf,

        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },

    /// 显示版本信息
    Version,
}

impl Args {
    /// 获取配置文件路径
    pub fn get_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::get_default_config_path)
    }
}

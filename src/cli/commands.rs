//! 命令处理实现
//!
//! 实现各个CLI命令的具体逻辑

use crate::cli::args::{Args, Commands};
use crate::config::types::sample_config;
use crate::config::{Config, ConfigLoader, TomlConfigLoader};
use crate::error::Result;
use crate::notification::SendOutcome;
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// 命令处理器trait
pub trait Command {
    /// 执行命令
    fn execute(&self, args: &Args) -> Result<()>;
}

/// 加载配置并应用命令行覆盖项
pub fn load_config(args: &Args) -> Result<Config> {
    let loader = TomlConfigLoader::new(true);
    let mut config = loader.load_from_file(args.get_config_path())?;
    if args.strict {
        config.telegram.quiet = false;
    }
    Ok(config)
}

/// 发送消息命令
pub struct SendCommand {
    config: Config,
}

impl SendCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Command for SendCommand {
    fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Send { to, message } = &args.command {
            let receiver = to.as_deref().unwrap_or(&self.config.telegram.receiver);
            let notifier = self.config.notifier_builder().build()?;

            match notifier.send(receiver, message)? {
                SendOutcome::Delivered => info!("消息已送达"),
                SendOutcome::Suppressed(reason) => info!("消息未送达（静默模式）: {}", reason),
            }
        }
        Ok(())
    }
}

/// 运行子进程命令
pub struct RunCommand {
    config: Config,
}

impl RunCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Command for RunCommand {
    fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Run { to, command } = &args.command {
            let Some((program, rest)) = command.split_first() else {
                return Ok(());
            };

            let guard = self
                .config
                .guard(to.as_deref())?
                .program_name(program_file_name(program));

            guard
                .run(|| run_child(program, rest))
                .map_err(Into::into)
        } else {
            Ok(())
        }
    }
}

/// 运行子进程，非零退出码视为失败
fn run_child(program: &str, rest: &[String]) -> anyhow::Result<()> {
    info!("运行命令: {} {}", program, rest.join(" "));
    let status = std::process::Command::new(program)
        .args(rest)
        .status()
        .with_context(|| format!("无法启动进程 {program}"))?;

    if status.success() {
        Ok(())
    } else {
        Err(anyhow::anyhow!("进程 {} 异常退出: {}", program, status))
    }
}

/// 程序路径中的文件名部分
fn program_file_name(program: &str) -> String {
    Path::new(program)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.to_string())
}

/// 验证配置命令
pub struct ValidateCommand;

impl Command for ValidateCommand {
    fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Validate { config_path } = &args.command {
            let path = config_path.clone().unwrap_or_else(|| args.get_config_path());
            let config = TomlConfigLoader::new(true).load_from_file(&path)?;

            println!("✅ 配置文件有效: {}", path.display());
            println!("   默认收件人: {}", config.telegram.receiver);
            println!("   模式: {:?}", config.mode());
            println!("   通讯录条目: {}", config.users.len());
        }
        Ok(())
    }
}

/// 初始化配置命令
pub struct InitCommand;

impl Command for InitCommand {
    fn execute(&self, args: &Args) -> Result<()> {
        if let Commands::Init { config_path, force } = &args.command {
            self.create_config_file(config_path, *force)?;
        }
        Ok(())
    }
}

impl InitCommand {
    /// 创建配置文件
    fn create_config_file(&self, config_path: &Path, force: bool) -> Result<()> {
        if config_path.exists() && !force {
            eprintln!("配置文件已存在: {}", config_path.display());
            eprintln!("使用 --force 参数覆盖现有文件");
            return Ok(());
        }

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(config_path, sample_config())?;

        println!("配置文件已创建: {}", config_path.display());
        println!("请设置 TELEGRAM_BOT_TOKEN 环境变量并编辑 [users] 通讯录");

        Ok(())
    }
}

/// 版本命令
pub struct VersionCommand;

impl Command for VersionCommand {
    fn execute(&self, _args: &Args) -> Result<()> {
        println!("{} {}", crate::APP_NAME, crate::VERSION);
        Ok(())
    }
}

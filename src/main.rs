//! Telegram Catch 主程序入口

use anyhow::{Context, Result};
use clap::Parser;
use telegram_catch::cli::args::{Args, Commands};
use telegram_catch::cli::commands::{
    load_config, Command, InitCommand, RunCommand, SendCommand, ValidateCommand, VersionCommand,
};
use telegram_catch::logging::{LogConfig, LoggingSystem};
use telegram_catch::Config;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 配置只加载一次；init/version 等命令在配置缺失时也能运行
    let config = load_config(&args);

    // 初始化日志系统
    let _logging_system = LoggingSystem::setup_logging(resolve_log_config(&args, config.as_ref().ok()))
        .context("初始化日志系统失败")?;

    debug!("Telegram Catch v{} 启动", telegram_catch::VERSION);
    match &config {
        Ok(_) => info!("成功加载配置文件: {}", args.get_config_path().display()),
        Err(e) => debug!("未加载配置文件: {}", e),
    }

    if let Err(e) = execute_command(&args, config) {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 日志配置：命令行参数优先，其次是配置文件中的 [logging]
fn resolve_log_config(args: &Args, config: Option<&Config>) -> LogConfig {
    let from_file = config
        .map(|config| LogConfig::from(&config.logging))
        .unwrap_or_default();

    match args.log_level {
        Some(level) => LogConfig {
            level: level.into(),
            ..from_file
        },
        None => from_file,
    }
}

/// 执行CLI命令
fn execute_command(
    args: &Args,
    config: telegram_catch::error::Result<Config>,
) -> telegram_catch::error::Result<()> {
    match &args.command {
        Commands::Send { .. } => SendCommand::new(config?).execute(args),
        Commands::Run { .. } => RunCommand::new(config?).execute(args),
        Commands::Validate { .. } => ValidateCommand.execute(args),
        Commands::Init { .. } => InitCommand.execute(args),
        Commands::Version => VersionCommand.execute(args),
    }
}

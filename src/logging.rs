//! 日志系统模块
//!
//! 按 `[logging]` 配置安装 tracing subscriber。默认写到 stderr，stdout 只留给带标签的通知结果行。

use crate::config::LoggingSettings;
use log::LevelFilter;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 全局只安装一次；保存首次安装的结果
static LOGGING_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 日志文件路径，None 时输出到 stderr
    pub file_path: Option<PathBuf>,
    /// 是否使用JSON格式
    pub json_format: bool,
    /// 模块级别日志控制
    pub module_levels: HashMap<String, LevelFilter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file_path: None,
            json_format: false,
            module_levels: HashMap::new(),
        }
    }
}

impl From<&LoggingSettings> for LogConfig {
    fn from(settings: &LoggingSettings) -> Self {
        let module_levels = settings
            .modules
            .iter()
            .filter_map(|(module, level)| level.parse().ok().map(|level| (module.clone(), level)))
            .collect();

        Self {
            level: settings.level.parse().unwrap_or(LevelFilter::Info),
            file_path: settings.file.clone(),
            json_format: settings.json_format,
            module_levels,
        }
    }
}

impl LogConfig {
    /// 由全局级别和模块级别生成过滤器
    fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        let mut filter = EnvFilter::from_default_env().add_directive(to_directive(self.level));

        for (module, level) in &self.module_levels {
            let directive = format!("{}={}", module, level.as_str().to_lowercase())
                .parse::<Directive>()
                .map_err(|e| anyhow::anyhow!("无效的模块日志级别 {}: {}", module, e))?;
            filter = filter.add_directive(directive);
        }

        Ok(filter)
    }
}

/// 日志系统管理器
#[derive(Debug)]
pub struct LoggingSystem {
    config: LogConfig,
}

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 重复调用不会重复安装 subscriber，返回首次安装的结果。
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<Self> {
        LOGGING_INIT
            .get_or_init(|| Self::install(&config).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| anyhow::anyhow!("日志系统初始化失败: {}", e))?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// 安装 LogTracer 与 tracing subscriber
    fn install(config: &LogConfig) -> anyhow::Result<()> {
        // log crate 到 tracing 的桥接
        tracing_log::LogTracer::init().map_err(|e| anyhow::anyhow!("LogTracer初始化失败: {}", e))?;

        let filter = config.env_filter()?;
        let layer = match &config.file_path {
            Some(path) => {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| anyhow::anyhow!("打开日志文件失败 {}: {}", path.display(), e))?;
                let layer = fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339());
                if config.json_format {
                    layer.json().boxed()
                } else {
                    layer.boxed()
                }
            }
            None => {
                let layer = fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_timer(fmt::time::ChronoUtc::rfc_3339());
                if config.json_format {
                    layer.json().boxed()
                } else {
                    layer.with_target(false).boxed()
                }
            }
        };

        registry()
            .with(filter)
            .with(layer)
            .try_init()
            .map_err(|e| anyhow::anyhow!("tracing subscriber初始化失败: {}", e))?;

        tracing::debug!("日志配置: {:?}", config);
        Ok(())
    }
}

/// 将 log::LevelFilter 转换为 tracing 的指令
fn to_directive(level: LevelFilter) -> Directive {
    use tracing_subscriber::filter::LevelFilter as TracingLevel;
    let level = match level {
        LevelFilter::Off => TracingLevel::OFF,
        LevelFilter::Error => TracingLevel::ERROR,
        LevelFilter::Warn => TracingLevel::WARN,
        LevelFilter::Info => TracingLevel::INFO,
        LevelFilter::Debug => TracingLevel::DEBUG,
        LevelFilter::Trace => TracingLevel::TRACE,
    };
    Directive::from(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LoggingSettings {
        LoggingSettings {
            level: "debug".to_string(),
            json_format: true,
            file: Some(PathBuf::from("/tmp/telegram-catch.log")),
            modules: HashMap::from([
                ("reqwest".to_string(), "warn".to_string()),
                ("hyper".to_string(), "nonsense".to_string()),
            ]),
        }
    }

    #[test]
    fn test_from_logging_settings() {
        let config = LogConfig::from(&settings());
        assert_eq!(config.level, LevelFilter::Debug);
        assert!(config.json_format);
        assert_eq!(
            config.file_path,
            Some(PathBuf::from("/tmp/telegram-catch.log"))
        );
        assert_eq!(config.module_levels.get("reqwest"), Some(&LevelFilter::Warn));
        // 无法解析的级别被忽略
        assert!(!config.module_levels.contains_key("hyper"));
    }

    #[test]
    fn test_invalid_level_falls_back_to_info() {
        let config = LogConfig::from(&LoggingSettings {
            level: "loud".to_string(),
            ..LoggingSettings::default()
        });
        assert_eq!(config.level, LevelFilter::Info);
        assert!(config.file_path.is_none());
    }

    #[test]
    fn test_env_filter_accepts_module_levels() {
        let config = LogConfig::from(&settings());
        let filter = config.env_filter().unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("reqwest=warn"));
    }

    #[test]
    fn test_setup_logging_is_idempotent() {
        let first = LoggingSystem::setup_logging(LogConfig::default());
        let second = LoggingSystem::setup_logging(LogConfig::default());
        assert_eq!(first.is_ok(), second.is_ok());
    }
}

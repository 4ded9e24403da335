//! 消息模板模块
//!
//! 提供故障通知消息的渲染功能

use crate::error::TemplateError;
use handlebars::{no_escape, Handlebars};
use serde::Serialize;
use std::fmt;

/// 默认的故障消息模板
pub const DEFAULT_FAILURE_TEMPLATE: &str = "Произошел сбой при выполнении {{program}}:\n\n{{trace}}";

const TEMPLATE_NAME: &str = "failure";

/// 模板上下文数据
#[derive(Debug, Clone, Serialize)]
pub struct FailureContext {
    /// 出错程序的名称
    pub program: String,
    /// 完整的错误链或 panic 信息
    pub trace: String,
    /// 时间戳（RFC 3339, UTC）
    pub timestamp: String,
}

impl FailureContext {
    /// 以当前时间创建上下文
    pub fn new(program: impl Into<String>, trace: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            trace: trace.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// 故障消息模板
///
/// 默认模板不经过 handlebars，直接格式化；自定义模板在构造时编译。
#[derive(Clone, Default)]
pub struct FailureTemplate {
    compiled: Option<Handlebars<'static>>,
    source: Option<String>,
}

impl FailureTemplate {
    /// 创建自定义模板
    ///
    /// # 参数
    /// * `source` - handlebars 模板字符串，可用变量：`program`、`trace`、`timestamp`
    ///
    /// # 返回
    /// * `Result<Self, TemplateError>` - 模板实例，语法错误时返回 `Compile`
    pub fn new(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let mut registry = Handlebars::new();
        // 纯文本消息，不做 HTML 转义
        registry.register_escape_fn(no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, &source)
            .map_err(|e| TemplateError::Compile(e.to_string()))?;

        Ok(Self {
            compiled: Some(registry),
            source: Some(source),
        })
    }

    /// 模板原文
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(DEFAULT_FAILURE_TEMPLATE)
    }

    /// 渲染模板
    pub fn render(&self, context: &FailureContext) -> Result<String, TemplateError> {
        match &self.compiled {
            Some(registry) => registry
                .render(TEMPLATE_NAME, context)
                .map_err(|e| TemplateError::Render(e.to_string())),
            None => Ok(builtin_message(context)),
        }
    }

    /// 渲染模板，失败时退回默认格式
    pub fn render_or_default(&self, context: &FailureContext) -> String {
        self.render(context).unwrap_or_else(|e| {
            tracing::warn!("故障消息模板渲染失败，使用默认模板: {}", e);
            builtin_message(context)
        })
    }
}

fn builtin_message(context: &FailureContext) -> String {
    format!(
        "Произошел сбой при выполнении {}:\n\n{}",
        context.program, context.trace
    )
}

impl fmt::Debug for FailureTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureTemplate")
            .field("source", &self.source())
            .finish()
    }
}

//! 故障守卫模块
//!
//! 包装任意可调用对象：执行失败时先发送 Telegram 通知，再把原始错误交还给调用方

use crate::error::NotifierError;
use crate::notification::{FailureContext, FailureTemplate, Mode, NotifierBuilder, SendOutcome};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error};

/// 守卫执行失败时的错误
///
/// 原始错误总是保留；通知本身失败时两者同时可见。
#[derive(Debug, Error)]
pub enum GuardError<E> {
    /// 被包装的调用失败，通知已尝试发送
    #[error("{0}")]
    Failed(E),

    /// 被包装的调用失败，并且通知也发送失败
    #[error("{original}（故障通知发送失败: {notification}）")]
    NotificationFailed {
        original: E,
        #[source]
        notification: NotifierError,
    },
}

impl<E> GuardError<E> {
    /// 原始错误
    pub fn original(&self) -> &E {
        match self {
            GuardError::Failed(original) | GuardError::NotificationFailed { original, .. } => {
                original
            }
        }
    }

    /// 取出原始错误
    pub fn into_original(self) -> E {
        match self {
            GuardError::Failed(original) | GuardError::NotificationFailed { original, .. } => {
                original
            }
        }
    }

    /// 通知发送本身的错误（如果有）
    pub fn notification_error(&self) -> Option<&NotifierError> {
        match self {
            GuardError::Failed(_) => None,
            GuardError::NotificationFailed { notification, .. } => Some(notification),
        }
    }
}

/// 故障守卫
#[derive(Debug, Clone)]
pub struct Guard {
    notifier: NotifierBuilder,
    receiver: String,
    program_name: Option<String>,
    template: FailureTemplate,
}

impl Guard {
    /// 创建守卫，默认静默模式
    ///
    /// # 参数
    /// * `token` - Telegram 机器人 token
    /// * `receiver` - chat_id 或用户名
    pub fn new(token: impl Into<String>, receiver: impl Into<String>) -> Self {
        Self::from_builder(NotifierBuilder::new(token), receiver)
    }

    /// 使用已配置好的发送器构建器创建守卫
    ///
    /// 每次失败都会用该构建器创建一个新的发送器。
    pub fn from_builder(notifier: NotifierBuilder, receiver: impl Into<String>) -> Self {
        Self {
            notifier,
            receiver: receiver.into(),
            program_name: None,
            template: FailureTemplate::default(),
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.notifier = self.notifier.mode(mode);
        self
    }

    pub fn quiet(self, quiet: bool) -> Self {
        self.mode(Mode::from_quiet(quiet))
    }

    /// 覆盖消息中的程序名称，默认取 `argv[0]` 的文件名
    pub fn program_name(mut self, name: impl Into<String>) -> Self {
        self.program_name = Some(name.into());
        self
    }

    pub fn template(mut self, template: FailureTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// 执行调用并在失败时发送通知
    ///
    /// 成功时原样返回结果且不发送通知。失败时发送一次通知，然后返回
    /// 原始错误；若通知本身失败（严格模式下的 API 错误或任意模式下的
    /// 传输错误），返回 `NotificationFailed`，其中同时保留两个错误。
    ///
    /// 调用中的 panic 同样会触发通知，随后原样恢复 panic。
    pub fn try_run<T, E, F>(&self, f: F) -> Result<T, GuardError<E>>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Debug,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                // Debug 输出包含完整错误链，anyhow::Error 还会带上 backtrace
                let trace = format!("{err:?}");
                match self.notify(&trace) {
                    Ok(_) => Err(GuardError::Failed(err)),
                    Err(notification) => Err(GuardError::NotificationFailed {
                        original: err,
                        notification,
                    }),
                }
            }
            Err(payload) => {
                let trace = format!("panicked: {}", panic_message(payload.as_ref()));
                if let Err(e) = self.notify(&trace) {
                    error!("故障通知发送失败: {}", e);
                }
                panic::resume_unwind(payload)
            }
        }
    }

    /// 与 [`Guard::try_run`] 相同，但总是返回原始错误
    ///
    /// 通知本身的失败只记录到日志。
    pub fn run<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Debug,
    {
        self.try_run(f).map_err(|err| {
            if let Some(notification) = err.notification_error() {
                error!("故障通知发送失败: {}", notification);
            }
            err.into_original()
        })
    }

    /// 生成包装后的函数，参数和返回值原样透传
    ///
    /// 多个参数可以用元组传入。
    pub fn wrap<'g, A, T, E, F>(&'g self, f: F) -> impl Fn(A) -> Result<T, E> + 'g
    where
        F: Fn(A) -> Result<T, E> + 'g,
        E: fmt::Debug,
    {
        move |args| self.run(|| f(args))
    }

    /// 生成故障消息
    pub fn compose_message(&self, trace: &str) -> String {
        let program = self
            .program_name
            .clone()
            .unwrap_or_else(current_program_name);
        self.template
            .render_or_default(&FailureContext::new(program, trace))
    }

    /// 用新的发送器发送一次故障通知
    fn notify(&self, trace: &str) -> Result<SendOutcome, NotifierError> {
        let message = self.compose_message(trace);
        debug!(receiver = %self.receiver, "发送故障通知");
        self.notifier.build()?.send(&self.receiver, &message)
    }
}

/// 当前进程的程序名（`argv[0]` 的文件名）
pub fn current_program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| crate::APP_NAME.to_string())
}

/// 提取 panic 负载中的文本
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

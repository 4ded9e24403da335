//! Telegram 通知发送器模块
//!
//! 解析收件人、调用 `sendMessage`、解释响应，并按照静默/严格模式处理失败

use crate::error::NotifierError;
use crate::notification::api::{ApiResponse, SendMessageRequest, DEFAULT_API_ROOT, SEND_MESSAGE_METHOD};
use crate::notification::console::{tagged_line, Console, StdoutConsole, Tag};
use crate::notification::directory::{Receiver, RecipientDirectory};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// API 层失败的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// 输出一行提示后正常返回
    #[default]
    Quiet,
    /// 以错误形式返回给调用方
    Strict,
}

impl Mode {
    pub fn from_quiet(quiet: bool) -> Self {
        if quiet {
            Mode::Quiet
        } else {
            Mode::Strict
        }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Mode::Quiet)
    }
}

/// 单次发送的结果
#[derive(Debug)]
pub enum SendOutcome {
    /// 消息已送达
    Delivered,
    /// 静默模式下被吞掉的 API 层失败
    Suppressed(NotifierError),
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered)
    }
}

/// 通知发送器构建器
#[derive(Clone)]
pub struct NotifierBuilder {
    token: String,
    api_root: String,
    mode: Mode,
    timeout: Option<Duration>,
    directory: RecipientDirectory,
    console: Arc<dyn Console>,
}

impl NotifierBuilder {
    /// 创建构建器
    ///
    /// # 参数
    /// * `token` - Telegram 机器人 token，构造时不做校验
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_root: DEFAULT_API_ROOT.to_string(),
            mode: Mode::default(),
            timeout: None,
            directory: RecipientDirectory::new(),
            console: Arc::new(StdoutConsole),
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn quiet(self, quiet: bool) -> Self {
        self.mode(Mode::from_quiet(quiet))
    }

    /// 覆盖 Bot API 根地址（测试或自建 Bot API 服务器）
    pub fn api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into().trim_end_matches('/').to_string();
        self
    }

    /// HTTP 请求超时，默认不设置
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn directory(mut self, directory: RecipientDirectory) -> Self {
        self.directory = directory;
        self
    }

    pub fn console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn current_mode(&self) -> Mode {
        self.mode
    }

    /// 构建发送器
    ///
    /// # 返回
    /// * `Result<Notifier, NotifierError>` - 仅在 HTTP 客户端无法创建时失败
    pub fn build(&self) -> Result<Notifier, NotifierError> {
        // blocking 客户端默认 30 秒超时，这里显式使用配置值
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(NotifierError::transport)?;

        Ok(Notifier {
            client,
            base_url: format!("{}/bot{}", self.api_root, self.token),
            api_root: self.api_root.clone(),
            mode: self.mode,
            directory: self.directory.clone(),
            console: Arc::clone(&self.console),
        })
    }
}

impl fmt::Debug for NotifierBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierBuilder")
            .field("api_root", &self.api_root)
            .field("mode", &self.mode)
            .field("timeout", &self.timeout)
            .field("directory", &self.directory.len())
            .finish_non_exhaustive()
    }
}

/// Telegram 通知发送器
pub struct Notifier {
    /// HTTP客户端
    client: Client,
    /// `<api-root>/bot<token>`，含 token，不得写入日志
    base_url: String,
    api_root: String,
    mode: Mode,
    directory: RecipientDirectory,
    console: Arc<dyn Console>,
}

impl Notifier {
    /// 以默认设置创建发送器
    pub fn new(token: impl Into<String>, mode: Mode) -> Result<Self, NotifierError> {
        NotifierBuilder::new(token).mode(mode).build()
    }

    pub fn builder(token: impl Into<String>) -> NotifierBuilder {
        NotifierBuilder::new(token)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn directory(&self) -> &RecipientDirectory {
        &self.directory
    }

    /// 发送消息
    ///
    /// # 参数
    /// * `receiver` - chat_id（纯数字）或通讯录中的用户名
    /// * `message` - 消息正文
    ///
    /// # 返回
    /// * `Ok(SendOutcome::Delivered)` - 发送成功
    /// * `Ok(SendOutcome::Suppressed(_))` - 静默模式下的 API 层失败
    /// * `Err(_)` - 严格模式下的 API 层失败，或任意模式下的传输层错误
    pub fn send(&self, receiver: &str, message: &str) -> Result<SendOutcome, NotifierError> {
        let receiver = Receiver::parse(receiver);

        match self.deliver(&receiver, message) {
            Ok(()) => {
                let text = format!(
                    "Сообщение о возникшей ошибке направлено пользователю {}.",
                    receiver.identity()
                );
                info!(receiver = %receiver.identity(), "Telegram消息发送成功");
                self.console.print_line(&tagged_line(Tag::MessageSended, &text));
                Ok(SendOutcome::Delivered)
            }
            Err(err) if err.is_api_failure() && self.mode.is_quiet() => {
                let tag = match &err {
                    NotifierError::ChatIdNotFound(_) => Tag::UnknownUser,
                    _ => Tag::SendingError,
                };
                warn!(receiver = %receiver.identity(), "Telegram消息未发送: {}", err);
                self.console.print_line(&tagged_line(tag, &err.to_string()));
                Ok(SendOutcome::Suppressed(err))
            }
            Err(err) => Err(err),
        }
    }

    /// 解析收件人并调用 `sendMessage`
    fn deliver(&self, receiver: &Receiver<'_>, message: &str) -> Result<(), NotifierError> {
        let chat_id = self.directory.resolve(receiver)?;
        let url = format!("{}/{}", self.base_url, SEND_MESSAGE_METHOD);
        debug!("调用 {}/bot***/{}", self.api_root, SEND_MESSAGE_METHOD);

        let request = SendMessageRequest {
            chat_id,
            text: message,
        };
        // Bot API 的失败响应同样带 JSON 体，不按状态码判断
        let body = self
            .client
            .post(url)
            .json(&request)
            .send()
            .and_then(|response| response.text())
            .map_err(NotifierError::transport)?;
        let response: ApiResponse = serde_json::from_str(&body)?;

        if response.is_ok() {
            Ok(())
        } else {
            Err(NotifierError::SendingFailed(format!(
                "Сообщение пользователю {} не было отправлено. {}.",
                receiver.identity(),
                response.failure_reason()
            )))
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("api_root", &self.api_root)
            .field("mode", &self.mode)
            .field("directory", &self.directory.len())
            .finish_non_exhaustive()
    }
}

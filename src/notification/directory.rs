//! 收件人通讯录
//!
//! 维护 username 与 Telegram chat_id 之间的对应关系

use crate::error::NotifierError;
use std::collections::HashMap;

/// 解析后的收件人
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver<'a> {
    /// 纯数字，直接作为 chat_id 使用
    ChatId(&'a str),
    /// 用户名（不带 `@` 前缀），需要在通讯录中查找
    Username(&'a str),
}

impl<'a> Receiver<'a> {
    /// 解析原始收件人字符串
    ///
    /// 当且仅当字符串非空且全部由十进制数字组成时视为 chat_id。
    pub fn parse(raw: &'a str) -> Self {
        if is_chat_id(raw) {
            Receiver::ChatId(raw)
        } else {
            Receiver::Username(raw.strip_prefix('@').unwrap_or(raw))
        }
    }

    /// 用于控制台输出的收件人描述
    pub fn identity(&self) -> String {
        match self {
            Receiver::ChatId(id) => format!("с chat_id {id}"),
            Receiver::Username(name) => format!("@{name}"),
        }
    }
}

/// 判断字符串是否为合法的 chat_id
pub fn is_chat_id(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// 收件人通讯录
///
/// 在构建 [`Notifier`](super::Notifier) 之前填充，之后只读。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientDirectory {
    entries: HashMap<String, String>,
}

impl RecipientDirectory {
    /// 创建空通讯录
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加或覆盖一条记录，用户名的 `@` 前缀会被去掉
    pub fn insert(&mut self, username: impl AsRef<str>, chat_id: impl Into<String>) {
        let username = username.as_ref();
        let username = username.strip_prefix('@').unwrap_or(username);
        self.entries.insert(username.to_string(), chat_id.into());
    }

    /// 链式添加记录
    pub fn with(mut self, username: impl AsRef<str>, chat_id: impl Into<String>) -> Self {
        self.insert(username, chat_id);
        self
    }

    /// 按用户名查找 chat_id
    pub fn get(&self, username: &str) -> Option<&str> {
        self.entries.get(username).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 将收件人解析为 chat_id
    ///
    /// 数字收件人不会查询通讯录。
    ///
    /// # 返回
    /// * `Result<&str, NotifierError>` - chat_id，或 `ChatIdNotFound`
    pub fn resolve<'a>(&'a self, receiver: &Receiver<'a>) -> Result<&'a str, NotifierError> {
        match *receiver {
            Receiver::ChatId(id) => Ok(id),
            Receiver::Username(name) => self.get(name).ok_or_else(|| {
                NotifierError::ChatIdNotFound(format!(
                    "Отсутствует информация о chat_id пользователя @{name} в справочнике получателей."
                ))
            }),
        }
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RecipientDirectory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut directory = Self::new();
        for (username, chat_id) in iter {
            directory.insert(username, chat_id);
        }
        directory
    }
}

//! 控制台输出
//!
//! 三种带标签的输出行是对外稳定的格式，下游工具可能会解析它们

use std::fmt;

/// 控制台输出行的标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// 通讯录中找不到收件人
    UnknownUser,
    /// Bot API 返回失败
    SendingError,
    /// 发送成功
    MessageSended,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::UnknownUser => "[UNKNOWN USER]",
            Tag::SendingError => "[SENDING ERROR]",
            Tag::MessageSended => "[MESSAGE SENDED]",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 控制台输出目标
pub trait Console: Send + Sync {
    /// 输出一行文本
    fn print_line(&self, line: &str);
}

/// 标准输出
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn print_line(&self, line: &str) {
        println!("{line}");
    }
}

/// 拼接带标签的输出行
pub fn tagged_line(tag: Tag, text: &str) -> String {
    format!("{tag} {text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_line_format() {
        assert_eq!(
            tagged_line(Tag::MessageSended, "ok"),
            "[MESSAGE SENDED] ok"
        );
        assert_eq!(Tag::UnknownUser.to_string(), "[UNKNOWN USER]");
        assert_eq!(Tag::SendingError.as_str(), "[SENDING ERROR]");
    }
}

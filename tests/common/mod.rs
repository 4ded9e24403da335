//! 集成测试公共工具

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use telegram_catch::notification::Console;
use telegram_catch::{Mode, NotifierBuilder};

pub const TOKEN: &str = "TEST-TOKEN";
pub const SEND_PATH: &str = "/botTEST-TOKEN/sendMessage";

/// 记录输出行的控制台
#[derive(Debug, Clone, Default)]
pub struct RecordingConsole {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Console for RecordingConsole {
    fn print_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

/// 指向 mock 服务器的构建器
pub fn builder(server: &mockito::Server, mode: Mode, console: &RecordingConsole) -> NotifierBuilder {
    NotifierBuilder::new(TOKEN)
        .api_root(server.url())
        .mode(mode)
        .console(Arc::new(console.clone()))
}

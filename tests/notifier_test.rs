//! 通知发送器测试
//!
//! 使用 mockito 模拟 Bot API，验证收件人解析、响应解释和静默/严格模式

mod common;

use common::{builder, RecordingConsole, SEND_PATH};
use mockito::Matcher;
use serde_json::json;
use telegram_catch::{Mode, NotifierError, RecipientDirectory, SendOutcome};

const CHAT_NOT_FOUND: &str =
    r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;

#[test]
fn test_numeric_receiver_delivered_in_both_modes() {
    for mode in [Mode::Quiet, Mode::Strict] {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", SEND_PATH)
            .match_body(Matcher::Json(json!({"chat_id": "555", "text": "hello\nworld"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true,"result":{}}"#)
            .expect(1)
            .create();

        let console = RecordingConsole::default();
        // 通讯录中的同名键不应被查询
        let notifier = builder(&server, mode, &console)
            .directory(RecipientDirectory::new().with("555", "999"))
            .build()
            .unwrap();

        let outcome = notifier.send("555", "hello\nworld").unwrap();
        assert!(outcome.is_delivered());
        mock.assert();

        assert_eq!(
            console.lines(),
            vec!["[MESSAGE SENDED] Сообщение о возникшей ошибке направлено пользователю с chat_id 555."]
        );
    }
}

#[test]
fn test_username_resolved_through_directory() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", SEND_PATH)
        .match_body(Matcher::PartialJson(json!({"chat_id": "777"})))
        .with_body(r#"{"ok":true}"#)
        .expect(1)
        .create();

    let console = RecordingConsole::default();
    let notifier = builder(&server, Mode::Strict, &console)
        .directory(RecipientDirectory::new().with("alice", "777"))
        .build()
        .unwrap();

    notifier.send("alice", "text").unwrap();
    mock.assert();
    assert_eq!(console.lines().len(), 1);
    assert!(console.lines()[0].ends_with("пользователю @alice."));
}

#[test]
fn test_unknown_username_quiet() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();

    let console = RecordingConsole::default();
    let notifier = builder(&server, Mode::Quiet, &console).build().unwrap();

    let outcome = notifier.send("ghost", "text").unwrap();
    assert!(matches!(
        outcome,
        SendOutcome::Suppressed(NotifierError::ChatIdNotFound(_))
    ));
    mock.assert();

    let lines = console.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[UNKNOWN USER] "));
    assert!(lines[0].contains("@ghost"));
}

#[test]
fn test_unknown_username_strict() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", Matcher::Any).expect(0).create();

    let console = RecordingConsole::default();
    let notifier = builder(&server, Mode::Strict, &console).build().unwrap();

    let err = notifier.send("ghost", "text").unwrap_err();
    assert!(matches!(err, NotifierError::ChatIdNotFound(_)));
    assert!(err.to_string().contains("@ghost"));
    mock.assert();
    assert!(console.lines().is_empty());
}

#[test]
fn test_chat_not_found_quiet() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", SEND_PATH)
        .with_status(400)
        .with_body(CHAT_NOT_FOUND)
        .expect(1)
        .create();

    let console = RecordingConsole::default();
    let notifier = builder(&server, Mode::Quiet, &console).build().unwrap();

    let outcome = notifier.send("123", "text").unwrap();
    assert!(matches!(
        outcome,
        SendOutcome::Suppressed(NotifierError::SendingFailed(_))
    ));
    mock.assert();

    let lines = console.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[SENDING ERROR] Сообщение пользователю с chat_id 123 не было отправлено."));
    assert!(lines[0].contains("Диалог не найден"));
}

#[test]
fn test_chat_not_found_strict() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", SEND_PATH)
        .with_status(400)
        .with_body(CHAT_NOT_FOUND)
        .create();

    let console = RecordingConsole::default();
    let notifier = builder(&server, Mode::Strict, &console).build().unwrap();

    let err = notifier.send("123", "text").unwrap_err();
    assert!(matches!(err, NotifierError::SendingFailed(_)));
    assert!(err.to_string().contains("Диалог не найден"));
    assert!(console.lines().is_empty());
}

#[test]
fn test_unauthorized_translated_in_both_modes() {
    let body = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#;

    let mut server = mockito::Server::new();
    server
        .mock("POST", SEND_PATH)
        .with_status(401)
        .with_body(body)
        .expect(2)
        .create();

    let console = RecordingConsole::default();
    let quiet = builder(&server, Mode::Quiet, &console).build().unwrap();
    quiet.send("1", "text").unwrap();
    assert!(console.lines()[0].contains("Бот с указанным токеном не найден"));

    let strict = builder(&server, Mode::Strict, &console).build().unwrap();
    let err = strict.send("1", "text").unwrap_err();
    assert!(err.to_string().contains("Бот с указанным токеном не найден"));
    assert!(!err.to_string().contains("Unauthorized"));
}

#[test]
fn test_missing_description_uses_default_reason() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", SEND_PATH)
        .with_body(r#"{"ok":false}"#)
        .create();

    let console = RecordingConsole::default();
    let notifier = builder(&server, Mode::Strict, &console).build().unwrap();

    let err = notifier.send("1", "text").unwrap_err();
    assert!(err
        .to_string()
        .contains("Информация о причине ошибки не найдена"));
}

#[test]
fn test_unknown_description_passes_through() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", SEND_PATH)
        .with_status(403)
        .with_body(r#"{"ok":false,"description":"Forbidden: bot was blocked by the user"}"#)
        .create();

    let console = RecordingConsole::default();
    let notifier = builder(&server, Mode::Quiet, &console).build().unwrap();

    notifier.send("1", "text").unwrap();
    assert!(console.lines()[0].contains("Forbidden: bot was blocked by the user."));
}

#[test]
fn test_malformed_response_propagates_in_quiet_mode() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", SEND_PATH)
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create();

    let console = RecordingConsole::default();
    let notifier = builder(&server, Mode::Quiet, &console).build().unwrap();

    let err = notifier.send("1", "text").unwrap_err();
    assert!(matches!(err, NotifierError::Decode(_)));
    assert!(!err.is_api_failure());
    assert!(console.lines().is_empty());
}

#[test]
fn test_connection_failure_propagates_in_quiet_mode() {
    let console = RecordingConsole::default();
    let notifier = telegram_catch::NotifierBuilder::new("t")
        .api_root("http://127.0.0.1:9")
        .mode(Mode::Quiet)
        .console(std::sync::Arc::new(console.clone()))
        .build()
        .unwrap();

    let err = notifier.send("1", "text").unwrap_err();
    assert!(matches!(err, NotifierError::Transport(_)));
    assert!(console.lines().is_empty());
}

#[test]
fn test_transport_error_does_not_expose_token() {
    let notifier = telegram_catch::NotifierBuilder::new("123:SUPERSECRET")
        .api_root("http://127.0.0.1:9")
        .mode(Mode::Strict)
        .build()
        .unwrap();

    let err = notifier.send("1", "text").unwrap_err();
    assert!(matches!(err, NotifierError::Transport(_)));
    assert!(!err.to_string().contains("SUPERSECRET"));
    assert!(!format!("{err:?}").contains("SUPERSECRET"));
}

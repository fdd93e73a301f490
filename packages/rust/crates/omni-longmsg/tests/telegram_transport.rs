#![allow(missing_docs)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use omni_longmsg::{
    DeliveryMode, Dialect, MessageId, TelegramTransport, Transport, TransportError, deliver,
    parse_recipient_target, split,
};
use tokio::sync::Mutex;

type ScriptedReply = (StatusCode, serde_json::Value);

#[derive(Clone, Default)]
struct MockTelegramState {
    requests: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    next_message_id: Arc<Mutex<i64>>,
}

impl MockTelegramState {
    async fn reply(&self, method: &str, payload: serde_json::Value) -> ScriptedReply {
        self.requests
            .lock()
            .await
            .push((method.to_string(), payload));
        if let Some(reply) = self.script.lock().await.pop_front() {
            return reply;
        }
        if method == "editMessageText" {
            return (
                StatusCode::OK,
                serde_json::json!({"ok": true, "result": true}),
            );
        }
        let mut next = self.next_message_id.lock().await;
        *next += 1;
        (
            StatusCode::OK,
            serde_json::json!({"ok": true, "result": {"message_id": *next}}),
        )
    }
}

async fn handle_send_message(
    State(state): State<MockTelegramState>,
    Json(payload): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (status, body) = state.reply("sendMessage", payload).await;
    (status, Json(body))
}

async fn handle_edit_message_text(
    State(state): State<MockTelegramState>,
    Json(payload): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (status, body) = state.reply("editMessageText", payload).await;
    (status, Json(body))
}

async fn spawn_mock_telegram_api(
    script: Vec<ScriptedReply>,
) -> Result<Option<(String, MockTelegramState, tokio::task::JoinHandle<()>)>> {
    let state = MockTelegramState {
        script: Arc::new(Mutex::new(script.into())),
        ..MockTelegramState::default()
    };

    let app = Router::new()
        .route("/botfake-token/sendMessage", post(handle_send_message))
        .route(
            "/botfake-token/editMessageText",
            post(handle_edit_message_text),
        )
        .with_state(state.clone());
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("skipping telegram mock api tests: local socket bind is not permitted");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    wait_for_listener(addr).await;

    Ok(Some((format!("http://{addr}"), state, handle)))
}

async fn wait_for_listener(addr: std::net::SocketAddr) {
    for _ in 0..20 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

fn transport(api_base: String) -> TelegramTransport {
    TelegramTransport::new("fake-token").with_api_base(api_base)
}

#[test]
fn parse_recipient_target_splits_thread_suffix() {
    assert_eq!(parse_recipient_target("123456:42"), ("123456", Some("42")));
    assert_eq!(parse_recipient_target("-100987"), ("-100987", None));
    assert_eq!(parse_recipient_target("123456:"), ("123456:", None));
}

#[tokio::test]
async fn telegram_send_uses_dialect_parse_mode_and_thread() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api(Vec::new()).await? else {
        return Ok(());
    };

    let id = transport(api_base)
        .send("123456:42", "*hi*", Some(Dialect::MarkdownV2))
        .await?;

    assert_eq!(id, MessageId::from(1));
    let requests = state.requests.lock().await;
    assert_eq!(requests.len(), 1);
    let (method, payload) = &requests[0];
    assert_eq!(method, "sendMessage");
    assert_eq!(payload["chat_id"], "123456");
    assert_eq!(payload["message_thread_id"], "42");
    assert_eq!(payload["text"], "*hi*");
    assert_eq!(payload["parse_mode"], "MarkdownV2");
    assert_eq!(payload["link_preview_options"]["is_disabled"], true);

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_send_without_formatting_omits_parse_mode() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api(Vec::new()).await? else {
        return Ok(());
    };

    transport(api_base).send("123456", "plain", None).await?;

    let requests = state.requests.lock().await;
    assert!(requests[0].1.get("parse_mode").is_none());
    assert!(requests[0].1.get("message_thread_id").is_none());

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_errors_are_classified() -> Result<()> {
    let script = vec![
        (
            StatusCode::BAD_REQUEST,
            serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: can't parse entities: Can't find end of the entity starting at byte offset 0"
            }),
        ),
        (
            StatusCode::OK,
            serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: can't find end tag corresponding to start tag b"
            }),
        ),
        (
            StatusCode::TOO_MANY_REQUESTS,
            serde_json::json!({
                "ok": false,
                "error_code": 429,
                "description": "Too Many Requests: retry after 3",
                "parameters": {"retry_after": 3}
            }),
        ),
        (
            StatusCode::FORBIDDEN,
            serde_json::json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            }),
        ),
        (
            StatusCode::BAD_REQUEST,
            serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            }),
        ),
    ];
    let Some((api_base, _state, handle)) = spawn_mock_telegram_api(script).await? else {
        return Ok(());
    };
    let transport = transport(api_base);
    let mut errors = Vec::new();
    for _ in 0..5 {
        let error = transport
            .send("1", "x", Some(Dialect::Html))
            .await
            .unwrap_err();
        errors.push(error);
    }

    assert!(matches!(errors[0], TransportError::MarkupRejected(_)));
    assert!(matches!(errors[1], TransportError::MarkupRejected(_)));
    assert_eq!(
        errors[2],
        TransportError::RateLimited {
            retry_after_secs: Some(3),
            description: "Too Many Requests: retry after 3".to_string(),
        }
    );
    assert!(matches!(errors[3], TransportError::Permission(_)));
    assert_eq!(
        errors[4],
        TransportError::Api {
            code: Some(400),
            description: "Bad Request: chat not found".to_string(),
        }
    );

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_replies_without_usable_envelope_keep_raw_body() -> Result<()> {
    let script = vec![
        (
            StatusCode::BAD_GATEWAY,
            serde_json::Value::String("Bad Gateway".to_string()),
        ),
        (
            StatusCode::BAD_REQUEST,
            serde_json::json!({"ok": false, "error_code": 400, "description": ""}),
        ),
        (
            StatusCode::OK,
            serde_json::json!({
                "ok": false,
                "error_code": 429,
                "parameters": {"retry_after": 7}
            }),
        ),
    ];
    let Some((api_base, _state, handle)) = spawn_mock_telegram_api(script).await? else {
        return Ok(());
    };
    let transport = transport(api_base);

    let gateway = transport.send("1", "x", None).await.unwrap_err();
    assert_eq!(
        gateway,
        TransportError::Api {
            code: Some(502),
            description: "\"Bad Gateway\"".to_string(),
        }
    );

    let blank = transport.send("1", "x", None).await.unwrap_err();
    let TransportError::Api { code, description } = blank else {
        panic!("expected api error, got {blank:?}");
    };
    assert_eq!(code, Some(400));
    assert!(description.contains("error_code"), "{description}");

    let limited = transport.send("1", "x", None).await.unwrap_err();
    assert!(
        matches!(
            limited,
            TransportError::RateLimited {
                retry_after_secs: Some(7),
                ..
            }
        ),
        "{limited:?}"
    );

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn telegram_unreachable_server_is_network_error() -> Result<()> {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    let addr = listener.local_addr()?;
    drop(listener);

    let error = transport(format!("http://{addr}"))
        .send("1", "x", None)
        .await
        .unwrap_err();

    assert!(matches!(error, TransportError::Network(_)), "{error:?}");
    Ok(())
}

#[tokio::test]
async fn telegram_edit_reuses_id_when_result_is_true() -> Result<()> {
    let Some((api_base, state, handle)) = spawn_mock_telegram_api(Vec::new()).await? else {
        return Ok(());
    };

    let id = transport(api_base)
        .edit("123456", &MessageId::from(77), "<b>x</b>", Some(Dialect::Html))
        .await?;

    assert_eq!(id, MessageId::from(77));
    let requests = state.requests.lock().await;
    let (method, payload) = &requests[0];
    assert_eq!(method, "editMessageText");
    assert_eq!(payload["message_id"], 77);
    assert_eq!(payload["parse_mode"], "HTML");

    handle.abort();
    Ok(())
}

#[tokio::test]
async fn deliver_falls_back_to_plain_text_against_bot_api() -> Result<()> {
    let script = vec![(
        StatusCode::BAD_REQUEST,
        serde_json::json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: can't parse entities"
        }),
    )];
    let Some((api_base, state, handle)) = spawn_mock_telegram_api(script).await? else {
        return Ok(());
    };
    let chunks = split("*first\nsecond*\n", 10, Dialect::MarkdownV2)?;
    assert_eq!(chunks.len(), 2);

    let result = deliver(
        &chunks,
        "123456",
        &transport(api_base),
        &DeliveryMode::styled(Dialect::MarkdownV2),
        None,
    )
    .await?;

    assert_eq!(result.ids, vec![MessageId::from(1), MessageId::from(2)]);
    assert_eq!(result.fallback_indices, vec![0]);
    let requests = state.requests.lock().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].1["parse_mode"], "MarkdownV2");
    assert!(requests[1].1.get("parse_mode").is_none());
    assert_eq!(requests[1].1["text"], requests[0].1["text"]);
    assert_eq!(requests[2].1["parse_mode"], "MarkdownV2");

    handle.abort();
    Ok(())
}

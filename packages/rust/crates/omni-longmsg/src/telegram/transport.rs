use std::time::Duration;

use async_trait::async_trait;

use super::error::TelegramApiError;
use super::identity::parse_recipient_target;
use super::response::read_telegram_result;
use crate::delivery::{MessageId, Transport, TransportError};
use crate::dialect::Dialect;

const TELEGRAM_DEFAULT_API_BASE: &str = "https://api.telegram.org";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] over the Telegram Bot API (`sendMessage`, `editMessageText`).
///
/// Recipients are `chat_id` or `chat_id:thread_id`. Failures are classified
/// into [`TransportError`] and never retried here.
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    client: reqwest::Client,
    api_base_url: String,
    bot_token: String,
}

impl TelegramTransport {
    /// Transport for `bot_token` against the public Bot API.
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            client: build_http_client(DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT),
            api_base_url: TELEGRAM_DEFAULT_API_BASE.to_string(),
            bot_token: bot_token.into(),
        }
    }

    /// Point the transport at another Bot API server (local server, mock).
    #[must_use]
    pub fn with_api_base(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Replace the HTTP client with one using the given timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.client = build_http_client(connect, request);
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base_url.trim_end_matches('/'),
            self.bot_token
        )
    }

    fn message_body(recipient: &str, text: &str, formatting: Option<Dialect>) -> serde_json::Value {
        let (chat_id, thread_id) = parse_recipient_target(recipient);
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "link_preview_options": { "is_disabled": true },
        });
        if let Some(dialect) = formatting {
            body["parse_mode"] = serde_json::json!(dialect.parse_mode());
        }
        if let Some(thread_id) = thread_id {
            body["message_thread_id"] = serde_json::json!(thread_id);
        }
        body
    }

    async fn call(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, TelegramApiError> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|error| TelegramApiError::unreachable(&error))?;
        read_telegram_result(response).await
    }
}

fn build_http_client(connect: Duration, request: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(connect)
        .timeout(request)
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!(
                error = %error,
                "failed to build Telegram HTTP client with timeouts; using default client"
            );
            reqwest::Client::new()
        })
}

fn message_id_from_result(result: &serde_json::Value) -> Option<MessageId> {
    result
        .get("message_id")
        .and_then(serde_json::Value::as_i64)
        .map(MessageId::from)
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send(
        &self,
        recipient: &str,
        text: &str,
        formatting: Option<Dialect>,
    ) -> Result<MessageId, TransportError> {
        let body = Self::message_body(recipient, text, formatting);
        let result = self.call("sendMessage", &body).await?;
        message_id_from_result(&result).ok_or_else(|| TransportError::Api {
            code: None,
            description: format!("sendMessage result without message_id: {result}"),
        })
    }

    async fn edit(
        &self,
        recipient: &str,
        message_id: &MessageId,
        text: &str,
        formatting: Option<Dialect>,
    ) -> Result<MessageId, TransportError> {
        let mut body = Self::message_body(recipient, text, formatting);
        body["message_id"] = match message_id.as_str().parse::<i64>() {
            Ok(id) => serde_json::json!(id),
            Err(_) => serde_json::json!(message_id.as_str()),
        };
        let result = self.call("editMessageText", &body).await?;
        // Inline messages answer `true` instead of the edited message.
        Ok(message_id_from_result(&result).unwrap_or_else(|| message_id.clone()))
    }
}

use reqwest::StatusCode;
use serde::Deserialize;

use super::error::TelegramApiError;

/// Bot API reply envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

impl Envelope {
    fn into_error(self, status: StatusCode, raw: String) -> TelegramApiError {
        TelegramApiError {
            status: Some(status),
            code: self.error_code,
            retry_after_secs: self.parameters.and_then(|parameters| parameters.retry_after),
            description: self
                .description
                .filter(|description| !description.is_empty())
                .unwrap_or(raw),
        }
    }
}

/// Check a Bot API response and return its `result` payload.
pub(super) async fn read_telegram_result(
    response: reqwest::Response,
) -> Result<serde_json::Value, TelegramApiError> {
    let status = response.status();
    let raw = response.text().await.unwrap_or_default();
    let envelope = serde_json::from_str::<Envelope>(&raw).ok();

    if !status.is_success() {
        return Err(match envelope {
            Some(envelope) => envelope.into_error(status, raw),
            None => TelegramApiError::with_status(status, raw),
        });
    }

    let Some(envelope) = envelope else {
        return Err(TelegramApiError::with_status(
            status,
            format!("failed to parse Telegram success response: {raw}"),
        ));
    };
    if envelope.ok == Some(false) {
        return Err(envelope.into_error(status, raw));
    }
    Ok(envelope.result.unwrap_or_default())
}

use reqwest::StatusCode;

use crate::delivery::TransportError;

/// Bad-request descriptions Telegram uses for `parse_mode` failures.
const MARKUP_REJECTION_HINTS: &[&str] = &[
    "can't parse",
    "can't find end tag",
    "unsupported start tag",
    "wrong entity",
];

/// Raw Bot API failure before it is classified for the delivery adapter.
///
/// `status` is `None` when the request never got an HTTP answer.
#[derive(Debug)]
pub(super) struct TelegramApiError {
    pub(super) status: Option<StatusCode>,
    pub(super) code: Option<i64>,
    pub(super) retry_after_secs: Option<u64>,
    pub(super) description: String,
}

impl TelegramApiError {
    /// The request failed before the Bot API answered.
    pub(super) fn unreachable(err: &reqwest::Error) -> Self {
        let description = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        Self {
            status: None,
            code: None,
            retry_after_secs: None,
            description,
        }
    }

    /// An HTTP answer without a usable envelope.
    pub(super) fn with_status(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            code: None,
            retry_after_secs: None,
            description: description.into(),
        }
    }

    fn is_markup_rejection(&self) -> bool {
        if self.status != Some(StatusCode::BAD_REQUEST) && self.code != Some(400) {
            return false;
        }
        let description = self.description.to_ascii_lowercase();
        MARKUP_REJECTION_HINTS
            .iter()
            .any(|hint| description.contains(hint))
    }

    fn is_rate_limited(&self) -> bool {
        self.status == Some(StatusCode::TOO_MANY_REQUESTS) || self.code == Some(429)
    }

    fn is_permission_denied(&self) -> bool {
        matches!(
            self.status,
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        ) || matches!(self.code, Some(401 | 403))
    }

    fn is_network(&self) -> bool {
        self.status.is_none() && self.code.is_none()
    }
}

impl From<TelegramApiError> for TransportError {
    fn from(error: TelegramApiError) -> Self {
        if error.is_markup_rejection() {
            Self::MarkupRejected(error.description)
        } else if error.is_rate_limited() {
            Self::RateLimited {
                retry_after_secs: error.retry_after_secs,
                description: error.description,
            }
        } else if error.is_permission_denied() {
            Self::Permission(error.description)
        } else if error.is_network() {
            Self::Network(error.description)
        } else {
            Self::Api {
                code: error
                    .code
                    .or_else(|| error.status.map(|status| i64::from(status.as_u16()))),
                description: error.description,
            }
        }
    }
}

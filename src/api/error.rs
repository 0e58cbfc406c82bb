use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    /// 401, or 403 on an API path. The session has already been cleared.
    #[error("not authenticated (HTTP {status})")]
    Unauthorized { status: u16, message: Option<String> },

    #[error("request failed with HTTP {status}")]
    Status { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text the server put in its error body, if any.
    pub(crate) fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message, .. } | Self::Status { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub(crate) fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }

    pub(crate) fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Error body shape used by the backend (`erro`), with `message` as the
/// generic fallback some proxies produce.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    #[serde(default)]
    erro: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    pub(super) fn parse(bytes: &[u8]) -> Option<String> {
        let body: ErrorBody = serde_json::from_slice(bytes).ok()?;
        body.erro
            .or(body.message)
            .filter(|m| !m.trim().is_empty())
    }
}

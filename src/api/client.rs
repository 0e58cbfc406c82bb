use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::{ApiError, ErrorBody};
use crate::config::Config;
use crate::routes::{Navigator, Route};
use crate::session::SessionStore;

/// HTTP client for the finance backend.
///
/// Every request goes through [`ApiClient::execute`], which attaches the
/// current bearer token and inspects the response status. A 401, or a 403 on
/// a path under the API prefix, expires the session and redirects to the
/// login view; every other failure is handed back to the caller untouched.
pub(crate) struct ApiClient {
    http: Client,
    base_url: String,
    prefix: String,
    session: Arc<SessionStore>,
    navigator: Navigator,
}

impl ApiClient {
    pub(crate) fn new(
        config: &Config,
        session: Arc<SessionStore>,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            prefix: normalize_prefix(&config.api_prefix),
            session,
            navigator,
        })
    }

    pub(crate) fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Prepends the configured API prefix to an endpoint path.
    pub(crate) fn api_path(&self, path: &str) -> String {
        format!("{}{path}", self.prefix)
    }

    pub(crate) fn is_api_path(&self, path: &str) -> bool {
        self.prefix.is_empty()
            || path == self.prefix
            || path
                .strip_prefix(self.prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Sends one request. `path` is relative to the base URL and already
    /// includes the API prefix when it targets the API.
    #[tracing::instrument(name = "api", skip_all, fields(method = %method, path = %path))]
    pub(crate) async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let start = Instant::now();
        let token = self.session.token();

        let mut req = self
            .http
            .request(method, format!("{}{path}", self.base_url));
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(token) = token.as_deref() {
            req = req.bearer_auth(token);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!(error = %e, "Network error");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let duration_ms = start.elapsed().as_millis() as u64;
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), duration_ms, "Request ok");
            return Ok(response);
        }

        let message = match response.bytes().await {
            Ok(bytes) => ErrorBody::parse(&bytes),
            Err(_) => None,
        };

        if is_auth_failure(status, self.is_api_path(path)) {
            tracing::warn!(status = status.as_u16(), duration_ms, "Authentication rejected");
            if self.session.expire(token.as_deref()) {
                self.navigator.redirect(Route::Login);
            }
            return Err(ApiError::Unauthorized {
                status: status.as_u16(),
                message,
            });
        }

        tracing::warn!(
            status = status.as_u16(),
            duration_ms,
            error = message.as_deref().unwrap_or(""),
            "Request failed"
        );
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self
            .execute::<()>(Method::GET, &self.api_path(path), query, None)
            .await?;
        decode(resp).await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .execute(method, &self.api_path(path), &[], Some(body))
            .await?;
        decode(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute::<()>(Method::DELETE, &self.api_path(path), &[], None)
            .await?;
        Ok(())
    }

    /// Binary GET. Returns the body and the filename from
    /// `Content-Disposition`, when the server sent one.
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(Option<String>, Vec<u8>), ApiError> {
        let resp = self
            .execute::<()>(Method::GET, &self.api_path(path), query, None)
            .await?;
        let filename = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(attachment_filename);
        let bytes = resp.bytes().await?;
        Ok((filename, bytes.to_vec()))
    }
}

pub(super) fn is_auth_failure(status: StatusCode, is_api_path: bool) -> bool {
    status == StatusCode::UNAUTHORIZED || (status == StatusCode::FORBIDDEN && is_api_path)
}

/// `"api/"` → `"/api"`, `""` or `"/"` → `""`.
pub(super) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Extracts `filename` from a `Content-Disposition` header value.
pub(super) fn attachment_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

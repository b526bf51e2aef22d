//! HTTP transport for Homarr API calls
//!
//! One request per call. The caller picks the credential mode; the
//! transport never infers it from the path.

use crate::config::ConnectionConfig;
use crate::error::{HomarrError, RemoteError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use std::fmt;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header carrying the REST API key
pub const API_KEY_HEADER: &str = "ApiKey";

/// Cookie name carrying the tRPC session token
pub const SESSION_COOKIE: &str = "authjs.session-token";

const COOKIE_HEADER: &str = "Cookie";

/// Which credential a request is authenticated with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// `ApiKey` header
    Rest,
    /// `authjs.session-token` cookie
    Rpc,
}

impl AuthMode {
    pub fn credential_name(self) -> &'static str {
        match self {
            AuthMode::Rest => "an API key",
            AuthMode::Rpc => "a session token",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::Rest => f.write_str("REST"),
            AuthMode::Rpc => f.write_str("tRPC"),
        }
    }
}

/// Fully buffered response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Select the single header that authenticates a request in `mode`.
///
/// Returns the header name and value. Only the credential for the requested
/// mode is ever returned, even when both are configured.
pub fn credential_header(
    config: &ConnectionConfig,
    mode: AuthMode,
) -> Result<(&'static str, String)> {
    match mode {
        AuthMode::Rest => config
            .api_key()
            .map(|key| (API_KEY_HEADER, key.to_string()))
            .ok_or(HomarrError::MissingCredential { mode }),
        AuthMode::Rpc => config
            .session_token()
            .map(|token| (COOKIE_HEADER, format!("{SESSION_COOKIE}={token}")))
            .ok_or(HomarrError::MissingCredential { mode }),
    }
}

/// HTTP transport bound to one Homarr instance
#[derive(Clone)]
pub struct Transport {
    client: Client,
    config: ConnectionConfig,
}

impl Transport {
    /// Create a new transport. The connection config is owned for the
    /// transport's lifetime.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("homarrctl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Issue one request and buffer the whole response body.
    ///
    /// `path` is appended to the base URL verbatim and may carry a query
    /// string. In [`AuthMode::Rest`] a non-2xx status fails with
    /// [`RemoteError::Status`]; in [`AuthMode::Rpc`] the response is returned
    /// as-is because the envelope carries its own error channel.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        mode: AuthMode,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        let (header, credential) = credential_header(&self.config, mode)?;
        let url = format!("{}{}", self.config.base_url(), path);

        tracing::debug!("{} {}", method, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header, credential)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        // Reading to the end releases the connection back to the pool on
        // every path, including error statuses.
        let body = response.bytes().await?.to_vec();
        let raw = RawResponse { status, body };

        if mode == AuthMode::Rest && !status.is_success() {
            let text = raw.body_text();
            tracing::error!(
                "API error: {} {} - {} - {}",
                method,
                path,
                status,
                sanitize_for_log(&text)
            );
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        Ok(raw)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, token: Option<&str>) -> ConnectionConfig {
        ConnectionConfig::new(
            "http://homarr.local",
            api_key.map(String::from),
            token.map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn test_rest_mode_uses_api_key_only() {
        let config = config(Some("key-1"), Some("tok-1"));
        let (name, value) = credential_header(&config, AuthMode::Rest).unwrap();
        assert_eq!(name, "ApiKey");
        assert_eq!(value, "key-1");
        assert!(!value.contains("tok-1"));
    }

    #[test]
    fn test_rpc_mode_uses_session_cookie_only() {
        let config = config(Some("key-1"), Some("tok-1"));
        let (name, value) = credential_header(&config, AuthMode::Rpc).unwrap();
        assert_eq!(name, "Cookie");
        assert_eq!(value, "authjs.session-token=tok-1");
        assert!(!value.contains("key-1"));
    }

    #[test]
    fn test_missing_credential_for_mode() {
        let rest_only = config(Some("key-1"), None);
        let err = credential_header(&rest_only, AuthMode::Rpc).unwrap_err();
        assert!(matches!(err, HomarrError::MissingCredential { mode: AuthMode::Rpc }));

        let rpc_only = config(None, Some("tok-1"));
        let err = credential_header(&rpc_only, AuthMode::Rest).unwrap_err();
        assert!(matches!(err, HomarrError::MissingCredential { mode: AuthMode::Rest }));
    }

    #[test]
    fn test_sanitize_truncates_and_strips_control_chars() {
        let long = "x".repeat(500);
        let sanitized = sanitize_for_log(&long);
        assert!(sanitized.starts_with(&"x".repeat(200)));
        assert!(sanitized.contains("truncated, 500 bytes total"));

        assert_eq!(sanitize_for_log("a\nb\tc"), "abc");
    }

    #[test]
    fn test_sanitize_respects_char_boundaries() {
        let body = "é".repeat(150);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.contains("truncated"));
    }
}

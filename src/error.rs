//! Error types
//!
//! Every failure the client can produce is one of the [`HomarrError`]
//! variants. Entity operations wrap lower-level errors in
//! [`HomarrError::Context`] so the message names the operation that failed;
//! use [`HomarrError::root_cause`] to classify.

use crate::homarr::http::AuthMode;
use thiserror::Error;

/// Result type using HomarrError.
pub type Result<T> = std::result::Result<T, HomarrError>;

/// Error reported by the remote Homarr instance.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Non-2xx HTTP status. The body is kept verbatim.
    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    /// Error branch of a tRPC envelope, reported regardless of HTTP status.
    #[error("tRPC error: {message}")]
    Rpc { message: String, code: Option<i64> },
}

/// Errors that can occur when talking to Homarr.
#[derive(Debug, Error)]
pub enum HomarrError {
    /// Connection configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The call needs a credential that was not configured.
    #[error("{mode} calls require {}, which is not configured", .mode.credential_name())]
    MissingCredential { mode: AuthMode },

    /// Network or connection failure. Never retried.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the request.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Business error nested inside an otherwise successful tRPC payload.
    #[error("application error: {message}")]
    Application {
        message: String,
        kind: Option<String>,
    },

    /// Caller-supplied input was rejected before anything was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A record that should exist could not be located.
    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    /// Malformed JSON.
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// An error annotated with the operation that produced it.
    #[error("{operation}: {source}")]
    Context {
        operation: String,
        #[source]
        source: Box<HomarrError>,
    },
}

impl HomarrError {
    pub(crate) fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }

    pub(crate) fn not_found(resource: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            key: key.into(),
        }
    }

    /// The innermost error, with all [`HomarrError::Context`] layers removed.
    pub fn root_cause(&self) -> &HomarrError {
        let mut current = self;
        while let HomarrError::Context { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// Whether the remote system reported the target as absent.
    pub fn is_not_found(&self) -> bool {
        match self.root_cause() {
            HomarrError::NotFound { .. } => true,
            HomarrError::Remote(RemoteError::Status { status, .. }) => *status == 404,
            HomarrError::Remote(RemoteError::Rpc { code, .. }) => *code == Some(TRPC_NOT_FOUND),
            _ => false,
        }
    }

    /// Short operator-facing explanation for common failures.
    pub fn user_hint(&self) -> Option<&'static str> {
        match self.root_cause() {
            HomarrError::MissingCredential { mode: AuthMode::Rest } => {
                Some("Set --api-key or HOMARR_API_KEY.")
            }
            HomarrError::MissingCredential { mode: AuthMode::Rpc } => {
                Some("Set --session-token or HOMARR_SESSION_TOKEN (authjs.session-token cookie value).")
            }
            HomarrError::Remote(RemoteError::Status { status, .. }) => match status {
                401 => Some("Authentication failed. Check the API key or session token."),
                403 => Some("Permission denied. The credential lacks access to this resource."),
                404 => Some("Resource not found."),
                429 => Some("Rate limit exceeded. Please try again later."),
                500..=599 => Some("Homarr is temporarily unavailable. Please try again."),
                _ => None,
            },
            HomarrError::Remote(RemoteError::Rpc { code, .. }) => match *code {
                Some(TRPC_UNAUTHORIZED) => Some("Session token rejected. Log in again and copy a fresh token."),
                Some(TRPC_FORBIDDEN) => Some("Permission denied. The session user lacks access."),
                _ => None,
            },
            HomarrError::Transport(_) => {
                Some("Could not reach Homarr. Check the URL and your network connection.")
            }
            _ => None,
        }
    }
}

// JSON-RPC style codes used in tRPC error envelopes.
const TRPC_UNAUTHORIZED: i64 = -32001;
const TRPC_FORBIDDEN: i64 = -32003;
const TRPC_NOT_FOUND: i64 = -32004;

/// Attach the failing operation to an error.
pub trait ResultExt<T> {
    fn context(self, operation: impl Into<String>) -> Result<T>;

    fn with_context<F>(self, operation: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, operation: impl Into<String>) -> Result<T> {
        self.map_err(|source| HomarrError::Context {
            operation: operation.into(),
            source: Box::new(source),
        })
    }

    fn with_context<F>(self, operation: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| HomarrError::Context {
            operation: operation(),
            source: Box::new(source),
        })
    }
}

//! Configuration Management
//!
//! Connection settings for a Homarr instance. A [`Profile`] is the loose,
//! serde-loadable form assembled from CLI flags, environment variables and
//! the config file; [`ConnectionConfig`] is the validated form the client
//! owns for its lifetime.

use crate::error::{HomarrError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_URL: &str = "HOMARR_URL";
pub const ENV_API_KEY: &str = "HOMARR_API_KEY";
pub const ENV_SESSION_TOKEN: &str = "HOMARR_SESSION_TOKEN";

/// Validated connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    base_url: String,
    api_key: Option<String>,
    session_token: Option<String>,
}

impl ConnectionConfig {
    /// Validate and build connection settings.
    ///
    /// The URL must be an absolute http(s) URL and at least one credential
    /// must be non-empty. Empty credentials are treated as unset.
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        session_token: Option<String>,
    ) -> Result<Self> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(HomarrError::Config(format!(
                "missing Homarr URL; set it with --url or {ENV_URL}"
            )));
        }

        let parsed = url::Url::parse(trimmed)
            .map_err(|e| HomarrError::Config(format!("invalid Homarr URL {trimmed:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HomarrError::Config(format!(
                "unsupported URL scheme {:?}; expected http or https",
                parsed.scheme()
            )));
        }

        let api_key = api_key.filter(|k| !k.is_empty());
        let session_token = session_token.filter(|t| !t.is_empty());
        if api_key.is_none() && session_token.is_none() {
            return Err(HomarrError::Config(format!(
                "missing authentication; set an API key ({ENV_API_KEY}) or a session token ({ENV_SESSION_TOKEN})"
            )));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            api_key,
            session_token,
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Unvalidated connection settings from one source
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl Profile {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("homarrctl").join("config.json"))
    }

    /// Load the profile from the default config file.
    ///
    /// A missing or unreadable file yields an empty profile.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Read `HOMARR_URL`, `HOMARR_API_KEY` and `HOMARR_SESSION_TOKEN`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            url: read(ENV_URL),
            api_key: read(ENV_API_KEY),
            session_token: read(ENV_SESSION_TOKEN),
        }
    }

    /// Fill unset fields from a lower-precedence profile
    pub fn merge(self, fallback: Profile) -> Self {
        Self {
            url: self.url.or(fallback.url),
            api_key: self.api_key.or(fallback.api_key),
            session_token: self.session_token.or(fallback.session_token),
        }
    }

    pub fn into_connection(self) -> Result<ConnectionConfig> {
        ConnectionConfig::new(
            self.url.unwrap_or_default(),
            self.api_key,
            self.session_token,
        )
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_valid_config_strips_trailing_slash() {
        let config = ConnectionConfig::new("https://homarr.example.com/", Some("key".into()), None)
            .unwrap();
        assert_eq!(config.base_url(), "https://homarr.example.com");
        assert_eq!(config.api_key(), Some("key"));
        assert_eq!(config.session_token(), None);
    }

    #[test]
    fn test_empty_url_rejected() {
        let err = ConnectionConfig::new("  ", Some("key".into()), None).unwrap_err();
        assert!(matches!(err, HomarrError::Config(msg) if msg.contains("missing Homarr URL")));
    }

    #[test]
    fn test_unparseable_url_rejected() {
        let err = ConnectionConfig::new("homarr.local", Some("key".into()), None).unwrap_err();
        assert!(matches!(err, HomarrError::Config(_)));

        let err = ConnectionConfig::new("ftp://homarr.local", Some("key".into()), None).unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn test_requires_a_credential() {
        let err = ConnectionConfig::new("http://homarr.local", None, None).unwrap_err();
        assert!(err.to_string().contains("missing authentication"));

        // Empty strings count as unset
        let err = ConnectionConfig::new("http://homarr.local", Some(String::new()), Some(String::new()))
            .unwrap_err();
        assert!(err.to_string().contains("missing authentication"));

        let config =
            ConnectionConfig::new("http://homarr.local", Some(String::new()), Some("tok".into()))
                .unwrap();
        assert_eq!(config.api_key(), None);
        assert_eq!(config.session_token(), Some("tok"));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config =
            ConnectionConfig::new("http://homarr.local", Some("s3cret".into()), Some("t0ken".into()))
                .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("t0ken"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_lookup_ignores_empty_values() {
        let env: HashMap<&str, &str> = [
            (ENV_URL, "http://homarr.local"),
            (ENV_API_KEY, ""),
            (ENV_SESSION_TOKEN, "tok"),
        ]
        .into_iter()
        .collect();

        let profile = Profile::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(profile.url.as_deref(), Some("http://homarr.local"));
        assert_eq!(profile.api_key, None);
        assert_eq!(profile.session_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_merge_precedence() {
        let cli = Profile {
            url: Some("http://cli".into()),
            ..Profile::default()
        };
        let env = Profile {
            url: Some("http://env".into()),
            api_key: Some("env-key".into()),
            ..Profile::default()
        };
        let file = Profile {
            api_key: Some("file-key".into()),
            session_token: Some("file-token".into()),
            ..Profile::default()
        };

        let merged = cli.merge(env).merge(file);
        assert_eq!(merged.url.as_deref(), Some("http://cli"));
        assert_eq!(merged.api_key.as_deref(), Some("env-key"));
        assert_eq!(merged.session_token.as_deref(), Some("file-token"));

        let config = merged.into_connection().unwrap();
        assert_eq!(config.base_url(), "http://cli");
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let path = std::env::temp_dir().join("homarrctl-test-does-not-exist.json");
        assert_eq!(Profile::load_from(&path), Profile::default());
    }

    #[test]
    fn test_profile_json_shape() {
        let profile: Profile =
            serde_json::from_str(r#"{"url":"http://homarr.local","session_token":"tok"}"#).unwrap();
        assert_eq!(profile.url.as_deref(), Some("http://homarr.local"));
        assert_eq!(profile.api_key, None);
    }
}

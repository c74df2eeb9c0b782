//! SDK settings and validation.
//!
//! Pure data: loading from the environment goes through a caller-supplied
//! lookup so the core never touches process state.

use serde::{Deserialize, Serialize};

use crate::security::{Security, SecurityError};

/// Server used when no URL is configured.
pub const DEFAULT_SERVER_URL: &str = "https://api.novu.co";

pub const ENV_SERVER_URL: &str = "NOTIFLOW_SERVER_URL";
pub const ENV_API_KEY: &str = "NOTIFLOW_API_KEY";
pub const ENV_BEARER_TOKEN: &str = "NOTIFLOW_BEARER_TOKEN";
pub const ENV_IDEMPOTENCY_PREFIX: &str = "NOTIFLOW_IDEMPOTENCY_PREFIX";

/// SDK settings.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SdkSettings {
    /// Base URL requests are rendered against.
    pub server_url: Option<String>,

    pub api_key: Option<String>,

    pub bearer_token: Option<String>,

    /// Prefix for generated `idempotency-key` values.
    pub idempotency_prefix: Option<String>,
}

impl std::fmt::Debug for SdkSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkSettings")
            .field("server_url", &self.server_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("idempotency_prefix", &self.idempotency_prefix)
            .finish()
    }
}

impl SdkSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            api_key: None,
            bearer_token: None,
            idempotency_prefix: None,
        }
    }

    /// Read settings through `lookup` (typically `std::env::var(..).ok()`).
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            server_url: read(ENV_SERVER_URL),
            api_key: read(ENV_API_KEY),
            bearer_token: read(ENV_BEARER_TOKEN),
            idempotency_prefix: read(ENV_IDEMPOTENCY_PREFIX),
        }
    }

    /// Get the effective server URL (with default fallback), without a
    /// trailing slash.
    pub fn effective_server_url(&self) -> &str {
        self.server_url
            .as_deref()
            .unwrap_or(DEFAULT_SERVER_URL)
            .trim_end_matches('/')
    }

    /// Credentials to apply to requests.
    pub fn security(&self) -> Security {
        Security {
            api_key: self.api_key.clone(),
            bearer_token: self.bearer_token.clone(),
        }
    }

    /// Build an idempotency key from the configured prefix.
    pub fn idempotency_key(&self, suffix: &str) -> String {
        match self.idempotency_prefix.as_deref() {
            Some(prefix) => format!("{prefix}-{suffix}"),
            None => suffix.to_string(),
        }
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(ref url) = other.server_url {
            self.server_url.clone_from(url);
        }
        if let Some(ref key) = other.api_key {
            self.api_key.clone_from(key);
        }
        if let Some(ref token) = other.bearer_token {
            self.bearer_token.clone_from(token);
        }
        if let Some(ref prefix) = other.idempotency_prefix {
            self.idempotency_prefix.clone_from(prefix);
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = set field to None/null
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub server_url: Option<Option<String>>,
    pub api_key: Option<Option<String>>,
    pub bearer_token: Option<Option<String>>,
    pub idempotency_prefix: Option<Option<String>>,
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Server URL must start with http:// or https://, got '{0}'")]
    InvalidServerUrl(String),

    #[error("Idempotency prefix must not contain whitespace, got '{0}'")]
    InvalidIdempotencyPrefix(String),

    #[error(transparent)]
    Credentials(#[from] SecurityError),
}

/// Validate settings values.
pub fn validate_settings(settings: &SdkSettings) -> Result<(), SettingsError> {
    if let Some(ref url) = settings.server_url {
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        if rest.is_none_or(str::is_empty) {
            return Err(SettingsError::InvalidServerUrl(url.clone()));
        }
    }

    if let Some(ref prefix) = settings.idempotency_prefix {
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(SettingsError::InvalidIdempotencyPrefix(prefix.clone()));
        }
    }

    settings.security().credential()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = SdkSettings::with_defaults();
        assert_eq!(settings.server_url.as_deref(), Some(DEFAULT_SERVER_URL));
        assert!(settings.security().is_empty());
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_effective_server_url_fallback() {
        let mut settings = SdkSettings::default();
        assert_eq!(settings.effective_server_url(), DEFAULT_SERVER_URL);

        settings.server_url = Some("http://localhost:3000/".to_string());
        assert_eq!(settings.effective_server_url(), "http://localhost:3000");
    }

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let env: HashMap<&str, &str> = [
            (ENV_SERVER_URL, "http://localhost:3000"),
            (ENV_API_KEY, "sk_test"),
            (ENV_BEARER_TOKEN, "   "),
        ]
        .into_iter()
        .collect();

        let settings = SdkSettings::from_lookup(|key| env.get(key).map(ToString::to_string));
        assert_eq!(settings.server_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(settings.api_key.as_deref(), Some("sk_test"));
        assert_eq!(settings.bearer_token, None);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let settings = SdkSettings {
            server_url: Some("ftp://example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidServerUrl(_))
        ));

        let settings = SdkSettings {
            server_url: Some("https://".to_string()),
            ..Default::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_validate_rejects_conflicting_credentials() {
        let settings = SdkSettings {
            api_key: Some("k".to_string()),
            bearer_token: Some("t".to_string()),
            ..SdkSettings::with_defaults()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::Credentials(SecurityError::Conflicting))
        ));
    }

    #[test]
    fn test_merge_settings() {
        let mut settings = SdkSettings::with_defaults();
        settings.merge(&SettingsUpdate {
            api_key: Some(Some("sk".to_string())),
            server_url: Some(None),
            ..Default::default()
        });
        assert_eq!(settings.api_key.as_deref(), Some("sk"));
        assert_eq!(settings.server_url, None);
        assert_eq!(settings.idempotency_prefix, None);
    }

    #[test]
    fn test_idempotency_key_prefix() {
        let mut settings = SdkSettings::default();
        assert_eq!(settings.idempotency_key("abc"), "abc");
        settings.idempotency_prefix = Some("cli".to_string());
        assert_eq!(settings.idempotency_key("abc"), "cli-abc");
    }
}
